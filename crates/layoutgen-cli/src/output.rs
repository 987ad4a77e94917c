//! Output formatting utilities.

use layoutgen_canonical::KeyId;
use layoutgen_crypto::SignatureVerdict;
use serde_json::{json, Value};

/// Formats a value as indented JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Short name of a verdict, as shown in tables and JSON.
pub fn verdict_label(verdict: &SignatureVerdict) -> &'static str {
    match verdict {
        SignatureVerdict::Ok => "ok",
        SignatureVerdict::UnknownKey => "unknown-key",
        SignatureVerdict::Invalid(_) => "invalid",
    }
}

/// JSON object for one signature verdict.
pub fn verdict_json(key_id: &KeyId, verdict: &SignatureVerdict) -> Value {
    let reason = match verdict {
        SignatureVerdict::Invalid(reason) => Value::String(reason.clone()),
        _ => Value::Null,
    };
    json!({
        "keyid": key_id.as_str(),
        "verdict": verdict_label(verdict),
        "reason": reason,
    })
}

/// Formats a signature verdict as a table row.
pub fn format_verdict_row(key_id: &KeyId, verdict: &SignatureVerdict) -> String {
    match verdict {
        SignatureVerdict::Invalid(reason) => format!(
            "{:<66} {:<12} {}",
            key_id.as_str(),
            verdict_label(verdict),
            truncate(reason, 60)
        ),
        _ => format!("{:<66} {}", key_id.as_str(), verdict_label(verdict)),
    }
}

/// Prints the verdict table header.
#[allow(clippy::print_literal)]
pub fn print_verdict_header() {
    println!("{:<66} {:<12} {}", "KEYID", "VERDICT", "REASON");
    println!("{}", "-".repeat(90));
}

/// Shortens `s` to at most `max_len` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdefgh", 6), "abc...");
    }

    #[test]
    fn invalid_verdict_carries_reason() {
        let value = verdict_json(
            &KeyId::from("ab"),
            &SignatureVerdict::Invalid("bad padding".into()),
        );
        assert_eq!(value["verdict"], "invalid");
        assert_eq!(value["reason"], "bad padding");

        let value = verdict_json(&KeyId::from("ab"), &SignatureVerdict::Ok);
        assert_eq!(value["verdict"], "ok");
        assert!(value["reason"].is_null());
    }
}
