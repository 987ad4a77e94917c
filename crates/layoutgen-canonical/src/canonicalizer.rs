use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// The value could not be turned into a JSON tree.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonical JSON only admits integers; floats are rejected.
    #[error("non-integer number {value} at {path}")]
    NonIntegerNumber {
        /// JSON path of the offending number.
        path: String,
        /// Number as it appeared in the input.
        value: String,
    },
}

/// Helper for building JSON paths in error messages.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits OLPC canonical JSON bytes.
///
/// The encoding is the one signatures and key ids are computed over:
/// object members sorted by key bytes, no insignificant whitespace,
/// strings quoted with only `\` and `"` escaped, integers only.
#[derive(Debug, Default, Clone, Copy)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a new canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Produces canonical bytes for an already-parsed JSON value.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        let mut out = String::new();
        self.encode(value, Path::root(), &mut out)?;
        Ok(out.into_bytes())
    }

    /// Serializes `value` through serde and produces its canonical bytes.
    pub fn canonicalize_serializable<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        let tree = serde_json::to_value(value)
            .map_err(|e| CanonicalizationError::Serialization(e.to_string()))?;
        self.canonicalize(&tree)
    }

    #[allow(clippy::only_used_in_recursion)]
    fn encode(
        &self,
        value: &Value,
        path: Path,
        out: &mut String,
    ) -> Result<(), CanonicalizationError> {
        match value {
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();

                out.push('{');
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    encode_string(key, out);
                    out.push(':');
                    self.encode(&map[key], path.push_field(key), out)?;
                }
                out.push('}');
                Ok(())
            }
            Value::Array(items) => {
                out.push('[');
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    self.encode(item, path.push_index(idx), out)?;
                }
                out.push(']');
                Ok(())
            }
            Value::Number(num) => {
                if let Some(i) = num.as_i64() {
                    out.push_str(&i.to_string());
                } else if let Some(u) = num.as_u64() {
                    out.push_str(&u.to_string());
                } else {
                    return Err(CanonicalizationError::NonIntegerNumber {
                        path: path.to_string(),
                        value: num.to_string(),
                    });
                }
                Ok(())
            }
            Value::String(s) => {
                encode_string(s, out);
                Ok(())
            }
            Value::Bool(true) => {
                out.push_str("true");
                Ok(())
            }
            Value::Bool(false) => {
                out.push_str("false");
                Ok(())
            }
            Value::Null => {
                out.push_str("null");
                Ok(())
            }
        }
    }
}

/// Serializes `value` and returns its canonical bytes.
pub fn encode_canonical<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonicalizationError> {
    Canonicalizer::new().canonicalize_serializable(value)
}

fn encode_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canon(value: Value) -> String {
        String::from_utf8(Canonicalizer::new().canonicalize(&value).unwrap()).unwrap()
    }

    #[test]
    fn sorts_keys_recursively() {
        let value = json!({"b": 1, "a": {"z": true, "y": null}});
        assert_eq!(canon(value), r#"{"a":{"y":null,"z":true},"b":1}"#);
    }

    #[test]
    fn escapes_only_quote_and_backslash() {
        let value = json!(["a\"b", "c\\d", "line\nbreak\t"]);
        assert_eq!(canon(value), "[\"a\\\"b\",\"c\\\\d\",\"line\nbreak\t\"]");
    }

    #[test]
    fn keeps_negative_and_large_integers() {
        let value = json!([-7, 0, u64::MAX]);
        assert_eq!(canon(value), format!("[-7,0,{}]", u64::MAX));
    }

    #[test]
    fn rejects_floats_with_path() {
        let value = json!({"steps": [{"threshold": 1.5}]});
        let err = Canonicalizer::new().canonicalize(&value).unwrap_err();
        match err {
            CanonicalizationError::NonIntegerNumber { path, value } => {
                assert_eq!(path, "steps.[0].threshold");
                assert_eq!(value, "1.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_containers() {
        assert_eq!(canon(json!({"a": [], "b": {}, "c": ""})), r#"{"a":[],"b":{},"c":""}"#);
    }
}
