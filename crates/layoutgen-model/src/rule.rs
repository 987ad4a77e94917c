//! Artifact rules constraining step materials and products.
//!
//! Rules travel as arrays of string tokens:
//!
//! ```text
//! MATCH <pattern> [IN <source-path-prefix>] WITH (MATERIALS|PRODUCTS)
//!     [IN <destination-path-prefix>] FROM <step>
//! CREATE <pattern>
//! DELETE <pattern>
//! MODIFY <pattern>
//! ALLOW <pattern>
//! DISALLOW <pattern>
//! ```
//!
//! Keywords are case-insensitive; patterns, prefixes and step names keep
//! their case. Only the shape is handled here, not evaluation against
//! recorded artifacts.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::errors::SchemaError;

/// Which artifact set of the referenced step a MATCH rule compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Materials of the referenced step.
    Materials,
    /// Products of the referenced step.
    Products,
}

impl ArtifactKind {
    fn keyword(&self) -> &'static str {
        match self {
            ArtifactKind::Materials => "MATERIALS",
            ArtifactKind::Products => "PRODUCTS",
        }
    }
}

/// A single material or product rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactRule {
    /// Artifacts matching the pattern must be new.
    Create(String),
    /// Artifacts matching the pattern must be removed.
    Delete(String),
    /// Artifacts matching the pattern must change.
    Modify(String),
    /// Artifacts matching the pattern are accepted.
    Allow(String),
    /// Artifacts matching the pattern are rejected.
    Disallow(String),
    /// Artifacts matching the pattern must match those of another step.
    Match {
        /// Glob pattern.
        pattern: String,
        /// Prefix stripped from this step's artifact paths.
        source_prefix: Option<String>,
        /// Artifact set of the referenced step.
        with: ArtifactKind,
        /// Prefix stripped from the referenced step's artifact paths.
        destination_prefix: Option<String>,
        /// Referenced step name.
        from: String,
    },
}

impl ArtifactRule {
    /// `DISALLOW <pattern>`.
    pub fn disallow(pattern: impl Into<String>) -> Self {
        ArtifactRule::Disallow(pattern.into())
    }

    /// `ALLOW <pattern>`.
    pub fn allow(pattern: impl Into<String>) -> Self {
        ArtifactRule::Allow(pattern.into())
    }

    /// `MATCH <pattern> WITH <with> FROM <step>`.
    pub fn match_from(pattern: impl Into<String>, with: ArtifactKind, step: impl Into<String>) -> Self {
        ArtifactRule::Match {
            pattern: pattern.into(),
            source_prefix: None,
            with,
            destination_prefix: None,
            from: step.into(),
        }
    }

    /// Parses rule tokens.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, SchemaError> {
        let rule: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let lower: Vec<String> = rule.iter().map(|t| t.to_lowercase()).collect();
        let lower: Vec<&str> = lower.iter().map(String::as_str).collect();

        let invalid = |reason: &str| SchemaError::InvalidRule {
            rule: rule.iter().map(|t| t.to_string()).collect(),
            reason: reason.to_string(),
        };

        let Some(keyword) = lower.first() else {
            return Err(invalid("empty rule"));
        };

        match *keyword {
            "create" | "delete" | "modify" | "allow" | "disallow" => {
                if rule.len() != 2 {
                    return Err(invalid("expected exactly one pattern"));
                }
                let pattern = rule[1].to_string();
                Ok(match *keyword {
                    "create" => ArtifactRule::Create(pattern),
                    "delete" => ArtifactRule::Delete(pattern),
                    "modify" => ArtifactRule::Modify(pattern),
                    "allow" => ArtifactRule::Allow(pattern),
                    _ => ArtifactRule::Disallow(pattern),
                })
            }
            "match" => {
                let (source_prefix, with, destination_prefix, from) = match lower.as_slice() {
                    [_, _, "in", _, "with", _, "in", _, "from", _] => {
                        (Some(rule[3]), lower[5], Some(rule[7]), rule[9])
                    }
                    [_, _, "in", _, "with", _, "from", _] => (Some(rule[3]), lower[5], None, rule[7]),
                    [_, _, "with", _, "in", _, "from", _] => (None, lower[3], Some(rule[5]), rule[7]),
                    [_, _, "with", _, "from", _] => (None, lower[3], None, rule[5]),
                    _ => return Err(invalid("malformed MATCH rule")),
                };
                let with = match with {
                    "materials" => ArtifactKind::Materials,
                    "products" => ArtifactKind::Products,
                    _ => return Err(invalid("WITH must name MATERIALS or PRODUCTS")),
                };
                Ok(ArtifactRule::Match {
                    pattern: rule[1].to_string(),
                    source_prefix: source_prefix.map(str::to_string),
                    with,
                    destination_prefix: destination_prefix.map(str::to_string),
                    from: from.to_string(),
                })
            }
            _ => Err(invalid("unknown rule keyword")),
        }
    }

    /// Rule tokens with upper-case keywords.
    pub fn to_tokens(&self) -> Vec<String> {
        let simple = |keyword: &str, pattern: &str| vec![keyword.to_string(), pattern.to_string()];
        match self {
            ArtifactRule::Create(p) => simple("CREATE", p),
            ArtifactRule::Delete(p) => simple("DELETE", p),
            ArtifactRule::Modify(p) => simple("MODIFY", p),
            ArtifactRule::Allow(p) => simple("ALLOW", p),
            ArtifactRule::Disallow(p) => simple("DISALLOW", p),
            ArtifactRule::Match {
                pattern,
                source_prefix,
                with,
                destination_prefix,
                from,
            } => {
                let mut tokens = vec!["MATCH".to_string(), pattern.clone()];
                if let Some(prefix) = source_prefix {
                    tokens.push("IN".to_string());
                    tokens.push(prefix.clone());
                }
                tokens.push("WITH".to_string());
                tokens.push(with.keyword().to_string());
                if let Some(prefix) = destination_prefix {
                    tokens.push("IN".to_string());
                    tokens.push(prefix.clone());
                }
                tokens.push("FROM".to_string());
                tokens.push(from.clone());
                tokens
            }
        }
    }

    /// Step referenced by a MATCH rule.
    pub fn match_target(&self) -> Option<&str> {
        match self {
            ArtifactRule::Match { from, .. } => Some(from),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tokens().join(" "))
    }
}

impl Serialize for ArtifactRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_tokens().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ArtifactRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tokens = Vec::<String>::deserialize(deserializer)?;
        ArtifactRule::parse(&tokens).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_simple_rules_case_insensitively() {
        assert_eq!(
            ArtifactRule::parse(&["disallow", "*"]).unwrap(),
            ArtifactRule::disallow("*")
        );
        assert_eq!(
            ArtifactRule::parse(&["Allow", "./test/data/Foo.py"]).unwrap(),
            ArtifactRule::allow("./test/data/Foo.py")
        );
        assert_eq!(
            ArtifactRule::parse(&["CREATE", "x"]).unwrap(),
            ArtifactRule::Create("x".into())
        );
    }

    #[test]
    fn parses_every_match_form() {
        let cases: [(&[&str], Option<&str>, Option<&str>); 4] = [
            (&["MATCH", "*", "WITH", "PRODUCTS", "FROM", "s"], None, None),
            (&["MATCH", "*", "IN", "src", "WITH", "PRODUCTS", "FROM", "s"], Some("src"), None),
            (&["MATCH", "*", "WITH", "PRODUCTS", "IN", "dst", "FROM", "s"], None, Some("dst")),
            (
                &["match", "*", "in", "src", "with", "products", "in", "dst", "from", "s"],
                Some("src"),
                Some("dst"),
            ),
        ];
        for (tokens, src, dst) in cases {
            let rule = ArtifactRule::parse(tokens).unwrap();
            assert_eq!(
                rule,
                ArtifactRule::Match {
                    pattern: "*".into(),
                    source_prefix: src.map(str::to_string),
                    with: ArtifactKind::Products,
                    destination_prefix: dst.map(str::to_string),
                    from: "s".into(),
                }
            );
            assert_eq!(rule.match_target(), Some("s"));
        }
    }

    #[test]
    fn rejects_malformed_rules() {
        let bad: [&[&str]; 6] = [
            &[],
            &["ALLOW"],
            &["ALLOW", "a", "b"],
            &["MATCH", "*", "WITH", "ARTIFACTS", "FROM", "s"],
            &["MATCH", "*", "FROM", "s"],
            &["REQUIRE", "x"],
        ];
        for tokens in bad {
            assert!(
                matches!(ArtifactRule::parse(tokens), Err(SchemaError::InvalidRule { .. })),
                "accepted {tokens:?}"
            );
        }
    }

    #[test]
    fn serializes_as_token_array() {
        let rule = ArtifactRule::match_from("*", ArtifactKind::Products, "write-code");
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!(["MATCH", "*", "WITH", "PRODUCTS", "FROM", "write-code"])
        );
        assert_eq!(rule.to_string(), "MATCH * WITH PRODUCTS FROM write-code");
    }

    #[test]
    fn deserialization_reports_grammar_errors() {
        let err = serde_json::from_value::<ArtifactRule>(json!(["ALLOW"])).unwrap_err();
        assert!(err.to_string().contains("wrong rule format"));
    }
}
