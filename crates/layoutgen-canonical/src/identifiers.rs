use crate::validation::ValidationError;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Checks the wrapped value against the identifier pattern.
            pub fn check(value: &str) -> Result<(), ValidationError> {
                if !Regex::new($pattern).expect("invalid regex").is_match(value) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: value.to_string(),
                    });
                }
                Ok(())
            }

            /// Borrows the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    KeyId,
    "Hex key identifier (SHA-256 over the canonical public key record).",
    r"^[a-fA-F0-9]+$"
);
newtype!(
    Timestamp,
    "UTC ISO-8601 timestamp with seconds precision and `Z` suffix.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$"
);

impl KeyId {
    /// Parses a validated key id.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        Self::check(&s)?;
        Ok(Self(s))
    }

    /// First 8 characters, for naming a signer in one-line status output.
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(8).map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

/// Format of layout expiry timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

impl Timestamp {
    /// Parses a timestamp, rejecting well-shaped strings that are not real instants
    /// (e.g. month 13).
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        Self::check(&s)?;
        if NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).is_err() {
            return Err(ValidationError::OutOfBounds {
                field: "Timestamp",
                value: s,
            });
        }
        Ok(Self(s))
    }

    /// Parsed instant.
    pub fn to_datetime(&self) -> Result<NaiveDateTime, ValidationError> {
        NaiveDateTime::parse_from_str(&self.0, TIMESTAMP_FORMAT).map_err(|_| {
            ValidationError::OutOfBounds {
                field: "Timestamp",
                value: self.0.clone(),
            }
        })
    }
}
