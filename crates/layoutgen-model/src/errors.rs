//! Error types for layout metadata.

use layoutgen_canonical::{CanonicalizationError, KeyId, KeyIdError, ValidationError};
use thiserror::Error;

/// Structural errors raised while building, validating or loading layout metadata.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A `_type` discriminator has the wrong value.
    #[error("invalid _type for {item}: expected '{expected}', found '{found}'")]
    InvalidType {
        /// Kind of item being checked.
        item: &'static str,
        /// Required discriminator.
        expected: &'static str,
        /// Discriminator found.
        found: String,
    },
    /// A field value fails its format check.
    #[error("invalid field: {0}")]
    InvalidField(#[from] ValidationError),
    /// A keys map entry does not carry its own id.
    #[error("key stored under '{map_id}' declares keyid '{key_id}'")]
    KeyIdMismatch {
        /// Id used as the map key.
        map_id: KeyId,
        /// Id inside the key record.
        key_id: KeyId,
    },
    /// The key id is not derived from the key's public material.
    #[error("keyid '{0}' does not match the key's public material")]
    KeyIdNotDerived(KeyId),
    /// A layout key carries private material.
    #[error("private key material found for key '{0}'")]
    PrivateKeyMaterial(KeyId),
    /// Step and inspection names must be unique.
    #[error("non unique step or inspection name found: '{0}'")]
    DuplicateName(String),
    /// A step authorizes a key that is not in the layout.
    #[error("step '{step}' references unknown key '{key_id}'")]
    UnknownPubkey {
        /// Step name.
        step: String,
        /// Referenced key id.
        key_id: KeyId,
    },
    /// A step threshold cannot be met by its authorized keys.
    #[error("step '{step}' has threshold {threshold} with {pubkeys} authorized key(s)")]
    InvalidThreshold {
        /// Step name.
        step: String,
        /// Declared threshold.
        threshold: u32,
        /// Number of authorized keys.
        pubkeys: usize,
    },
    /// An artifact rule does not follow the rule grammar.
    #[error("wrong rule format {rule:?}: {reason}")]
    InvalidRule {
        /// Rule tokens as written.
        rule: Vec<String>,
        /// What is wrong with them.
        reason: String,
    },
    /// A MATCH rule points at a step the layout does not define.
    #[error("rule in '{item}' matches against unknown step '{target}'")]
    UnknownMatchTarget {
        /// Step or inspection holding the rule.
        item: String,
        /// Step named after FROM.
        target: String,
    },
    /// A required member of the signed envelope is missing or null.
    #[error("metadata requires '{0}'")]
    MissingMember(&'static str),
    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Canonical encoding failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// Key id computation failed.
    #[error("key id computation failed: {0}")]
    KeyId(#[from] KeyIdError),
    /// Reading or writing metadata failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
