//! Key id computation over the canonical public part of a key record.
//!
//! Key ids are computed as: `hex(sha256(canonical_bytes(partial_key)))` where
//! `partial_key` keeps only `keytype`, `scheme`, `keyid_hash_algorithms` and
//! `keyval.public`. The `keyid` field itself and any private material are
//! excluded from the hash input.

use crate::{Canonicalizer, KeyId, ValidationError};
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest as Sha2Digest, Sha256};

/// Fields of a key record that participate in its id.
const HASHED_FIELDS: [&str; 3] = ["keytype", "scheme", "keyid_hash_algorithms"];

/// Computes the key id for a serializable key record.
///
/// # Example
///
/// ```rust
/// use layoutgen_canonical::compute_key_id;
/// use serde_json::json;
///
/// let key = json!({
///     "keytype": "rsa",
///     "scheme": "rsassa-pss-sha256",
///     "keyid_hash_algorithms": ["sha256", "sha512"],
///     "keyval": { "public": "-----BEGIN PUBLIC KEY-----\n...", "private": "" }
/// });
///
/// let key_id = compute_key_id(&key)?;
/// assert_eq!(key_id.as_str().len(), 64);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`KeyIdError`] if serialization or canonicalization fails, or if a
/// hashed field is absent.
pub fn compute_key_id<T: Serialize>(key: &T) -> Result<KeyId, KeyIdError> {
    let value: Value =
        serde_json::to_value(key).map_err(|e| KeyIdError::Serialization(e.to_string()))?;

    let mut partial = serde_json::Map::new();
    for field in HASHED_FIELDS {
        let member = value
            .get(field)
            .ok_or(ValidationError::MissingField(field))?;
        partial.insert(field.to_string(), member.clone());
    }
    let public = value
        .get("keyval")
        .and_then(|keyval| keyval.get("public"))
        .ok_or(ValidationError::MissingField("keyval.public"))?;
    partial.insert("keyval".to_string(), json!({ "public": public }));

    let bytes = Canonicalizer::new().canonicalize(&Value::Object(partial))?;
    let hash_bytes = Sha256::digest(&bytes);
    Ok(KeyId::new(hex::encode(hash_bytes)))
}

/// Verifies that a claimed key id matches the computed one.
pub fn verify_key_id<T: Serialize>(key: &T, claimed_id: &KeyId) -> Result<bool, KeyIdError> {
    let computed = compute_key_id(key)?;
    Ok(computed.as_str().eq_ignore_ascii_case(claimed_id.as_str()))
}

/// Error during key id computation.
#[derive(thiserror::Error, Debug)]
pub enum KeyIdError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] crate::CanonicalizationError),
    /// The key record lacks a hashed field.
    #[error("invalid key record: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(public: &str) -> Value {
        json!({
            "keyid": "ignored",
            "keytype": "rsa",
            "scheme": "rsassa-pss-sha256",
            "keyid_hash_algorithms": ["sha256", "sha512"],
            "keyval": { "public": public, "private": "" }
        })
    }

    #[test]
    fn id_ignores_keyid_and_private_members() {
        let mut with_private = record("pub");
        with_private["keyval"]["private"] = json!("secret");
        with_private["keyid"] = json!("0000");
        assert_eq!(
            compute_key_id(&record("pub")).unwrap(),
            compute_key_id(&with_private).unwrap()
        );
    }

    #[test]
    fn id_changes_with_public_material() {
        assert_ne!(
            compute_key_id(&record("a")).unwrap(),
            compute_key_id(&record("b")).unwrap()
        );
    }

    #[test]
    fn missing_field_is_reported() {
        let mut value = record("pub");
        value.as_object_mut().unwrap().remove("scheme");
        assert!(matches!(
            compute_key_id(&value),
            Err(KeyIdError::Validation(ValidationError::MissingField("scheme")))
        ));
    }

    #[test]
    fn verify_is_case_insensitive() {
        let id = compute_key_id(&record("pub")).unwrap();
        let upper = KeyId::new(id.as_str().to_uppercase());
        assert!(verify_key_id(&record("pub"), &upper).unwrap());
        assert!(!verify_key_id(&record("other"), &id).unwrap());
    }
}
