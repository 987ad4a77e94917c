//! Key records embedded in layouts.

use layoutgen_canonical::{compute_key_id, verify_key_id, HashAlgorithm, KeyId};
use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

/// Key algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// RSA; key values are PEM strings.
    Rsa,
    /// ECDSA; key values are PEM strings.
    Ecdsa,
    /// Ed25519; key values are hex strings.
    Ed25519,
}

/// Signature scheme used with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureScheme {
    /// RSASSA-PSS with SHA-256 and MGF1-SHA-256, 32-byte salt.
    #[serde(rename = "rsassa-pss-sha256")]
    RsassaPssSha256,
    /// ECDSA over P-256.
    #[serde(rename = "ecdsa-sha2-nistp256")]
    EcdsaSha2Nistp256,
    /// ECDSA over P-384.
    #[serde(rename = "ecdsa-sha2-nistp384")]
    EcdsaSha2Nistp384,
    /// Pure Ed25519.
    #[serde(rename = "ed25519")]
    Ed25519,
}

/// Default algorithms declared for key id computation.
pub const DEFAULT_KEYID_HASH_ALGORITHMS: [HashAlgorithm; 2] =
    [HashAlgorithm::Sha256, HashAlgorithm::Sha512];

/// Public and (optionally) private key values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyVal {
    /// Private half; empty for public key records.
    pub private: String,
    /// Public half.
    pub public: String,
}

/// Key metadata plus key values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Key {
    /// Hex SHA-256 over the canonical public record.
    pub keyid: KeyId,
    /// Hash algorithms the key id may be computed with.
    pub keyid_hash_algorithms: Vec<HashAlgorithm>,
    /// Key algorithm family.
    pub keytype: KeyType,
    /// Key values.
    pub keyval: KeyVal,
    /// Signature scheme.
    pub scheme: SignatureScheme,
}

impl Key {
    /// Builds a public RSA key record from a SPKI PEM string and derives its id.
    ///
    /// Leading and trailing whitespace of the PEM is trimmed before hashing.
    pub fn rsa_public(public_pem: &str, scheme: SignatureScheme) -> Result<Self, SchemaError> {
        let mut key = Key {
            keyid: KeyId::new(String::new()),
            keyid_hash_algorithms: DEFAULT_KEYID_HASH_ALGORITHMS.to_vec(),
            keytype: KeyType::Rsa,
            keyval: KeyVal {
                private: String::new(),
                public: public_pem.trim().to_string(),
            },
            scheme,
        };
        key.keyid = compute_key_id(&key)?;
        Ok(key)
    }

    /// Returns `true` when no private material is attached.
    pub fn is_public_only(&self) -> bool {
        self.keyval.private.is_empty()
    }

    /// Copy of this record with the private half blanked.
    pub fn to_public(&self) -> Key {
        Key {
            keyval: KeyVal {
                private: String::new(),
                public: self.keyval.public.clone(),
            },
            ..self.clone()
        }
    }

    /// Checks the id format and that the id is derived from the public material.
    pub fn validate(&self) -> Result<(), SchemaError> {
        KeyId::check(self.keyid.as_str())?;
        if !verify_key_id(self, &self.keyid)? {
            return Err(SchemaError::KeyIdNotDerived(self.keyid.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rsa_public_trims_and_derives_id() {
        let key = Key::rsa_public("\n  PEM  \n", SignatureScheme::RsassaPssSha256).unwrap();
        assert_eq!(key.keyval.public, "PEM");
        assert!(key.is_public_only());
        assert_eq!(key.keyid.as_str().len(), 64);
        key.validate().unwrap();
    }

    #[test]
    fn tampered_public_material_fails_validation() {
        let mut key = Key::rsa_public("PEM", SignatureScheme::RsassaPssSha256).unwrap();
        key.keyval.public.push('x');
        assert!(matches!(
            key.validate(),
            Err(SchemaError::KeyIdNotDerived(_))
        ));
    }

    #[test]
    fn serializes_with_wire_names() {
        let key = Key::rsa_public("PEM", SignatureScheme::RsassaPssSha256).unwrap();
        let value = serde_json::to_value(&key).unwrap();
        assert_eq!(value["keytype"], json!("rsa"));
        assert_eq!(value["scheme"], json!("rsassa-pss-sha256"));
        assert_eq!(value["keyid_hash_algorithms"], json!(["sha256", "sha512"]));
        assert_eq!(value["keyval"], json!({"private": "", "public": "PEM"}));
    }

    #[test]
    fn to_public_blanks_private_half() {
        let mut key = Key::rsa_public("PEM", SignatureScheme::RsassaPssSha256).unwrap();
        key.keyval.private = "secret".into();
        let public = key.to_public();
        assert!(public.is_public_only());
        assert_eq!(public.keyid, key.keyid);
    }
}
