//! Loading RSA private keys from PEM files.

use layoutgen_canonical::KeyId;
use layoutgen_model::{Key, SignatureScheme};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::CryptoError;

/// A functionary key able to sign: the key record (with its private PEM) and
/// the parsed RSA private key.
#[derive(Clone)]
pub struct SigningKey {
    key: Key,
    private: RsaPrivateKey,
}

impl SigningKey {
    /// Parses a PEM-encoded RSA private key, PKCS#8 first, then PKCS#1.
    ///
    /// The public half is stored as a SPKI PEM and the key id is computed
    /// over the public record.
    pub fn from_pem(pem: &str, scheme: SignatureScheme) -> Result<Self, CryptoError> {
        let pem = pem.trim();
        if !pem.contains("-----BEGIN ") {
            return Err(CryptoError::NoPemBlock);
        }

        let private = match RsaPrivateKey::from_pkcs8_pem(pem) {
            Ok(key) => key,
            Err(pkcs8_err) => match RsaPrivateKey::from_pkcs1_pem(pem) {
                Ok(key) => key,
                Err(_) if RsaPublicKey::from_public_key_pem(pem).is_ok() => {
                    return Err(CryptoError::NotAPrivateKey)
                }
                Err(_) => return Err(CryptoError::UnsupportedKey(pkcs8_err.to_string())),
            },
        };

        let public_pem = private
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::PublicKeyEncoding(e.to_string()))?;

        let mut key = Key::rsa_public(&public_pem, scheme)?;
        key.keyval.private = pem.to_string();

        Ok(SigningKey { key, private })
    }

    /// Id of the key.
    pub fn key_id(&self) -> &KeyId {
        &self.key.keyid
    }

    /// Signature scheme of the key.
    pub fn scheme(&self) -> SignatureScheme {
        self.key.scheme
    }

    /// Public key record, suitable for embedding in a layout.
    pub fn public_key(&self) -> Key {
        self.key.to_public()
    }

    pub(crate) fn rsa(&self) -> &RsaPrivateKey {
        &self.private
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("keyid", &self.key.keyid)
            .field("scheme", &self.key.scheme)
            .finish_non_exhaustive()
    }
}

/// Reads an RSA private key from `path` for signing with RSASSA-PSS-SHA256.
///
/// # Errors
///
/// Returns [`CryptoError`] if:
/// - the file is missing or unreadable
/// - the file holds no PEM block
/// - the PEM block is not a PKCS#8 or PKCS#1 RSA private key
pub fn load_signing_key<P: AsRef<Path>>(path: P) -> Result<SigningKey, CryptoError> {
    let path = path.as_ref();
    let pem = fs::read_to_string(path).map_err(|source| CryptoError::KeyRead {
        path: path.to_path_buf(),
        source,
    })?;
    let key = SigningKey::from_pem(&pem, SignatureScheme::RsassaPssSha256)?;
    tracing::info!(path = %path.display(), keyid = %key.key_id(), "signing key loaded");
    Ok(key)
}

/// Parses the RSA public key of a key record (SPKI PEM, PKCS#1 as fallback).
pub(crate) fn parse_public(key: &Key) -> Result<RsaPublicKey, CryptoError> {
    use rsa::pkcs1::DecodeRsaPublicKey;

    let pem = key.keyval.public.trim();
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| CryptoError::InvalidPublicKey {
            key_id: key.keyid.clone(),
            reason: e.to_string(),
        })
}
