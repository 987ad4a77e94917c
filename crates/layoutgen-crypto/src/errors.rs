//! Error types for key handling, signing and verification.

use layoutgen_canonical::KeyId;
use layoutgen_model::{KeyType, SchemaError, SignatureScheme};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by key loading, signing and signature verification.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The key file could not be read.
    #[error("failed to read key file {path}: {source}")]
    KeyRead {
        /// Path of the key file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The input holds no PEM block.
    #[error("failed to decode the data as PEM block (is this a PEM file?)")]
    NoPemBlock,
    /// The PEM block holds a public key where a private key is required.
    #[error("expected an RSA private key, found a public key")]
    NotAPrivateKey,
    /// The PEM block is neither a PKCS#8 nor a PKCS#1 RSA private key.
    #[error("unsupported private key: {0}")]
    UnsupportedKey(String),
    /// The public half could not be encoded.
    #[error("failed to encode public key: {0}")]
    PublicKeyEncoding(String),
    /// Key type without a signing implementation.
    #[error("unsupported key type {0:?}")]
    UnsupportedKeyType(KeyType),
    /// Scheme without a signing implementation.
    #[error("unsupported key scheme {0:?}")]
    UnsupportedScheme(SignatureScheme),
    /// Signature value is not valid hex.
    #[error("invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// The public key of a key record could not be parsed.
    #[error("invalid public key for '{key_id}': {reason}")]
    InvalidPublicKey {
        /// Key id of the record.
        key_id: KeyId,
        /// Parser message.
        reason: String,
    },
    /// Signature does not verify.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    /// No signature made with the requested key.
    #[error("no signature found for key '{0}'")]
    SignatureMissing(KeyId),
    /// The signing primitive failed.
    #[error("signing failed: {0}")]
    Signing(String),
    /// The signed payload could not be encoded.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
