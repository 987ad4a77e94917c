//! Key loading, signing and verification for layout metadata.
//!
//! Keys are RSA, loaded from PEM (PKCS#8 or PKCS#1 private keys, SPKI
//! public keys) and used with RSASSA-PSS over SHA-256. Everything is signed
//! over the canonical encoding of the metablock's `signed` part.

#![deny(missing_docs)]

pub mod errors;
pub mod keys;
pub mod signing;
pub mod verification;

pub use errors::CryptoError;
pub use keys::{load_signing_key, SigningKey};
pub use signing::{generate_signature, sign_metablock};
pub use verification::{
    all_verified, verify_layout_signatures, verify_metablock, verify_signature, SignatureVerdict,
};
