//! Canonical encoding primitives for supply-chain layout metadata.
//!
//! Signatures and key ids are computed over OLPC canonical JSON, so every
//! byte that participates in signing or key identification is produced here.
//!
#![deny(missing_docs)]

/// Canonical JSON encoder.
pub mod canonicalizer;
/// Hash algorithms and hex digests.
pub mod digest;
/// Core identifiers (key ids, timestamps).
pub mod identifiers;
/// Key id computation.
pub mod key_id;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{encode_canonical, CanonicalizationError, Canonicalizer};
pub use digest::{Digest, HashAlgorithm};
pub use identifiers::{KeyId, Timestamp, TIMESTAMP_FORMAT};
pub use key_id::{compute_key_id, verify_key_id, KeyIdError};
pub use validation::ValidationError;
