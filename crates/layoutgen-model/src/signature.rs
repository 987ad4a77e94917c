//! Detached signature over the canonical `signed` part of a metablock.

use layoutgen_canonical::KeyId;
use serde::{Deserialize, Serialize};

/// Signature entry of a metablock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Signature {
    /// Id of the key that produced the signature.
    pub keyid: KeyId,
    /// Lowercase hex signature bytes.
    pub sig: String,
}
