//! Layout metadata model for supply-chain policy documents.
//!
//! This crate provides typed structures for layouts, steps, inspections,
//! functionary keys and the signed envelope that carries them, together with
//! the structural validation a layout must pass before it is signed.

#![deny(missing_docs)]

pub mod errors;
pub mod key;
pub mod layout;
pub mod metablock;
pub mod rule;
pub mod signature;
pub mod step;

pub use errors::SchemaError;
pub use key::{Key, KeyType, KeyVal, SignatureScheme, DEFAULT_KEYID_HASH_ALGORITHMS};
pub use layout::{Layout, LAYOUT_TYPE};
pub use metablock::Metablock;
pub use rule::{ArtifactKind, ArtifactRule};
pub use signature::Signature;
pub use step::{Inspection, Step, INSPECTION_TYPE, STEP_TYPE};
