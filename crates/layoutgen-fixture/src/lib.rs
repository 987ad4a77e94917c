//! Root layout fixture generation.
//!
//! Builds the fixed two-step layout (`write-code`, `package`), signs it with
//! an RSA key read from disk and writes the signed metablock as indented JSON.
//!
//! ```no_run
//! use layoutgen_fixture::{generate, DEFAULT_KEY_PATH, DEFAULT_OUTPUT_PATH};
//!
//! let block = generate(DEFAULT_KEY_PATH, DEFAULT_OUTPUT_PATH)?;
//! assert_eq!(block.signatures.len(), 1);
//! # Ok::<(), layoutgen_fixture::FixtureError>(())
//! ```

#![deny(missing_docs)]

pub mod builder;
pub mod errors;
pub mod persist;

pub use builder::{
    build_layout, fixture_key, FixtureBuilder, DEFAULT_KEY_PATH, DEFAULT_OUTPUT_PATH,
    FIXTURE_EXPIRES, FIXTURE_KEY_ID, FIXTURE_PUBLIC_KEY,
};
pub use errors::FixtureError;
pub use layoutgen_crypto::load_signing_key;
pub use persist::{generate, sign_and_persist};
