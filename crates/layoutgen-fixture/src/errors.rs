//! Errors raised while generating the fixture.

use layoutgen_crypto::CryptoError;
use layoutgen_model::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors of fixture generation. None of them is retried.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// The signing key file is missing or does not hold a usable RSA private key.
    #[error("failed to load signing key: {0}")]
    KeyLoad(#[source] CryptoError),
    /// The layout fails structural validation.
    #[error("layout failed validation: {0}")]
    Schema(#[from] SchemaError),
    /// Signing the layout failed.
    #[error("failed to sign layout: {0}")]
    Signing(#[source] CryptoError),
    /// The output file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
