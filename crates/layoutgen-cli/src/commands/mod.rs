//! Subcommand implementations.

pub mod canonicalize;
pub mod gen;
pub mod inspect;
pub mod verify;

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the subcommands themselves.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{failed} of {total} signature(s) in {path} did not verify")]
    VerificationFailed {
        path: PathBuf,
        failed: usize,
        total: usize,
    },
    #[error("{path} carries no signatures")]
    Unsigned { path: PathBuf },
}
