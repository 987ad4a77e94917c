//! Canonicalize command implementation.

use layoutgen_canonical::Canonicalizer;
use serde_json::Value;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use super::CommandError;

pub fn run(input: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::new();

    // Read JSON from file or stdin
    let json_str = if let Some(path) = input {
        std::fs::read_to_string(&path).map_err(|source| CommandError::ReadInput { path, source })?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let value: Value =
        serde_json::from_str(&json_str).map_err(|e| format!("Invalid JSON: {}", e))?;

    let bytes = canonicalizer
        .canonicalize(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    // Raw bytes: canonical strings may hold unescaped control characters.
    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
