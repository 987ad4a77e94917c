//! Generate command implementation.

use layoutgen_fixture::generate;
use std::path::PathBuf;

pub fn run(key: PathBuf, output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let block = generate(&key, &output)?;
    let signer = block
        .signatures
        .first()
        .map(|s| s.keyid.short())
        .unwrap_or("?");
    tracing::info!(
        steps = block.signed.steps.len(),
        keys = block.signed.keys.len(),
        "layout generated"
    );
    println!("Generated {} (signed by {})", output.display(), signer);
    Ok(())
}
