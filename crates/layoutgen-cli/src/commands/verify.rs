//! Verify command implementation.

use layoutgen_crypto::{all_verified, verify_layout_signatures, SignatureVerdict};
use layoutgen_model::Metablock;
use serde_json::json;
use std::path::PathBuf;

use super::CommandError;
use crate::output::{format_json, format_verdict_row, print_verdict_header, verdict_json};

pub fn run(layout: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let block = Metablock::load(&layout)
        .map_err(|e| format!("Failed to load {}: {}", layout.display(), e))?;
    block.signed.validate()?;

    let verdicts = verify_layout_signatures(&block)?;
    let ok = all_verified(&verdicts);

    if json_output {
        let output = json!({
            "layout": layout.display().to_string(),
            "verified": ok,
            "signatures": verdicts
                .iter()
                .map(|(id, verdict)| verdict_json(id, verdict))
                .collect::<Vec<_>>(),
        });
        println!("{}", format_json(&output));
    } else {
        print_verdict_header();
        for (id, verdict) in &verdicts {
            println!("{}", format_verdict_row(id, verdict));
        }
    }

    if verdicts.is_empty() {
        return Err(CommandError::Unsigned { path: layout }.into());
    }
    if !ok {
        let failed = verdicts
            .iter()
            .filter(|(_, v)| *v != SignatureVerdict::Ok)
            .count();
        return Err(CommandError::VerificationFailed {
            path: layout,
            failed,
            total: verdicts.len(),
        }
        .into());
    }
    Ok(())
}
