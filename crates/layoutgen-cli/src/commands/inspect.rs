//! Inspect command implementation.

use chrono::Utc;
use layoutgen_canonical::{Digest, HashAlgorithm};
use layoutgen_model::{ArtifactRule, Metablock};
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::output::{format_json, truncate};

fn rule_strings(rules: &[ArtifactRule]) -> Vec<String> {
    rules.iter().map(ToString::to_string).collect()
}

pub fn run(layout: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let block = Metablock::load(&layout)
        .map_err(|e| format!("Failed to load {}: {}", layout.display(), e))?;
    let signed = &block.signed;
    let expired = signed.expires.to_datetime()? < Utc::now().naive_utc();
    let signed_digest = Digest::compute(HashAlgorithm::Sha256, &block.signable_bytes()?);

    if json_output {
        let output = json!({
            "expires": signed.expires.as_str(),
            "expired": expired,
            "signed_digest": signed_digest.to_string(),
            "readme": signed.readme,
            "keys": signed.keys.values().map(|k| json!({
                "keyid": k.keyid.as_str(),
                "keytype": k.keytype,
                "scheme": k.scheme,
            })).collect::<Vec<_>>(),
            "steps": signed.steps.iter().map(|s| json!({
                "name": s.name,
                "expected_command": s.expected_command,
                "expected_materials": rule_strings(&s.expected_materials),
                "expected_products": rule_strings(&s.expected_products),
                "pubkeys": s.pubkeys.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
                "threshold": s.threshold,
            })).collect::<Vec<_>>(),
            "inspections": signed.inspect.iter().map(|i| json!({
                "name": i.name,
                "run": i.run,
            })).collect::<Vec<_>>(),
            "signatures": block.signatures.iter().map(|s| Value::String(s.keyid.to_string())).collect::<Vec<_>>(),
        });
        println!("{}", format_json(&output));
        return Ok(());
    }

    println!("Layout:     {}", layout.display());
    if expired {
        println!("Expires:    {} (expired)", signed.expires);
    } else {
        println!("Expires:    {}", signed.expires);
    }
    println!("Digest:     {}", signed_digest);
    println!("Signatures: {}", block.signatures.len());
    for sig in &block.signatures {
        let known = if signed.keys.contains_key(&sig.keyid) {
            "declared"
        } else {
            "undeclared"
        };
        println!("  {} ({})", sig.keyid, known);
    }

    println!();
    println!("{:<66} {:<8} {}", "KEYID", "TYPE", "SCHEME");
    println!("{}", "-".repeat(94));
    for key in signed.keys.values() {
        println!(
            "{:<66} {:<8} {}",
            key.keyid.as_str(),
            json!(key.keytype).as_str().unwrap_or("?"),
            json!(key.scheme).as_str().unwrap_or("?")
        );
    }

    println!();
    println!("{:<20} {:<9} {:<10} {}", "STEP", "THRESHOLD", "PUBKEYS", "COMMAND");
    println!("{}", "-".repeat(80));
    for step in &signed.steps {
        println!(
            "{:<20} {:<9} {:<10} {}",
            truncate(&step.name, 20),
            step.threshold,
            step.pubkeys.len(),
            step.expected_command.join(" ")
        );
        for rule in &step.expected_materials {
            println!("    materials: {}", rule);
        }
        for rule in &step.expected_products {
            println!("    products:  {}", rule);
        }
    }
    for inspection in &signed.inspect {
        println!(
            "{:<20} {:<9} {:<10} {}",
            truncate(&inspection.name, 20),
            "-",
            "-",
            inspection.run.join(" ")
        );
    }

    Ok(())
}
