//! Model digest utility for Heartrisk model artifacts.
//!
//! Validates a model artifact and writes its SHA-256 to `model.sha256`
//! next to it, enabling integrity verification at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin model_digest -- <model_dir|model.json> [--check]
//! ```
//!
//! With `--check`, compares against the existing `model.sha256` instead of
//! writing it.

use std::env;
use std::path::PathBuf;

use heartrisk::adapters::model::{write_digest, DigestPolicy, JsonClassifier};
use heartrisk::ports::Classifier;

fn usage() -> String {
    "Usage: model_digest <model_dir|model.json> [--check]".to_string()
}

fn parse_args() -> Result<(PathBuf, bool), String> {
    let mut path: Option<PathBuf> = None;
    let mut check = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--check" => check = true,
            "-h" | "--help" => return Err(usage()),
            _ => {
                if path.is_none() {
                    path = Some(PathBuf::from(arg));
                } else {
                    return Err(usage());
                }
            }
        }
    }

    let path = path.ok_or_else(usage)?;
    Ok((path, check))
}

fn main() -> Result<(), String> {
    let (path, check) = parse_args()?;

    if check {
        let model = JsonClassifier::load(
            &path,
            &DigestPolicy {
                pinned: None,
                required: true,
            },
        )
        .map_err(|e| format!("Verification failed: {e}"))?;
        println!("OK {}", model.describe());
        return Ok(());
    }

    let record = write_digest(&path).map_err(|e| format!("Refusing to digest model: {e}"))?;

    println!(
        "{} model, {} features, classes {:?}",
        record.artifact.kind(),
        record.artifact.n_features(),
        record.artifact.classes
    );
    println!("Wrote {:?}", record.digest_file);
    println!("HEARTRISK_MODEL_SHA256={}", record.digest);

    Ok(())
}
