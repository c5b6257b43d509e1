//! Sign command implementation
//!
//! Prints the canonical form of a webhook payload and the signature a
//! receiver should expect for it.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::io::Read;
use std::process::ExitCode;

use gensprite_spec::canonicalize_json;

use crate::webhook::{sign_payload, SIGNATURE_HEADER};

/// Canonical body and signature of a JSON payload.
pub fn sign_json(payload: &str, secret: &str) -> Result<(String, String)> {
    let value: serde_json::Value =
        serde_json::from_str(payload).context("Failed to parse payload JSON")?;
    let body = canonicalize_json(&value);
    let signature = sign_payload(secret.as_bytes(), body.as_bytes());
    Ok((body, signature))
}

/// Run the sign command
///
/// # Arguments
/// * `secret` - Webhook secret
/// * `input` - Payload file (default: stdin)
pub fn run(secret: &str, input: Option<&str>) -> Result<ExitCode> {
    if secret.is_empty() {
        bail!("--secret must not be empty");
    }

    let payload = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload: {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read payload from stdin")?;
            buf
        }
    };

    let (body, signature) = sign_json(&payload, secret)?;
    println!("{}", body);
    println!("{}: {}", SIGNATURE_HEADER.cyan(), signature);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sign_canonicalizes_first() {
        let (body, signature) =
            sign_json("{ \"status\": \"processing\",\n \"job_id\": \"j1\" }", "s3cret").unwrap();
        assert_eq!(body, r#"{"job_id":"j1","status":"processing"}"#);
        assert_eq!(signature, sign_payload(b"s3cret", body.as_bytes()));

        let (_, reordered) =
            sign_json(r#"{"job_id":"j1","status":"processing"}"#, "s3cret").unwrap();
        assert_eq!(signature, reordered);
    }

    #[test]
    fn test_sign_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        fs::write(&path, r#"{"job_id":"j1"}"#).unwrap();
        assert_eq!(run("k", Some(path.to_str().unwrap())).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = sign_json("{not json", "k").unwrap_err();
        assert!(err.to_string().contains("Failed to parse payload JSON"));
    }
}
