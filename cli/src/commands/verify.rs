//! Verify an Ed25519 signature against a stealth address

use anyhow::{Context, Result};
use colored::Colorize;
use stealth_core::encoding::{decode_key, decode_signature};
use stealth_core::verify_signature;

use super::message_bytes;

pub struct VerifyOptions {
    pub pubkey: String,
    pub message: Option<String>,
    pub message_hex: Option<String>,
    pub signature: String,
}

pub fn run(options: VerifyOptions) -> Result<()> {
    let pubkey = decode_key(&options.pubkey).context("Invalid public key")?;
    let signature = decode_signature(&options.signature).context("Invalid signature encoding")?;
    let message = message_bytes(options.message.as_deref(), options.message_hex.as_deref())?;

    verify_signature(&pubkey, &message, &signature).context("Signature is NOT valid")?;

    println!("{}", "Signature is valid.".green().bold());
    Ok(())
}
