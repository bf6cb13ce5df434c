//! CLI subcommands

pub mod address;
pub mod export_view_key;
pub mod info;
pub mod keygen;
pub mod pay;
pub mod scan;
pub mod sign;
pub mod verify;

use anyhow::{bail, Context, Result};

/// Message bytes from either a text or a hex argument
pub fn message_bytes(text: Option<&str>, hex_input: Option<&str>) -> Result<Vec<u8>> {
    match (text, hex_input) {
        (Some(text), None) => Ok(text.as_bytes().to_vec()),
        (None, Some(input)) => hex::decode(input.trim()).context("Invalid hex message"),
        (Some(_), Some(_)) => bail!("Pass either --message or --message-hex, not both"),
        (None, None) => bail!("A message is required (--message or --message-hex)"),
    }
}
