//! Sign a message with the one-time key of a received payment

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use stealth_core::encoding::decode_key;
use stealth_core::{open_payment, verify_signature};

use super::message_bytes;
use crate::announcement_log::AnnouncementLog;
use crate::config::Config;
use crate::secure_storage::{unlock, SecureKeyStorage};

pub struct SignOptions {
    pub stealth: String,
    pub message: Option<String>,
    pub message_hex: Option<String>,
    pub log: Option<PathBuf>,
}

pub fn run(config: &Config, options: SignOptions) -> Result<()> {
    let stealth = decode_key(&options.stealth).context("Invalid stealth address")?;
    let message = message_bytes(options.message.as_deref(), options.message_hex.as_deref())?;

    let log = AnnouncementLog::new(options.log.unwrap_or_else(|| config.announcements_file()));
    let loaded = log.load()?;
    let Some(announcement) = loaded
        .announcements
        .iter()
        .find(|a| a.stealth_owner == stealth)
    else {
        bail!(
            "No announcement for {} in {}",
            options.stealth,
            log.path().display()
        );
    };

    let keys = unlock(&SecureKeyStorage::new(config.keys_file()))?;
    let signer = open_payment(&keys, announcement)
        .context("Failed to open payment; it may not be addressed to you")?;

    let signature = signer.sign(&message);
    verify_signature(&signer.public_key(), &message, &signature)
        .context("Produced signature did not verify")?;

    println!();
    println!("{}", "Message signed with stealth key".green().bold());
    println!();
    println!("  Signer:    {}", announcement.stealth_address());
    println!("  Signature: {}", hex::encode(signature));

    Ok(())
}
