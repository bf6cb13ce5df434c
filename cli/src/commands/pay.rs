//! Prepare a stealth payment and record its announcement

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use rand::rngs::OsRng;
use stealth_core::{prepare_payment, MetaAddress};

use crate::announcement_log::AnnouncementLog;
use crate::config::Config;

pub struct PayOptions {
    pub to: String,
    pub amount: u64,
    pub asset: String,
    pub label: String,
    pub announce_only: bool,
    pub log: Option<PathBuf>,
}

pub fn run(config: &Config, options: PayOptions) -> Result<()> {
    let recipient: MetaAddress = options
        .to
        .parse()
        .context("Invalid meta-address format")?;

    let mut announcement = prepare_payment(
        &recipient,
        options.amount,
        &options.asset,
        &options.label,
        &mut OsRng,
    )?;
    if options.announce_only {
        announcement = announcement.into_announce_only();
    }

    let log = AnnouncementLog::new(options.log.unwrap_or_else(|| config.announcements_file()));
    log.append(&announcement)?;

    println!();
    println!("{}", "Stealth payment prepared".green().bold());
    println!();
    println!("{}:", "Pay to (one-time address)".yellow());
    println!("  {}", announcement.stealth_address());
    println!();
    println!("  Amount: {} {}", announcement.amount, announcement.asset);
    if !options.label.is_empty() {
        println!("  Label:  {}", announcement.label_text());
    }
    println!(
        "  Kind:   {}",
        if announcement.announce { "announcement only" } else { "payment" }
    );
    println!();
    println!(
        "{}",
        format!("Announcement appended to: {}", log.path().display()).dimmed()
    );
    println!(
        "{}",
        "Transfer the funds to the one-time address and publish the announcement.".dimmed()
    );

    Ok(())
}
