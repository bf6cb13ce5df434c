//! Scan the announcement log for incoming stealth payments

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use stealth_core::{scan_announcements, ViewKey};

use crate::announcement_log::AnnouncementLog;
use crate::config::Config;
use crate::secure_storage::{unlock, SecureKeyStorage};

pub struct ScanOptions {
    pub log: Option<PathBuf>,
    /// Exported view key; scan without unlocking the key file
    pub view_key: Option<String>,
}

pub fn run(config: &Config, options: ScanOptions) -> Result<()> {
    println!("{}", "Scanning for incoming stealth payments...".cyan());

    let view_key = match options.view_key {
        Some(ref encoded) => ViewKey::decode(encoded).context("Invalid view key")?,
        None => unlock(&SecureKeyStorage::new(config.keys_file()))?.view_key(),
    };

    let log = AnnouncementLog::new(options.log.unwrap_or_else(|| config.announcements_file()));
    let loaded = log.load()?;
    println!("Reading announcements from {}...", log.path().display());

    let report = scan_announcements(&view_key, &loaded.announcements);

    println!();
    println!(
        "Scanned {} announcements, {} malformed, {} unreadable lines",
        report.scanned, report.malformed, loaded.unreadable
    );
    println!();

    if report.detected.is_empty() {
        println!("{}", "No stealth payments found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} payment(s):", report.detected.len()).green().bold()
    );
    println!();

    let mut total: u128 = 0;
    for (i, announcement) in report.detected.iter().enumerate() {
        println!("{}. {}", i + 1, announcement.stealth_address().green());
        println!("   Amount: {} {}", announcement.amount, announcement.asset);
        let label = announcement.label_text();
        if !label.is_empty() {
            println!("   Label:  {}", label);
        }
        if announcement.announce {
            println!("   {}", "(announcement only)".dimmed());
        } else {
            total += u128::from(announcement.amount);
        }
        println!();
    }

    println!("Total received (payments): {}", total);
    println!();
    println!(
        "{}",
        "Use 'pivy sign --stealth <address>' to authorize spending from an address.".dimmed()
    );

    Ok(())
}
