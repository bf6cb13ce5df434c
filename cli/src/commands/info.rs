//! Show configuration and key info

use anyhow::Result;
use colored::Colorize;

use crate::announcement_log::AnnouncementLog;
use crate::config::{Config, HOME_ENV};
use crate::secure_storage::SecureKeyStorage;

pub fn run(config: &Config) -> Result<()> {
    println!();
    println!("{}", "PIVY Stealth Configuration".yellow().bold());
    println!();

    println!("{}:", "Home Directory".cyan());
    println!("  {}", config.home.display());
    println!("  {}", format!("(override with --home or {})", HOME_ENV).dimmed());
    println!();

    let storage = SecureKeyStorage::new(config.keys_file());
    match storage.meta_address() {
        Ok(address) => {
            println!("{}", "Stealth Keys: CONFIGURED".green());
            if let Ok(created_at) = storage.created_at() {
                println!("  Created: {}", created_at);
            }
            println!("  Meta-address: {}", address);
        }
        Err(_) => {
            println!("{}", "Stealth Keys: NOT CONFIGURED".red());
            println!("  Run 'pivy keygen' to generate keys");
        }
    }
    println!();

    let log = AnnouncementLog::new(config.announcements_file());
    println!("{}:", "Announcement Log".cyan());
    match log.load() {
        Ok(loaded) => {
            println!("  Entries: {}", loaded.announcements.len());
            if loaded.unreadable > 0 {
                println!("  {}", format!("Unreadable lines: {}", loaded.unreadable).yellow());
            }
        }
        Err(e) => println!("  {}", format!("Unreadable: {:#}", e).red()),
    }
    println!();

    println!("{}:", "File Locations".cyan());
    println!("  Keys: {}", storage.path().display());
    println!("  Log:  {}", log.path().display());

    Ok(())
}
