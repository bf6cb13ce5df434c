//! Export view key (scan-only capability)

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::secure_storage::{unlock, SecureKeyStorage};

pub fn run(config: &Config) -> Result<()> {
    let keys = unlock(&SecureKeyStorage::new(config.keys_file()))?;

    println!();
    println!("{}", "View Key Export".yellow().bold());
    println!();
    println!(
        "{}",
        "The view key allows scanning for payments WITHOUT spending capability.".dimmed()
    );
    println!(
        "{}",
        "Share this with accountants/auditors who need to see your transactions.".dimmed()
    );
    println!();
    println!("{}:", "View Key (view secret + spend pubkey)".yellow());
    println!();
    println!("  {}", keys.view_key().encode());
    println!();
    println!(
        "{}",
        "WARNING: Anyone with this key can see all your incoming payments!".red()
    );
    println!("{}", "         They CANNOT spend your funds.".green());

    Ok(())
}
