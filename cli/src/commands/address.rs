//! Display stealth meta-address

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::secure_storage::SecureKeyStorage;

pub fn run(config: &Config) -> Result<()> {
    let address = SecureKeyStorage::new(config.keys_file()).meta_address()?;

    println!();
    println!("{}", "Your Stealth Meta-Address".yellow().bold());
    println!();
    println!("{}", address);
    println!();
    println!("{}:", "Components".dimmed());
    println!("  View pubkey:  {}", hex::encode(address.view_pubkey));
    println!("  Spend pubkey: {}", hex::encode(address.spend_pubkey));
    println!();
    println!(
        "{}",
        "Share the meta-address above to receive private payments.".dimmed()
    );

    Ok(())
}
