//! Key generation command with encrypted storage and mnemonic support

use anyhow::{bail, Result};
use colored::Colorize;
use rand::rngs::OsRng;
use stealth_core::MetaKeys;

use crate::config::Config;
use crate::secure_storage::{prompt_new_password, SecureKeyStorage};

/// Options for key generation
pub struct KeygenOptions {
    /// Force overwrite existing keys
    pub force: bool,
    /// Use mnemonic for key generation (allows recovery)
    pub with_mnemonic: bool,
    /// Import from existing mnemonic
    pub import_mnemonic: Option<String>,
    /// Passphrase for mnemonic (optional extra security)
    pub passphrase: Option<String>,
}

/// Build the meta keys the options ask for, with the phrase to display if any
fn build_keys(options: &KeygenOptions) -> Result<(MetaKeys, Option<String>)> {
    if let Some(ref phrase) = options.import_mnemonic {
        let passphrase = options.passphrase.as_deref().unwrap_or("");
        // An imported phrase is already known to the user
        return Ok((MetaKeys::from_mnemonic(phrase, passphrase)?, None));
    }
    if options.with_mnemonic {
        let (keys, phrase) = MetaKeys::generate_with_mnemonic(&mut OsRng)?;
        return Ok((keys, Some(phrase)));
    }
    Ok((MetaKeys::generate(&mut OsRng), None))
}

pub fn run(config: &Config, options: KeygenOptions) -> Result<()> {
    let storage = SecureKeyStorage::new(config.keys_file());

    if storage.exists() && !options.force {
        bail!(
            "Stealth keys already exist. Use --force to overwrite.\n\
             Warning: Overwriting keys will make any existing stealth payments unrecoverable!"
        );
    }

    println!("{}", "=== PIVY Stealth Key Generation ===".cyan().bold());
    println!();

    if options.import_mnemonic.is_some() {
        println!("{}", "Importing keys from mnemonic phrase...".cyan());
    } else if options.with_mnemonic {
        println!("{}", "Generating keys with recovery phrase...".cyan());
    } else {
        println!("{}", "Generating random keys (no recovery phrase)...".cyan());
        println!(
            "{}",
            "Warning: Without a recovery phrase, losing your password means losing your funds!"
                .yellow()
        );
    }
    let (keys, mnemonic) = build_keys(&options)?;

    println!();
    println!("{}", "Choose a strong password to encrypt your keys.".cyan());
    println!("{}", "Requirements: 8+ chars, uppercase, lowercase, and numbers".dimmed());
    println!();

    let password = prompt_new_password("Enter password: ")?;
    storage.save(&keys, &password)?;

    println!();
    println!("{}", "Keys generated and encrypted successfully!".green().bold());
    println!();

    if let Some(ref phrase) = mnemonic {
        print_mnemonic(phrase);
    }

    let address = keys.meta_address();
    println!("{}:", "View Public Key".yellow());
    println!("  {}", hex::encode(address.view_pubkey));
    println!();
    println!("{}:", "Spend Public Key".yellow());
    println!("  {}", hex::encode(address.spend_pubkey));
    println!();
    println!("{}:", "Meta-Address (share this to receive payments)".yellow());
    println!("  {}", address);
    println!();
    println!(
        "{}",
        format!("Encrypted keys saved to: {}", storage.path().display()).dimmed()
    );
    println!();

    if mnemonic.is_none() && options.import_mnemonic.is_none() {
        println!("{}", "IMPORTANT: You did not use a recovery phrase.".red().bold());
        println!(
            "{}",
            "If you lose your password, your funds are PERMANENTLY LOST.".red()
        );
        println!(
            "{}",
            "Consider regenerating with --mnemonic for recovery capability.".yellow()
        );
    }

    Ok(())
}

fn print_mnemonic(phrase: &str) {
    println!("{}", "=== RECOVERY PHRASE - WRITE THIS DOWN! ===".red().bold());
    println!();
    println!("{}", "┌────────────────────────────────────────────────────────────┐".yellow());

    let words: Vec<&str> = phrase.split_whitespace().collect();
    for (i, chunk) in words.chunks(4).enumerate() {
        let line: String = chunk
            .iter()
            .enumerate()
            .map(|(j, word)| format!("{:2}. {:<12}", i * 4 + j + 1, word))
            .collect::<Vec<_>>()
            .join(" ");
        println!("│ {} │", format!("{:<58}", line).yellow());
    }

    println!("{}", "└────────────────────────────────────────────────────────────┘".yellow());
    println!();
    println!("{}", "CRITICAL: Store this phrase securely OFFLINE!".red().bold());
    println!("{}", "Anyone with this phrase can recover your keys.".red());
    println!("{}", "You will NOT be shown this phrase again.".red());
    println!();
}
