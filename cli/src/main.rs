//! PIVY stealth CLI - offline key management, payments and scanning

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod announcement_log;
mod commands;
mod config;
mod secure_storage;


use commands::*;
use config::Config;

#[derive(Parser)]
#[command(name = "pivy")]
#[command(version)]
#[command(about = "Stealth payments over Ed25519 - private receiving using DKSAP")]
#[command(long_about = r#"
pivy derives a fresh one-time address for every payment to a stealth
meta-address. Only the recipient can link the address to their identity
and authorize spending from it.

Quick Start:
  1. pivy keygen                   Generate your stealth keys
  2. pivy address                  Show the meta-address to share
  3. pivy pay --to <meta-address>  Prepare a payment (payer side)
  4. pivy scan                     Check for incoming payments
  5. pivy sign --stealth <addr>    Authorize spending from a payment
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding keys and the announcement log
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate new stealth key pairs (view + spend keys)
    Keygen {
        /// Force overwrite existing keys
        #[arg(short, long)]
        force: bool,

        /// Generate without a recovery phrase (not recommended)
        #[arg(long)]
        no_mnemonic: bool,

        /// Import from existing recovery phrase
        #[arg(long)]
        import_mnemonic: Option<String>,

        /// Passphrase for mnemonic (optional extra security)
        #[arg(long)]
        passphrase: Option<String>,
    },

    /// Show your stealth meta-address
    Address,

    /// Export view key (scan-only, no spending capability)
    ExportViewKey,

    /// Prepare a payment to a stealth meta-address
    Pay {
        /// Recipient's meta-address (base58 or stealth:... format)
        #[arg(short, long)]
        to: String,

        /// Amount in base units of the asset
        #[arg(short, long)]
        amount: u64,

        /// Asset identifier
        #[arg(long, default_value = "SOL")]
        asset: String,

        /// Optional label (max 32 bytes)
        #[arg(short, long, default_value = "")]
        label: String,

        /// Record an announcement only; no funds move with it
        #[arg(long)]
        announce_only: bool,

        /// Announcement log to append to
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Scan the announcement log for incoming stealth payments
    Scan {
        /// Announcement log to read
        #[arg(long)]
        log: Option<PathBuf>,

        /// Scan with an exported view key instead of the stored keys
        #[arg(long)]
        view_key: Option<String>,
    },

    /// Sign a message with the key of a received payment
    Sign {
        /// Stealth address of the payment (from scan results)
        #[arg(short, long)]
        stealth: String,

        /// Message text
        #[arg(short, long)]
        message: Option<String>,

        /// Message bytes as hex
        #[arg(long)]
        message_hex: Option<String>,

        /// Announcement log to search
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Verify a signature from a stealth address
    Verify {
        /// Signer public key (base58 or hex)
        #[arg(short, long)]
        pubkey: String,

        /// Message text
        #[arg(short, long)]
        message: Option<String>,

        /// Message bytes as hex
        #[arg(long)]
        message_hex: Option<String>,

        /// Signature (hex or base58)
        #[arg(long)]
        signature: String,
    },

    /// Show configuration and key info
    Info,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::resolve(cli.home)?;
    tracing::debug!(home = %config.home.display(), "resolved configuration");

    match cli.command {
        Commands::Keygen {
            force,
            no_mnemonic,
            import_mnemonic,
            passphrase,
        } => keygen::run(
            &config,
            keygen::KeygenOptions {
                force,
                with_mnemonic: !no_mnemonic,
                import_mnemonic,
                passphrase,
            },
        ),
        Commands::Address => address::run(&config),
        Commands::ExportViewKey => export_view_key::run(&config),
        Commands::Pay {
            to,
            amount,
            asset,
            label,
            announce_only,
            log,
        } => pay::run(
            &config,
            pay::PayOptions {
                to,
                amount,
                asset,
                label,
                announce_only,
                log,
            },
        ),
        Commands::Scan { log, view_key } => {
            scan::run(&config, scan::ScanOptions { log, view_key })
        }
        Commands::Sign {
            stealth,
            message,
            message_hex,
            log,
        } => sign::run(
            &config,
            sign::SignOptions {
                stealth,
                message,
                message_hex,
                log,
            },
        ),
        Commands::Verify {
            pubkey,
            message,
            message_hex,
            signature,
        } => verify::run(verify::VerifyOptions {
            pubkey,
            message,
            message_hex,
            signature,
        }),
        Commands::Info => info::run(&config),
    }
}
