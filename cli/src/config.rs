//! Configuration for the PIVY stealth CLI
//!
//! The home directory is resolved from, in order: the `--home` flag, the
//! `PIVY_STEALTH_HOME` environment variable, then `~/.pivy-stealth`.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{bail, Result};

/// Environment override for the home directory
pub const HOME_ENV: &str = "PIVY_STEALTH_HOME";

/// Default directory under the user's home
const STEALTH_DIR: &str = ".pivy-stealth";
const KEYS_FILE: &str = "keys.enc";
const ANNOUNCEMENTS_FILE: &str = "announcements.jsonl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub home: PathBuf,
}

impl Config {
    /// Resolve from the flag, the environment and the user's home directory
    pub fn resolve(home_flag: Option<PathBuf>) -> Result<Self> {
        Self::from_sources(home_flag, std::env::var_os(HOME_ENV), dirs::home_dir())
    }

    fn from_sources(
        home_flag: Option<PathBuf>,
        home_env: Option<OsString>,
        user_home: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(home) = home_flag {
            return Ok(Self { home });
        }
        if let Some(home) = home_env.filter(|v| !v.is_empty()) {
            return Ok(Self { home: PathBuf::from(home) });
        }
        match user_home {
            Some(dir) => Ok(Self { home: dir.join(STEALTH_DIR) }),
            None => bail!(
                "Could not find home directory. Set {} or pass --home.",
                HOME_ENV
            ),
        }
    }

    /// Encrypted key file
    pub fn keys_file(&self) -> PathBuf {
        self.home.join(KEYS_FILE)
    }

    /// Default announcement log
    pub fn announcements_file(&self) -> PathBuf {
        self.home.join(ANNOUNCEMENTS_FILE)
    }
}
