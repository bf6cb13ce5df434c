//! JSON-lines announcement log
//!
//! One `PaymentAnnouncement` per line. Stands in for the ledger's
//! announcement feed: `pay` appends, `scan` and `sign` read.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use stealth_core::PaymentAnnouncement;
use tracing::{debug, warn};

/// Announcements read from a log, plus lines that did not parse
#[derive(Debug, Default)]
pub struct LoadedLog {
    pub announcements: Vec<PaymentAnnouncement>,
    pub unreadable: usize,
}

pub struct AnnouncementLog {
    path: PathBuf,
}

impl AnnouncementLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, announcement: &PaymentAnnouncement) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create log directory")?;
        }

        let mut line = serde_json::to_string(announcement)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .context("Failed to append announcement")?;

        debug!(path = %self.path.display(), stealth = %announcement.stealth_address(), "appended announcement");
        Ok(())
    }

    /// Read every announcement; a missing file is an empty log
    pub fn load(&self) -> Result<LoadedLog> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadedLog::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let mut log = LoadedLog::default();
        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(announcement) => log.announcements.push(announcement),
                Err(e) => {
                    warn!(line = number + 1, error = %e, "skipping unreadable announcement");
                    log.unreadable += 1;
                }
            }
        }

        Ok(log)
    }
}
