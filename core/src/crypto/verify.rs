//! Consistency checks run before any derived key leaves the engine

use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::{Result, StealthError};

/// Compare the point-addition and scalar-path stealth pubkeys
pub fn verify_derivation(by_points: &[u8; 32], by_scalar: &[u8; 32]) -> bool {
    bool::from(by_points[..].ct_eq(&by_scalar[..]))
}

/// `verify_derivation` as a hard failure
pub fn ensure_consistent(by_points: &[u8; 32], by_scalar: &[u8; 32]) -> Result<()> {
    if verify_derivation(by_points, by_scalar) {
        Ok(())
    } else {
        warn!("stealth key derivation paths disagree");
        Err(StealthError::KeyMismatch)
    }
}
