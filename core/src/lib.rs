//! PIVY stealth engine
//!
//! Client-side implementation of DKSAP (Dual-Key Stealth Address Protocol)
//! over Ed25519, ledger-agnostic:
//! - Payer: one-time stealth pubkey + encrypted ephemeral-key memo
//! - Receiver: view-key detection, memo decryption, dual-path re-derivation
//!   and EdDSA signing directly from the derived scalar
//!
//! Security features:
//! - Secret seeds and scalars are zeroized on drop
//! - Constant-time comparison for derived keys
//! - All randomness comes from a caller-supplied CSPRNG

// op_ref warnings are common with curve25519-dalek ergonomics
#![allow(clippy::op_ref)]

pub mod crypto;
pub mod encoding;
pub mod error;
pub mod keys;
pub mod payment;


#[cfg(test)]
mod test_vectors;

#[cfg(test)]
mod fuzz_tests;

pub use crypto::{
    check_payment, decrypt_ephemeral_key, derive_stealth_public_key, derive_stealth_scalar,
    derive_stealth_signer, ecdh, encrypt_ephemeral_key, verify_derivation, verify_signature,
    EncryptedMemo, StealthKeyDerivation, StealthSigner,
};
pub use error::{Result, StealthError};
pub use keys::{Keypair, MetaAddress, MetaKeys, ViewKey};
pub use payment::{
    check_announcement, open_payment, prepare_payment, scan_announcements, PaymentAnnouncement,
    ScanReport,
};
