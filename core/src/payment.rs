//! Payment announcements
//!
//! Every payment, or log-only announcement, publishes the stealth owner, the
//! ephemeral public key and the encrypted memo. Recipients detect their
//! announcements with the view key and open them with the full meta keys.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::crypto::{
    check_payment, decrypt_ephemeral_key, derive_stealth_public_key, derive_stealth_signer,
    encrypt_ephemeral_key, ensure_consistent, EncryptedMemo, StealthSigner,
};
use crate::encoding::encode_address;
use crate::error::{Result, StealthError, MAX_LABEL_LEN};
use crate::keys::{Keypair, MetaAddress, MetaKeys, ViewKey};

/// Published record of a stealth payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAnnouncement {
    /// One-time destination key
    #[serde(with = "base58_key")]
    pub stealth_owner: [u8; 32],
    /// Ephemeral public key (R)
    #[serde(with = "base58_key")]
    pub eph_pubkey: [u8; 32],
    /// Base58 `nonce || ciphertext`
    pub memo: String,
    /// Zero-padded UTF-8 label
    #[serde(with = "hex_label")]
    pub label: [u8; MAX_LABEL_LEN],
    /// Base units of `asset`
    pub amount: u64,
    /// Opaque asset identifier (mint, denom, ...)
    pub asset: String,
    /// `false` = funds moved with the payment, `true` = log-only announcement
    pub announce: bool,
}

impl PaymentAnnouncement {
    pub fn label_text(&self) -> String {
        label_text(&self.label)
    }

    pub fn stealth_address(&self) -> String {
        encode_address(&self.stealth_owner)
    }

    /// Turn a payment into a log-only announcement of the same transfer
    pub fn into_announce_only(mut self) -> Self {
        self.announce = true;
        self
    }
}

/// Pack a text label into its fixed 32-byte field
pub fn encode_label(label: &str) -> Result<[u8; MAX_LABEL_LEN]> {
    let bytes = label.as_bytes();
    if bytes.len() > MAX_LABEL_LEN {
        return Err(StealthError::LabelTooLong(bytes.len()));
    }
    let mut out = [0u8; MAX_LABEL_LEN];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

pub fn label_text(label: &[u8; MAX_LABEL_LEN]) -> String {
    let end = label.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&label[..end]).into_owned()
}

/// Payer side: fresh ephemeral key, stealth owner and memo for `recipient`
///
/// The ephemeral seed is dropped (and zeroized) before returning.
pub fn prepare_payment<R: RngCore + CryptoRng>(
    recipient: &MetaAddress,
    amount: u64,
    asset: &str,
    label: &str,
    rng: &mut R,
) -> Result<PaymentAnnouncement> {
    if amount == 0 {
        return Err(StealthError::InvalidAmount);
    }
    let label = encode_label(label)?;

    let eph = Keypair::generate(rng);
    let stealth_owner = derive_stealth_public_key(
        &recipient.spend_pubkey,
        &recipient.view_pubkey,
        eph.secret_seed(),
    )?;
    let memo = encrypt_ephemeral_key(eph.secret_seed(), &recipient.view_pubkey, rng)?;

    debug!(stealth = %encode_address(&stealth_owner), amount, "prepared stealth payment");

    Ok(PaymentAnnouncement {
        stealth_owner,
        eph_pubkey: eph.public_key(),
        memo: memo.encode(),
        label,
        amount,
        asset: asset.to_string(),
        announce: false,
    })
}

/// View-key detection of a single announcement
pub fn check_announcement(view_key: &ViewKey, announcement: &PaymentAnnouncement) -> Result<bool> {
    check_payment(
        view_key.view_seed(),
        &view_key.spend_pubkey,
        &announcement.eph_pubkey,
        &announcement.stealth_owner,
    )
}

/// Receiver side: decrypt, re-derive on both paths, confirm the announced
/// owner and return a signer for it
///
/// Memo and mismatch failures are returned as-is; callers must not treat
/// them as "not mine".
pub fn open_payment(keys: &MetaKeys, announcement: &PaymentAnnouncement) -> Result<StealthSigner> {
    let memo = EncryptedMemo::decode(&announcement.memo)?;
    let eph = decrypt_ephemeral_key(&memo, keys.view().secret_seed(), &announcement.eph_pubkey)?;

    let signer = derive_stealth_signer(keys, eph.secret_seed())?;
    ensure_consistent(&announcement.stealth_owner, &signer.public_key())?;

    Ok(signer)
}

/// Outcome of scanning a batch of announcements
#[derive(Debug, Default)]
pub struct ScanReport<'a> {
    pub scanned: usize,
    pub malformed: usize,
    pub detected: Vec<&'a PaymentAnnouncement>,
}

/// Detect announcements addressed to `view_key`
///
/// Announcements whose keys are not valid points are counted and skipped;
/// they cannot belong to anyone.
pub fn scan_announcements<'a, I>(view_key: &ViewKey, announcements: I) -> ScanReport<'a>
where
    I: IntoIterator<Item = &'a PaymentAnnouncement>,
{
    let mut report = ScanReport::default();

    for announcement in announcements {
        report.scanned += 1;
        match check_announcement(view_key, announcement) {
            Ok(true) => {
                debug!(stealth = %announcement.stealth_address(), "detected payment");
                report.detected.push(announcement);
            }
            Ok(false) => {
                trace!(stealth = %announcement.stealth_address(), "not addressed to us");
            }
            Err(e) => {
                debug!(stealth = %announcement.stealth_address(), error = %e, "skipping malformed announcement");
                report.malformed += 1;
            }
        }
    }

    report
}

mod base58_key {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&bs58::encode(bytes).into_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = bs58::decode(&text).into_vec().map_err(D::Error::custom)?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| D::Error::custom(format!("expected 32 bytes, got {}", bytes.len())))
    }
}

mod hex_label {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::error::MAX_LABEL_LEN;

    pub fn serialize<S: Serializer>(
        bytes: &[u8; MAX_LABEL_LEN],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; MAX_LABEL_LEN], D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(D::Error::custom)?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| D::Error::custom(format!("label must be {} bytes", MAX_LABEL_LEN)))
    }
}
