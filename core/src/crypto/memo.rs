//! Ephemeral-key memo cipher
//!
//! The payer hands the recipient its one-time ephemeral private key inside a
//! payment memo:
//!
//! ```text
//! memo      = nonce (24) || ciphertext (64)           88 bytes, base58 on the wire
//! plaintext = eph_seed (32) || eph_pubkey (32)
//! keystream = SHA256(ecdh(eph_seed, view_pubkey))     tiled over the plaintext
//! ```
//!
//! The nonce is random and carried for wire-format stability only; it takes
//! no part in decryption. There is no MAC: the sole integrity check is that
//! the decrypted seed re-derives the decrypted (and announced) public key.
//! An AEAD construction would be stronger but would change the wire format.

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroize;

use super::ecdh::{ecdh, SharedSecret};
use super::scalar::public_from_seed;
use crate::error::{Result, StealthError};
use crate::keys::Keypair;

pub const NONCE_LEN: usize = 24;
pub const PLAINTEXT_LEN: usize = 64;
pub const MEMO_LEN: usize = NONCE_LEN + PLAINTEXT_LEN;

/// `nonce || ciphertext`, exactly `MEMO_LEN` bytes
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EncryptedMemo {
    bytes: [u8; MEMO_LEN],
}

impl EncryptedMemo {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; MEMO_LEN] = bytes.try_into().map_err(|_| {
            StealthError::Encoding(format!(
                "memo must be {} bytes, got {}",
                MEMO_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; MEMO_LEN] {
        &self.bytes
    }

    pub fn nonce(&self) -> &[u8] {
        &self.bytes[..NONCE_LEN]
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.bytes[NONCE_LEN..]
    }

    /// Base58 transport form
    pub fn encode(&self) -> String {
        bs58::encode(&self.bytes).into_string()
    }

    pub fn decode(input: &str) -> Result<Self> {
        let bytes = bs58::decode(input.trim())
            .into_vec()
            .map_err(|e| StealthError::Encoding(format!("memo: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for EncryptedMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for EncryptedMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncryptedMemo").field(&self.encode()).finish()
    }
}

impl FromStr for EncryptedMemo {
    type Err = StealthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

fn keystream(shared: &SharedSecret) -> [u8; 32] {
    Sha256::digest(shared.as_bytes()).into()
}

fn apply_keystream(data: &mut [u8], keystream: &[u8; 32]) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= keystream[i % keystream.len()];
    }
}

/// Encrypt the ephemeral seed for the holder of `recipient_view_pubkey`
pub fn encrypt_ephemeral_key<R: RngCore + CryptoRng>(
    eph_seed: &[u8; 32],
    recipient_view_pubkey: &[u8; 32],
    rng: &mut R,
) -> Result<EncryptedMemo> {
    let shared = ecdh(eph_seed, recipient_view_pubkey)?;
    let mut stream = keystream(&shared);

    let mut bytes = [0u8; MEMO_LEN];
    rng.fill_bytes(&mut bytes[..NONCE_LEN]);

    let body = &mut bytes[NONCE_LEN..];
    body[..32].copy_from_slice(eph_seed);
    body[32..].copy_from_slice(&public_from_seed(eph_seed));
    apply_keystream(body, &stream);

    stream.zeroize();
    Ok(EncryptedMemo { bytes })
}

/// Recover the ephemeral keypair from a memo
///
/// `eph_pubkey` is the ephemeral public key announced next to the memo. The
/// decrypted seed must re-derive both the public key inside the plaintext
/// and the announced one, otherwise `MemoIntegrity` is returned.
pub fn decrypt_ephemeral_key(
    memo: &EncryptedMemo,
    view_seed: &[u8; 32],
    eph_pubkey: &[u8; 32],
) -> Result<Keypair> {
    let shared = ecdh(view_seed, eph_pubkey)?;
    let mut stream = keystream(&shared);

    let mut plaintext = [0u8; PLAINTEXT_LEN];
    plaintext.copy_from_slice(memo.ciphertext());
    apply_keystream(&mut plaintext, &stream);
    stream.zeroize();

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&plaintext[..32]);
    let recovered_pubkey = &plaintext[32..];
    let keypair = Keypair::from_seed(seed);
    let computed_pubkey = keypair.public_key();

    let matches_plaintext = computed_pubkey[..].ct_eq(recovered_pubkey);
    let matches_announced = computed_pubkey[..].ct_eq(&eph_pubkey[..]);

    seed.zeroize();
    plaintext.zeroize();

    if !bool::from(matches_plaintext & matches_announced) {
        debug!("memo integrity check failed");
        return Err(StealthError::MemoIntegrity);
    }

    Ok(keypair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup() -> (StdRng, Keypair, Keypair) {
        let mut rng = StdRng::seed_from_u64(7);
        let eph = Keypair::generate(&mut rng);
        let view = Keypair::generate(&mut rng);
        (rng, eph, view)
    }

    #[test]
    fn test_memo_roundtrip() {
        let (mut rng, eph, view) = setup();

        let memo = encrypt_ephemeral_key(eph.secret_seed(), &view.public_key(), &mut rng).unwrap();
        assert_eq!(memo.as_bytes().len(), MEMO_LEN);

        let recovered = decrypt_ephemeral_key(&memo, view.secret_seed(), &eph.public_key()).unwrap();
        assert_eq!(recovered.secret_seed(), eph.secret_seed());
        assert_eq!(recovered.public_key(), eph.public_key());
    }

    #[test]
    fn test_memo_does_not_leak_plaintext() {
        let (mut rng, eph, view) = setup();
        let memo = encrypt_ephemeral_key(eph.secret_seed(), &view.public_key(), &mut rng).unwrap();

        assert_ne!(&memo.ciphertext()[..32], eph.secret_seed());
        assert_ne!(&memo.ciphertext()[32..], &eph.public_key());
    }

    #[test]
    fn test_nonce_varies_but_is_not_used() {
        let (mut rng, eph, view) = setup();
        let memo1 = encrypt_ephemeral_key(eph.secret_seed(), &view.public_key(), &mut rng).unwrap();
        let memo2 = encrypt_ephemeral_key(eph.secret_seed(), &view.public_key(), &mut rng).unwrap();

        assert_ne!(memo1.nonce(), memo2.nonce());
        assert_eq!(memo1.ciphertext(), memo2.ciphertext());

        let mut bytes = *memo1.as_bytes();
        bytes[0] ^= 0xFF;
        let altered = EncryptedMemo::from_bytes(&bytes).unwrap();
        assert!(decrypt_ephemeral_key(&altered, view.secret_seed(), &eph.public_key()).is_ok());
    }

    #[test]
    fn test_wrong_view_key_fails_integrity() {
        let (mut rng, eph, view) = setup();
        let other = Keypair::generate(&mut rng);
        let memo = encrypt_ephemeral_key(eph.secret_seed(), &view.public_key(), &mut rng).unwrap();

        let result = decrypt_ephemeral_key(&memo, other.secret_seed(), &eph.public_key());
        assert!(matches!(result, Err(StealthError::MemoIntegrity)));
    }

    #[test]
    fn test_every_ciphertext_bit_flip_is_detected() {
        let (mut rng, eph, view) = setup();
        let memo = encrypt_ephemeral_key(eph.secret_seed(), &view.public_key(), &mut rng).unwrap();

        for bit in 0..PLAINTEXT_LEN * 8 {
            let mut bytes = *memo.as_bytes();
            bytes[NONCE_LEN + bit / 8] ^= 1 << (bit % 8);
            let tampered = EncryptedMemo::from_bytes(&bytes).unwrap();

            let result = decrypt_ephemeral_key(&tampered, view.secret_seed(), &eph.public_key());
            assert!(
                matches!(result, Err(StealthError::MemoIntegrity)),
                "bit {} flip went undetected",
                bit
            );
        }
    }

    #[test]
    fn test_memo_encoding() {
        let (mut rng, eph, view) = setup();
        let memo = encrypt_ephemeral_key(eph.secret_seed(), &view.public_key(), &mut rng).unwrap();

        let decoded: EncryptedMemo = memo.to_string().parse().unwrap();
        assert_eq!(decoded, memo);

        let short = bs58::encode([0u8; 40]).into_string();
        assert!(matches!(
            EncryptedMemo::decode(&short),
            Err(StealthError::Encoding(_))
        ));
    }
}
