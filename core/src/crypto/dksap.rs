//! DKSAP - Dual-Key Stealth Address Protocol
//!
//! ## Protocol Overview
//!
//! ### Recipient Setup
//! 1. Spend keypair: (a, A) where A = a·G
//! 2. View keypair: (v, V) where V = v·G
//! 3. Publish meta-address: (V, A)
//!
//! ### Payer Flow
//! 1. Generate ephemeral keypair: (r, R)
//! 2. Shared secret: ss = r·V
//! 3. Tweak: t = SHA256(ss) mod L
//! 4. Stealth pubkey: P = A + t·G
//! 5. Pay P, publish R and the encrypted memo
//!
//! ### Recipient Flow
//! 1. Detect: ss = v·R (same as payer), check A + t·G == P
//! 2. Decrypt the memo to recover r
//! 3. Spending scalar: p = a + t mod L, with t recomputed from r·V
//! 4. Cross-check p·G against A + t·G before signing anything

use curve25519_dalek::{constants::ED25519_BASEPOINT_POINT, scalar::Scalar};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, trace};

use super::ecdh::{ecdh, SharedSecret};
use super::scalar::{base_multiply, decompress_point, reduce_mod, scalar_from_seed};
use super::signer::StealthSigner;
use super::verify::ensure_consistent;
use crate::encoding::encode_address;
use crate::error::Result;
use crate::keys::{MetaKeys, SecretScalar};

/// Tweak scalar `t = SHA256(ss) mod L`
pub fn compute_tweak(shared: &SharedSecret) -> Scalar {
    let hash: [u8; 32] = Sha256::digest(shared.as_bytes()).into();
    reduce_mod(&hash)
}

/// Payer path: `P = A + t·G` using only public keys and the ephemeral seed
pub fn derive_stealth_public_key(
    meta_spend_pubkey: &[u8; 32],
    meta_view_pubkey: &[u8; 32],
    eph_seed: &[u8; 32],
) -> Result<[u8; 32]> {
    let shared = ecdh(eph_seed, meta_view_pubkey)?;
    let tweak = compute_tweak(&shared);
    let spend_point = decompress_point(meta_spend_pubkey)?;

    let stealth = (&spend_point + &(&tweak * &ED25519_BASEPOINT_POINT))
        .compress()
        .to_bytes();

    trace!(stealth = %encode_address(&stealth), "derived stealth pubkey by point addition");
    Ok(stealth)
}

/// Result of the receiver's scalar path
pub struct StealthKeyDerivation {
    scalar: SecretScalar,
    pub stealth_pubkey: [u8; 32],
}

impl StealthKeyDerivation {
    /// Consume the derivation into a signer, keeping the scalar unexposed
    pub fn into_signer(self) -> StealthSigner {
        StealthSigner::from_secret(self.scalar, self.stealth_pubkey)
    }
}

/// Receiver path: `p = a + t mod L`, `P = p·G`
///
/// `a` is the RFC 8032 expansion of the meta-spend seed.
pub fn derive_stealth_scalar(
    meta_spend_seed: &[u8; 32],
    meta_view_pubkey: &[u8; 32],
    eph_seed: &[u8; 32],
) -> Result<StealthKeyDerivation> {
    let shared = ecdh(eph_seed, meta_view_pubkey)?;
    let tweak = compute_tweak(&shared);
    let spend_scalar = scalar_from_seed(meta_spend_seed);

    let stealth_scalar = spend_scalar + tweak;
    let stealth_pubkey = base_multiply(&stealth_scalar);

    trace!(stealth = %encode_address(&stealth_pubkey), "derived stealth pubkey by scalar path");
    Ok(StealthKeyDerivation {
        scalar: SecretScalar::from_scalar(&stealth_scalar),
        stealth_pubkey,
    })
}

/// Run both derivation paths for `keys` and hand back a signer only if
/// they agree
///
/// Fails with `KeyMismatch` on disagreement; the flow must stop there.
pub fn derive_stealth_signer(keys: &MetaKeys, eph_seed: &[u8; 32]) -> Result<StealthSigner> {
    let address = keys.meta_address();

    let by_points =
        derive_stealth_public_key(&address.spend_pubkey, &address.view_pubkey, eph_seed)?;
    let derivation =
        derive_stealth_scalar(keys.spend().secret_seed(), &address.view_pubkey, eph_seed)?;

    ensure_consistent(&by_points, &derivation.stealth_pubkey)?;
    debug!(stealth = %encode_address(&by_points), "stealth key derivation verified");

    Ok(derivation.into_signer())
}

/// Check whether `payment_address` belongs to the holder of `view_seed`
///
/// View-key only: `A + H(v·R)·G == P`. Needs no spend secret.
pub fn check_payment(
    view_seed: &[u8; 32],
    spend_pubkey: &[u8; 32],
    eph_pubkey: &[u8; 32],
    payment_address: &[u8; 32],
) -> Result<bool> {
    let shared = ecdh(view_seed, eph_pubkey)?;
    let tweak = compute_tweak(&shared);
    let spend_point = decompress_point(spend_pubkey)?;

    let expected = (&spend_point + &(&tweak * &ED25519_BASEPOINT_POINT))
        .compress()
        .to_bytes();

    Ok(bool::from(expected[..].ct_eq(&payment_address[..])))
}
