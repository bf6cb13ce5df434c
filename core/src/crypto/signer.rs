//! EdDSA signing directly from a derived scalar
//!
//! A DKSAP spending key is a reduced scalar `p = a + t mod L`, not a seed, so
//! it cannot go through the usual seed -> SHA-512 -> clamp keypair
//! constructor. The signer below runs RFC 8032 §5.1.6 on the scalar itself:
//!
//! ```text
//! prefix = SHA512(p)[32..64]
//! r      = SHA512(prefix || M) mod L
//! R      = r·G
//! k      = SHA512(R || P || M) mod L
//! S      = r + k·p mod L
//! sig    = R || S
//! ```
//!
//! The output verifies under any conformant Ed25519 verifier for `P = p·G`.

use std::fmt;

use curve25519_dalek::scalar::Scalar;
use ed25519_dalek::{PublicKey as DalekPublicKey, Signature as DalekSignature, Verifier};
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use super::scalar::{base_multiply, hash_to_scalar_wide};
use crate::encoding::encode_address;
use crate::error::{Result, StealthError};
use crate::keys::SecretScalar;

pub const SIGNATURE_LEN: usize = 64;

/// Signs for one stealth address; owns its scalar and never exposes it
pub struct StealthSigner {
    scalar: SecretScalar,
    public: [u8; 32],
}

impl StealthSigner {
    /// Create a signer from a DKSAP-derived scalar
    pub fn from_scalar(scalar: &Scalar) -> Self {
        Self {
            scalar: SecretScalar::from_scalar(scalar),
            public: base_multiply(scalar),
        }
    }

    /// `public` must equal `scalar·G`; callers inside the crate have already
    /// computed it
    pub(crate) fn from_secret(scalar: SecretScalar, public: [u8; 32]) -> Self {
        Self { scalar, public }
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.public
    }

    /// Deterministic Ed25519 signature over `message`
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        let mut expanded = [0u8; 64];
        expanded.copy_from_slice(&Sha512::digest(self.scalar.as_bytes()));
        let prefix = &expanded[32..];

        let r = hash_to_scalar_wide(&[prefix, message]);
        let big_r = base_multiply(&r);
        let k = hash_to_scalar_wide(&[&big_r, &self.public, message]);
        let s = r + k * self.scalar.to_scalar();

        expanded.zeroize();

        let mut signature = [0u8; SIGNATURE_LEN];
        signature[..32].copy_from_slice(&big_r);
        signature[32..].copy_from_slice(s.as_bytes());
        signature
    }
}

impl PartialEq for StealthSigner {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
    }
}

impl fmt::Debug for StealthSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StealthSigner")
            .field("pubkey", &encode_address(&self.public))
            .finish_non_exhaustive()
    }
}

/// Standard Ed25519 verification of `signature` over `message`
pub fn verify_signature(
    pubkey: &[u8; 32],
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
) -> Result<()> {
    let public = DalekPublicKey::from_bytes(pubkey)
        .map_err(|e| StealthError::InvalidKeyMaterial(format!("Invalid pubkey: {}", e)))?;
    let signature = DalekSignature::try_from(&signature[..])
        .map_err(|_| StealthError::InvalidSignature)?;

    public
        .verify(message, &signature)
        .map_err(|_| StealthError::InvalidSignature)
}
