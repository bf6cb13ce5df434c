//! Diffie-Hellman over Ed25519 keys
//!
//! Private keys are 32-byte Ed25519 seeds; the secret scalar is recovered
//! with the RFC 8032 seed expansion before multiplying the peer's point, so
//! the shared value is the compressed point `a·B = b·A` (what libraries
//! expose as "Ed25519 getSharedSecret").

use zeroize::Zeroize;

use super::scalar::{decompress_point, point_multiply, scalar_from_seed};
use crate::error::Result;

/// Compressed shared point, zeroized on drop
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Shared secret between a private seed and a public point
///
/// Fails with `InvalidKeyMaterial` if `public` is not a valid prime-order
/// point encoding.
pub fn ecdh(private_seed: &[u8; 32], public: &[u8; 32]) -> Result<SharedSecret> {
    let point = decompress_point(public)?;
    let scalar = scalar_from_seed(private_seed);
    let shared = point_multiply(&scalar, &point).compress().to_bytes();
    Ok(SharedSecret(shared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::scalar::public_from_seed;
    use crate::error::StealthError;

    #[test]
    fn test_ecdh_symmetry() {
        let a = [0x11u8; 32];
        let b = [0x22u8; 32];
        let big_a = public_from_seed(&a);
        let big_b = public_from_seed(&b);

        let ab = ecdh(&a, &big_b).unwrap();
        let ba = ecdh(&b, &big_a).unwrap();
        assert_eq!(ab.as_bytes(), ba.as_bytes());
    }

    #[test]
    fn test_ecdh_differs_per_peer() {
        let a = [0x11u8; 32];
        let b = public_from_seed(&[0x22u8; 32]);
        let c = public_from_seed(&[0x33u8; 32]);

        assert_ne!(ecdh(&a, &b).unwrap().as_bytes(), ecdh(&a, &c).unwrap().as_bytes());
    }

    #[test]
    fn test_ecdh_rejects_invalid_point() {
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let result = ecdh(&[0x11u8; 32], &identity);
        assert!(matches!(result, Err(StealthError::InvalidKeyMaterial(_))));
    }
}
