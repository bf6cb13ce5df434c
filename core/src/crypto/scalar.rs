//! Scalar and point arithmetic over the Ed25519 prime-order group
//!
//! All scalars are 32-byte little-endian values reduced modulo the group
//! order L = 2^252 + 27742317777372353535851937790883648493. Points are
//! standard 32-byte compressed Edwards Y encodings.
//!
//! Scalar math is done on curve25519-dalek's fixed-width `Scalar` (5 x 52-bit
//! limbs), so no intermediate ever needs a heap-allocated bignum.

use curve25519_dalek::{
    constants::ED25519_BASEPOINT_POINT,
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
};
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use crate::error::{Result, StealthError};

/// Reduce a 32-byte little-endian integer modulo L
pub fn reduce_mod(bytes: &[u8; 32]) -> Scalar {
    Scalar::from_bytes_mod_order(*bytes)
}

/// Reduce a 64-byte little-endian integer modulo L
pub fn reduce_mod_wide(bytes: &[u8; 64]) -> Scalar {
    Scalar::from_bytes_mod_order_wide(bytes)
}

/// SHA-512 over the concatenation of `parts`, reduced modulo L
///
/// This is the EdDSA `H(..) mod L` used for both the nonce and the challenge.
pub fn hash_to_scalar_wide(parts: &[&[u8]]) -> Scalar {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&hasher.finalize());
    let scalar = reduce_mod_wide(&wide);
    wide.zeroize();
    scalar
}

/// RFC 8032 clamping: clear the low 3 bits, clear bit 255, set bit 254
pub fn clamp_scalar(mut bytes: [u8; 32]) -> [u8; 32] {
    bytes[0] &= 0b1111_1000;
    bytes[31] &= 0b0111_1111;
    bytes[31] |= 0b0100_0000;
    bytes
}

/// Standard Ed25519 secret scalar from a 32-byte seed (RFC 8032 §5.1.5)
///
/// `a = clamp(SHA-512(seed)[0..32]) mod L`
pub fn scalar_from_seed(seed: &[u8; 32]) -> Scalar {
    let mut expanded = [0u8; 64];
    expanded.copy_from_slice(&Sha512::digest(seed));

    let mut low = [0u8; 32];
    low.copy_from_slice(&expanded[..32]);
    let mut clamped = clamp_scalar(low);
    let scalar = reduce_mod(&clamped);

    expanded.zeroize();
    low.zeroize();
    clamped.zeroize();
    scalar
}

/// Parse a scalar that must already be reduced modulo L
pub fn scalar_from_canonical(bytes: &[u8; 32]) -> Result<Scalar> {
    Scalar::from_canonical_bytes(*bytes)
        .ok_or_else(|| StealthError::InvalidKeyMaterial("scalar is not reduced modulo L".into()))
}

/// Decompress a public point, rejecting off-curve and small-order encodings
///
/// Small-order points would collapse any Diffie-Hellman result onto a handful
/// of values, so they are never accepted as key material.
pub fn decompress_point(bytes: &[u8; 32]) -> Result<EdwardsPoint> {
    let point = CompressedEdwardsY(*bytes)
        .decompress()
        .ok_or_else(|| StealthError::InvalidKeyMaterial("point is not on the curve".into()))?;

    if point.is_small_order() {
        return Err(StealthError::InvalidKeyMaterial(
            "point has small order".into(),
        ));
    }

    Ok(point)
}

/// `scalar · point`
pub fn point_multiply(scalar: &Scalar, point: &EdwardsPoint) -> EdwardsPoint {
    scalar * point
}

/// `scalar · G`, compressed
pub fn base_multiply(scalar: &Scalar) -> [u8; 32] {
    (scalar * &ED25519_BASEPOINT_POINT).compress().to_bytes()
}

/// `P1 + P2` over compressed encodings
pub fn point_add(p1: &[u8; 32], p2: &[u8; 32]) -> Result<[u8; 32]> {
    let a = decompress_point(p1)?;
    let b = decompress_point(p2)?;
    Ok((&a + &b).compress().to_bytes())
}

/// Ed25519 public key for a seed; identical to any RFC 8032 implementation
pub fn public_from_seed(seed: &[u8; 32]) -> [u8; 32] {
    base_multiply(&scalar_from_seed(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::BASEPOINT_ORDER;

    #[test]
    fn test_clamp_sets_expected_bits() {
        let clamped = clamp_scalar([0xFF; 32]);
        assert_eq!(clamped[0] & 0b0000_0111, 0);
        assert_eq!(clamped[31] & 0b1000_0000, 0);
        assert_eq!(clamped[31] & 0b0100_0000, 0b0100_0000);

        let clamped = clamp_scalar([0x00; 32]);
        assert_eq!(clamped[31], 0b0100_0000);
    }

    #[test]
    fn test_reduce_mod_of_group_order_is_zero() {
        let order = BASEPOINT_ORDER.to_bytes();
        assert_eq!(reduce_mod(&order), Scalar::zero());

        // L + 1 reduces to 1
        let mut order_plus_one = order;
        order_plus_one[0] += 1;
        assert_eq!(reduce_mod(&order_plus_one), Scalar::one());
    }

    #[test]
    fn test_reduce_mod_is_always_canonical() {
        let reduced = reduce_mod(&[0xFF; 32]);
        assert!(scalar_from_canonical(&reduced.to_bytes()).is_ok());
        assert!(scalar_from_canonical(&[0xFF; 32]).is_err());
    }

    #[test]
    fn test_point_add_matches_scalar_add() {
        let a = reduce_mod(&[7u8; 32]);
        let b = reduce_mod(&[9u8; 32]);

        let sum_points = point_add(&base_multiply(&a), &base_multiply(&b)).unwrap();
        let sum_scalars = base_multiply(&(a + b));
        assert_eq!(sum_points, sum_scalars);
    }

    #[test]
    fn test_point_multiply_agrees_with_base_multiply() {
        let s = reduce_mod(&[3u8; 32]);
        let g = decompress_point(&ED25519_BASEPOINT_POINT.compress().to_bytes()).unwrap();
        assert_eq!(point_multiply(&s, &g).compress().to_bytes(), base_multiply(&s));
    }

    #[test]
    fn test_decompress_rejects_identity_and_off_curve() {
        // Identity encodes as y = 1
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(matches!(
            decompress_point(&identity),
            Err(StealthError::InvalidKeyMaterial(_))
        ));

        // Roughly half of all y values have no x on the curve
        let off_curve = (2u8..=255)
            .map(|y| {
                let mut bytes = [0u8; 32];
                bytes[0] = y;
                bytes
            })
            .find(|bytes| CompressedEdwardsY(*bytes).decompress().is_none())
            .expect("an off-curve encoding among small y values");
        assert!(decompress_point(&off_curve).is_err());
    }

    #[test]
    fn test_scalar_from_seed_is_deterministic() {
        let seed = [0x42u8; 32];
        assert_eq!(scalar_from_seed(&seed), scalar_from_seed(&seed));
        assert_ne!(scalar_from_seed(&seed), scalar_from_seed(&[0x43u8; 32]));
    }
}
