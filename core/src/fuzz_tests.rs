//! Property-based tests for the stealth engine
//!
//! Properties tested:
//! - ECDH symmetry
//! - Memo round-trip and tamper detection
//! - Dual-path derivation agreement
//! - Signature validity and determinism

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use crate::crypto::memo::{EncryptedMemo, MEMO_LEN, NONCE_LEN};
    use crate::crypto::scalar::public_from_seed;
    use crate::crypto::{
        decrypt_ephemeral_key, derive_stealth_public_key, derive_stealth_scalar,
        derive_stealth_signer, ecdh, encrypt_ephemeral_key, verify_signature,
    };
    use crate::error::StealthError;
    use crate::keys::MetaKeys;
    use rand::{rngs::StdRng, SeedableRng};

    fn arbitrary_seed() -> impl Strategy<Value = [u8; 32]> {
        prop::array::uniform32(any::<u8>())
    }

    fn distinct_seeds() -> impl Strategy<Value = ([u8; 32], [u8; 32], [u8; 32])> {
        (arbitrary_seed(), arbitrary_seed(), arbitrary_seed())
            .prop_filter("distinct seeds", |(a, b, c)| a != b && b != c && a != c)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// ecdh(a, B) == ecdh(b, A)
        #[test]
        fn prop_ecdh_symmetry(a in arbitrary_seed(), b in arbitrary_seed()) {
            let ab = ecdh(&a, &public_from_seed(&b)).unwrap();
            let ba = ecdh(&b, &public_from_seed(&a)).unwrap();
            prop_assert_eq!(ab.as_bytes(), ba.as_bytes());
        }

        /// decrypt(encrypt(r, V), v, R) == r
        #[test]
        fn prop_memo_roundtrip(eph in arbitrary_seed(), view in arbitrary_seed(), nonce_seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(nonce_seed);
            let memo = encrypt_ephemeral_key(&eph, &public_from_seed(&view), &mut rng).unwrap();
            let recovered = decrypt_ephemeral_key(&memo, &view, &public_from_seed(&eph)).unwrap();
            prop_assert_eq!(recovered.secret_seed(), &eph);
        }

        /// Any single-bit flip in the ciphertext is rejected
        #[test]
        fn prop_memo_tamper_detection(
            eph in arbitrary_seed(),
            view in arbitrary_seed(),
            bit in 0usize..(MEMO_LEN - NONCE_LEN) * 8,
        ) {
            let mut rng = StdRng::seed_from_u64(0);
            let memo = encrypt_ephemeral_key(&eph, &public_from_seed(&view), &mut rng).unwrap();

            let mut bytes = *memo.as_bytes();
            bytes[NONCE_LEN + bit / 8] ^= 1 << (bit % 8);
            let tampered = EncryptedMemo::from_bytes(&bytes).unwrap();

            let result = decrypt_ephemeral_key(&tampered, &view, &public_from_seed(&eph));
            prop_assert_eq!(result.err(), Some(StealthError::MemoIntegrity));
        }

        /// Point-addition and scalar paths agree
        #[test]
        fn prop_dual_path_agreement((spend, view, eph) in distinct_seeds()) {
            let spend_pub = public_from_seed(&spend);
            let view_pub = public_from_seed(&view);

            let by_points = derive_stealth_public_key(&spend_pub, &view_pub, &eph).unwrap();
            let by_scalar = derive_stealth_scalar(&spend, &view_pub, &eph).unwrap();
            prop_assert_eq!(by_points, by_scalar.stealth_pubkey);
        }

        /// Signatures verify and are deterministic
        #[test]
        fn prop_signature_validity(
            (spend, view, eph) in distinct_seeds(),
            message in prop::collection::vec(any::<u8>(), 0..256),
        ) {
            let keys = MetaKeys::from_secrets(&spend, &view);
            let signer = derive_stealth_signer(&keys, &eph).unwrap();

            let signature = signer.sign(&message);
            prop_assert!(verify_signature(&signer.public_key(), &message, &signature).is_ok());
            prop_assert_eq!(signature, signer.sign(&message));
        }
    }
}
