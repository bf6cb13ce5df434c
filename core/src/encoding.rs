//! Text encodings accepted at API boundaries
//!
//! Keys arrive either as 64-char hex or as base58; everything is normalized
//! to raw bytes before it reaches the crypto layer.

use crate::error::{Result, StealthError};

/// Decode a 32-byte key from hex or base58
pub fn decode_key(input: &str) -> Result<[u8; 32]> {
    decode_fixed::<32>(input)
}

/// Decode a 64-byte signature from hex or base58
pub fn decode_signature(input: &str) -> Result<[u8; 64]> {
    decode_fixed::<64>(input)
}

/// Base58 form of a public key, the usual ledger address display
pub fn encode_address(bytes: &[u8; 32]) -> String {
    bs58::encode(bytes).into_string()
}

fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N]> {
    let input = input.trim();

    // Hex is tried first only when the length fits exactly, since short hex
    // strings are also valid base58.
    let bytes = if input.len() == N * 2 && input.chars().all(|c| c.is_ascii_hexdigit()) {
        hex::decode(input).map_err(|e| StealthError::Encoding(format!("hex: {}", e)))?
    } else {
        bs58::decode(input)
            .into_vec()
            .map_err(|e| StealthError::Encoding(format!("base58: {}", e)))?
    };

    bytes.as_slice().try_into().map_err(|_| {
        StealthError::Encoding(format!(
            "expected {} bytes, got {}",
            N,
            bytes.len()
        ))
    })
}
