use thiserror::Error;

/// Maximum label length carried by a payment announcement
pub const MAX_LABEL_LEN: usize = 32;

/// Errors raised by the stealth engine
///
/// Every operation is a pure function over its inputs, so none of these
/// leave partial state behind and none are worth retrying with the same
/// inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StealthError {
    /// Malformed scalar or point: wrong length, not on the curve, small order
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// The ephemeral public key recovered from a memo does not match the
    /// one recomputed from the recovered private key
    #[error("Memo integrity check failed - wrong recipient key or corrupted memo")]
    MemoIntegrity,

    /// Point-addition and scalar-multiplication derivation paths disagree
    #[error("Stealth key mismatch - derivation paths disagree, refusing to continue")]
    KeyMismatch,

    /// Signature did not verify under the given public key
    #[error("Invalid signature")]
    InvalidSignature,

    /// Hex / base58 / length problem at an API boundary
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Payment amount must be greater than zero")]
    InvalidAmount,

    #[error("Label too long: {0} bytes (max 32)")]
    LabelTooLong(usize),

    #[error("Invalid mnemonic: {0}")]
    Mnemonic(String),
}

pub type Result<T> = std::result::Result<T, StealthError>;
