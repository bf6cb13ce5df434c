//! Recipient identity keys and their public meta-address
//!
//! Every private key in this crate is a 32-byte Ed25519 seed. The secret
//! scalar behind it is the RFC 8032 expansion `clamp(SHA-512(seed)[..32])`,
//! so a meta-spend key produced by any standard Ed25519 wallet is usable
//! here unchanged.
//!
//! Security:
//! - Seeds and scalars are zeroized on drop
//! - Clone is NOT derived on types holding secrets

use std::fmt;
use std::str::FromStr;

use bip39::Mnemonic;
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::crypto::scalar::{decompress_point, public_from_seed, scalar_from_seed};
use crate::encoding::decode_key;
use crate::error::{Result, StealthError};

/// Text prefix of an encoded meta-address
pub const META_ADDRESS_PREFIX: &str = "stealth:";

/// Mnemonic derivation domains
const SPEND_DOMAIN: &[u8] = b"pivy/spend";
const VIEW_DOMAIN: &[u8] = b"pivy/view";

// ============================================================================
// Secret wrappers
// ============================================================================

/// A reduced scalar that zeroizes its bytes on drop
pub struct SecretScalar {
    bytes: [u8; 32],
}

impl SecretScalar {
    pub fn from_scalar(scalar: &Scalar) -> Self {
        Self { bytes: scalar.to_bytes() }
    }

    pub fn to_scalar(&self) -> Scalar {
        Scalar::from_bytes_mod_order(self.bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// An Ed25519 keypair held as its 32-byte seed
pub struct Keypair {
    seed: [u8; 32],
    public: [u8; 32],
}

impl Keypair {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let public = public_from_seed(&seed);
        Self { seed, public }
    }

    /// Fresh keypair from the supplied CSPRNG
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let keypair = Self::from_seed(seed);
        seed.zeroize();
        keypair
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.public
    }

    /// The private seed (use carefully)
    pub fn secret_seed(&self) -> &[u8; 32] {
        &self.seed
    }

    /// Expanded secret scalar
    pub(crate) fn scalar(&self) -> Scalar {
        scalar_from_seed(&self.seed)
    }
}

impl Drop for Keypair {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public", &hex::encode(self.public))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Meta keys
// ============================================================================

/// Long-lived recipient identity: a spend keypair and a view keypair
///
/// The spend key authorizes derivation of one-time spending scalars. The view
/// key only lets its holder recognize payments and decrypt memos.
pub struct MetaKeys {
    spend: Keypair,
    view: Keypair,
}

impl MetaKeys {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            spend: Keypair::generate(rng),
            view: Keypair::generate(rng),
        }
    }

    /// Reconstruct keys from stored seeds
    pub fn from_secrets(spend_seed: &[u8; 32], view_seed: &[u8; 32]) -> Self {
        Self {
            spend: Keypair::from_seed(*spend_seed),
            view: Keypair::from_seed(*view_seed),
        }
    }

    /// Derive keys from a BIP-39 mnemonic phrase
    ///
    /// Derivation:
    /// - spend_seed = SHA256("pivy/spend" || bip39_seed)
    /// - view_seed  = SHA256("pivy/view" || bip39_seed)
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self> {
        let mnemonic = Mnemonic::from_str(phrase)
            .map_err(|e| StealthError::Mnemonic(e.to_string()))?;

        let mut seed = mnemonic.to_seed(passphrase);
        let mut spend_seed = domain_hash(SPEND_DOMAIN, &seed);
        let mut view_seed = domain_hash(VIEW_DOMAIN, &seed);

        let keys = Self::from_secrets(&spend_seed, &view_seed);

        seed.zeroize();
        spend_seed.zeroize();
        view_seed.zeroize();
        Ok(keys)
    }

    /// Generate a new 24-word mnemonic and derive keys from it
    pub fn generate_with_mnemonic<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(Self, String)> {
        let mut entropy = [0u8; 32];
        rng.fill_bytes(&mut entropy);

        let mnemonic = Mnemonic::from_entropy(&entropy)
            .map_err(|e| StealthError::Mnemonic(e.to_string()))?;
        entropy.zeroize();

        let phrase = mnemonic.to_string();
        let keys = Self::from_mnemonic(&phrase, "")?;
        Ok((keys, phrase))
    }

    pub fn spend(&self) -> &Keypair {
        &self.spend
    }

    pub fn view(&self) -> &Keypair {
        &self.view
    }

    pub fn meta_address(&self) -> MetaAddress {
        MetaAddress {
            view_pubkey: self.view.public_key(),
            spend_pubkey: self.spend.public_key(),
        }
    }

    /// Scan-only capability: view seed + spend public key
    pub fn view_key(&self) -> ViewKey {
        ViewKey {
            view_seed: *self.view.secret_seed(),
            spend_pubkey: self.spend.public_key(),
        }
    }

    /// Export seeds as (spend, view) for encrypted storage
    ///
    /// WARNING: Handle these bytes with extreme care!
    pub fn export_secrets(&self) -> ([u8; 32], [u8; 32]) {
        (*self.spend.secret_seed(), *self.view.secret_seed())
    }
}

fn domain_hash(domain: &[u8], data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

// ============================================================================
// Meta-address
// ============================================================================

/// Public half of a recipient identity, shared with payers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetaAddress {
    pub view_pubkey: [u8; 32],
    pub spend_pubkey: [u8; 32],
}

impl MetaAddress {
    /// Build a meta-address, rejecting keys that are not valid points
    pub fn new(view_pubkey: [u8; 32], spend_pubkey: [u8; 32]) -> Result<Self> {
        decompress_point(&view_pubkey)?;
        decompress_point(&spend_pubkey)?;
        Ok(Self {
            view_pubkey,
            spend_pubkey,
        })
    }

    /// view (32) || spend (32)
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.view_pubkey);
        bytes[32..].copy_from_slice(&self.spend_pubkey);
        bytes
    }

    pub fn from_bytes(bytes: &[u8; 64]) -> Result<Self> {
        let mut view_pubkey = [0u8; 32];
        let mut spend_pubkey = [0u8; 32];
        view_pubkey.copy_from_slice(&bytes[..32]);
        spend_pubkey.copy_from_slice(&bytes[32..]);
        Self::new(view_pubkey, spend_pubkey)
    }
}

impl fmt::Display for MetaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            META_ADDRESS_PREFIX,
            bs58::encode(self.to_bytes()).into_string()
        )
    }
}

impl FromStr for MetaAddress {
    type Err = StealthError;

    fn from_str(input: &str) -> Result<Self> {
        let encoded = input.trim();
        let encoded = encoded.strip_prefix(META_ADDRESS_PREFIX).unwrap_or(encoded);
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| StealthError::Encoding(format!("meta-address: {}", e)))?;

        let bytes: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
            StealthError::Encoding(format!(
                "invalid meta-address length: expected 64 bytes, got {}",
                bytes.len()
            ))
        })?;

        Self::from_bytes(&bytes)
    }
}

// ============================================================================
// View key
// ============================================================================

/// View seed + spend public key: detects payments, cannot spend them
pub struct ViewKey {
    view_seed: [u8; 32],
    pub spend_pubkey: [u8; 32],
}

impl ViewKey {
    pub fn new(view_seed: [u8; 32], spend_pubkey: [u8; 32]) -> Result<Self> {
        decompress_point(&spend_pubkey)?;
        Ok(Self {
            view_seed,
            spend_pubkey,
        })
    }

    pub fn view_seed(&self) -> &[u8; 32] {
        &self.view_seed
    }

    /// Text form `<view seed hex>:<spend pubkey hex>`
    pub fn encode(&self) -> String {
        format!("{}:{}", hex::encode(self.view_seed), hex::encode(self.spend_pubkey))
    }

    pub fn decode(input: &str) -> Result<Self> {
        let (seed, spend) = input.trim().split_once(':').ok_or_else(|| {
            StealthError::Encoding("view key must be '<view secret>:<spend pubkey>'".into())
        })?;
        Self::new(decode_key(seed)?, decode_key(spend)?)
    }
}

impl Drop for ViewKey {
    fn drop(&mut self) {
        self.view_seed.zeroize();
    }
}
