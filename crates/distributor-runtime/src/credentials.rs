//! # Operator Credentials
//!
//! Resolves the 32-byte signing seed from either a mnemonic in the
//! environment or a hex key file.
//!
//! Mnemonic derivation:
//!
//! ```text
//! entropy = HMAC-SHA512(key = words joined by ' ', data = "")
//! seed    = PBKDF2-HMAC-SHA512(entropy, "TON default seed", 100_000, 64)
//! key     = seed[..32]
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::{CredentialConfig, CredentialSource, Network};

/// Salt of the seed derivation.
pub const SEED_SALT: &[u8] = b"TON default seed";

/// PBKDF2 rounds of the seed derivation.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Words in an operator mnemonic.
pub const MNEMONIC_WORDS: usize = 24;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Missing credential variable {0}")]
    MissingVariable(&'static str),

    #[error("Mnemonic must have {expected} words, found {found}")]
    InvalidMnemonic { expected: usize, found: usize },

    #[error("Key file {path} is unreadable: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Key material is malformed: {0}")]
    MalformedKey(String),
}

/// Secret signing seed. Wiped on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretSeed([u8; 32]);

impl SecretSeed {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretSeed(***)")
    }
}

/// Name of the mnemonic variable for `network`.
pub fn mnemonic_variable(network: Network) -> &'static str {
    match network {
        Network::Testnet => "LD_MNEMONIC_TESTNET",
        Network::Mainnet => "LD_MNEMONIC_MAINNET",
    }
}

/// Derive the signing seed from a space-separated mnemonic.
pub fn mnemonic_to_seed(mnemonic: &str) -> Result<SecretSeed, CredentialError> {
    let words: Vec<String> = mnemonic
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    if words.len() != MNEMONIC_WORDS {
        return Err(CredentialError::InvalidMnemonic {
            expected: MNEMONIC_WORDS,
            found: words.len(),
        });
    }
    let phrase = Zeroizing::new(words.join(" "));

    let mut mac = Hmac::<Sha512>::new_from_slice(phrase.as_bytes())
        .map_err(|e| CredentialError::MalformedKey(e.to_string()))?;
    mac.update(b"");
    let entropy = Zeroizing::new(mac.finalize().into_bytes().to_vec());

    let mut seed = Zeroizing::new([0u8; 64]);
    pbkdf2::pbkdf2_hmac::<Sha512>(&entropy, SEED_SALT, PBKDF2_ROUNDS, &mut seed[..]);

    let mut key = [0u8; 32];
    key.copy_from_slice(&seed[..32]);
    Ok(SecretSeed(key))
}

/// Parse hex key material: a 32-byte seed, or a 64-byte secret key whose
/// first half is the seed.
pub fn seed_from_hex(material: &str) -> Result<SecretSeed, CredentialError> {
    let bytes = Zeroizing::new(
        hex::decode(material.trim()).map_err(|e| CredentialError::MalformedKey(e.to_string()))?,
    );
    if bytes.len() != 32 && bytes.len() != 64 {
        return Err(CredentialError::MalformedKey(format!(
            "expected 32 or 64 bytes, got {}",
            bytes.len()
        )));
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes[..32]);
    Ok(SecretSeed(key))
}

/// Read a hex key file.
pub fn seed_from_file(path: &Path) -> Result<SecretSeed, CredentialError> {
    let material = Zeroizing::new(std::fs::read_to_string(path).map_err(|source| {
        CredentialError::KeyFile {
            path: path.display().to_string(),
            source,
        }
    })?);
    seed_from_hex(&material)
}

/// Resolve the signing seed for `network` as configured.
pub fn resolve_seed<F>(
    config: &CredentialConfig,
    network: Network,
    lookup: F,
) -> Result<SecretSeed, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    match config.source {
        CredentialSource::Env => {
            let var = mnemonic_variable(network);
            let mnemonic = Zeroizing::new(lookup(var).ok_or(CredentialError::MissingVariable(var))?);
            tracing::debug!(network = %network, variable = var, "Deriving key from mnemonic");
            mnemonic_to_seed(&mnemonic)
        }
        CredentialSource::File => {
            let path = config
                .key_file
                .as_deref()
                .ok_or(CredentialError::MissingVariable("LD_SECRET_KEY_FILE"))?;
            tracing::debug!(network = %network, path = %path.display(), "Reading key file");
            seed_from_file(path)
        }
    }
}
