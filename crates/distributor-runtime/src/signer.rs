//! Ed25519 signer backed by the operator seed.

use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use std::fmt;

use shared_types::{Signer, SignerError};

use crate::credentials::SecretSeed;

/// Signs wallet bodies with the operator key. The key is wiped on drop.
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    pub fn from_seed(seed: &SecretSeed) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed.as_bytes()),
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl Signer for Ed25519Signer {
    fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SignerError> {
        Ok(self.signing_key.sign(payload).to_bytes().to_vec())
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("public_key", &hex::encode(self.public_key()))
            .finish_non_exhaustive()
    }
}
