//! Key material
//!
//! The (key, iv) pair used by the cipher layer.

use std::fmt;
use std::sync::OnceLock;

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, StoreError};

use super::identity;

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// Size of the CBC initialization vector in bytes.
pub const IV_SIZE: usize = 16;

/// Offset of the IV inside the hex digest string.
const IV_OFFSET: usize = 3;

/// Host-derived key material, computed at most once per process.
static HOST_KEYS: OnceLock<KeyMaterial> = OnceLock::new();

/// A 32-byte key and 16-byte IV.
///
/// Wiped from memory when dropped. `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    key: [u8; KEY_SIZE],
    iv: [u8; IV_SIZE],
}

impl KeyMaterial {
    /// Creates key material from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyMaterial` unless `key` is 32 bytes and `iv` is 16.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        if key.len() != KEY_SIZE || iv.len() != IV_SIZE {
            return Err(StoreError::InvalidKeyMaterial {
                key_len: key.len(),
                iv_len: iv.len(),
            });
        }

        let mut material = Self {
            key: [0u8; KEY_SIZE],
            iv: [0u8; IV_SIZE],
        };
        material.key.copy_from_slice(key);
        material.iv.copy_from_slice(iv);
        Ok(material)
    }

    /// Derives key material from an identity string.
    ///
    /// The identity is hashed with SHA-256 and the first 16 digest bytes are
    /// hex-encoded. The 32 hex characters are the key. The 16 characters
    /// starting at offset 3 are the IV.
    pub fn from_identity(identity: &str) -> Self {
        let digest = Sha256::digest(identity.as_bytes());
        let hex_digest = zeroize::Zeroizing::new(hex::encode(&digest[..KEY_SIZE / 2]));
        let bytes = hex_digest.as_bytes();

        let mut material = Self {
            key: [0u8; KEY_SIZE],
            iv: [0u8; IV_SIZE],
        };
        material.key.copy_from_slice(&bytes[..KEY_SIZE]);
        material
            .iv
            .copy_from_slice(&bytes[IV_OFFSET..IV_OFFSET + IV_SIZE]);
        material
    }

    /// Key material bound to this machine's primary network interface.
    ///
    /// Derived on first success and shared for the rest of the process.
    /// A failed derivation is not cached, so a later call may succeed once a
    /// route exists.
    ///
    /// # Errors
    ///
    /// Returns `IdentityUnavailable` when there is no outbound route or no
    /// interface owns the outbound address.
    pub fn host() -> Result<Self> {
        if let Some(material) = HOST_KEYS.get() {
            return Ok(material.clone());
        }

        let identity = identity::host_identity()?;
        let derived = Self::from_identity(&identity);
        tracing::debug!("derived host key material");
        Ok(HOST_KEYS.get_or_init(|| derived).clone())
    }

    /// The raw key bytes.
    ///
    /// Be careful with this method - don't log or serialize the result.
    pub fn key(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// The raw IV bytes.
    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}
