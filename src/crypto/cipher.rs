//! AES-256-CBC with PKCS#7 padding.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::{Result, StoreError};

use super::keys::{KeyMaterial, IV_SIZE, KEY_SIZE};

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypts `plaintext` with AES-256-CBC.
///
/// The output is always a non-empty multiple of [`BLOCK_SIZE`]. A
/// block-aligned plaintext gains one full block of padding.
///
/// # Errors
///
/// Returns `InvalidKeyMaterial` if `key` is not 32 bytes or `iv` is not 16.
pub fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    check_lengths(key, iv)?;
    let cipher = Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| invalid(key, iv))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypts AES-256-CBC `ciphertext` and strips its PKCS#7 padding.
///
/// # Errors
///
/// - `InvalidKeyMaterial` if `key` is not 32 bytes or `iv` is not 16
/// - `InvalidPadding` if the ciphertext is empty, not block-aligned, or ends
///   in a pad that is zero, longer than a block, or not uniform
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    check_lengths(key, iv)?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(StoreError::InvalidPadding);
    }

    let cipher = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| invalid(key, iv))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| StoreError::InvalidPadding)
}

fn check_lengths(key: &[u8], iv: &[u8]) -> Result<()> {
    if key.len() != KEY_SIZE || iv.len() != IV_SIZE {
        return Err(invalid(key, iv));
    }
    Ok(())
}

fn invalid(key: &[u8], iv: &[u8]) -> StoreError {
    StoreError::InvalidKeyMaterial {
        key_len: key.len(),
        iv_len: iv.len(),
    }
}

/// Value cipher bound to one set of key material
#[derive(Clone, Debug)]
pub struct Cipher {
    keys: KeyMaterial,
}

impl Cipher {
    pub fn new(keys: KeyMaterial) -> Self {
        Self { keys }
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        encrypt(self.keys.key(), self.keys.iv(), plaintext)
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        decrypt(self.keys.key(), self.keys.iv(), ciphertext)
    }
}
