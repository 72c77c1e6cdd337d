//! Crypto Module
//!
//! Encryption of values at rest.
//!
//! ## Responsibilities
//! - Derive a fixed key/IV pair from the host's network hardware address
//! - AES-256-CBC encryption with PKCS#7 padding
//! - Keep key material out of logs and wipe it on drop
//!
//! ## Key Derivation
//! ```text
//! outbound IP ──▶ interface ──▶ MAC "aa:bb:.." ──▶ SHA-256[..16] ──▶ hex (32 chars)
//!                                                                     │
//!                                          key = hex[0..32]  ◀────────┤
//!                                          iv  = hex[3..19]  ◀────────┘
//! ```
//!
//! There is no authentication tag. Tampered ciphertext shows up as a padding
//! or decode failure at best, and as garbage plaintext at worst.

mod cipher;
mod identity;
mod keys;

pub use cipher::{decrypt, encrypt, Cipher, BLOCK_SIZE};
pub use identity::{hardware_address, host_identity, outbound_ip};
pub use keys::{KeyMaterial, IV_SIZE, KEY_SIZE};
