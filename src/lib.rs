//! # sealkv
//!
//! An embedded, encrypted key-value store with:
//! - ACID transactions over named buckets (redb)
//! - Typed values through a pluggable codec (bincode by default)
//! - AES-256-CBC encryption at rest with host-derived keys
//! - Single-writer/multi-reader concurrency model
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                               │
//! │         set / get / delete / keys  ·  buckets                │
//! │                (Single Writer / Multi Reader)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │   Cipher    │◀── KeyMaterial
//!   │  (bincode)  │          │ (AES-CBC)   │    (host MAC)
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │    redb     │
//!                           │  (buckets)  │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use sealkv::{Config, Store};
//!
//! let store = Store::open(Config::with_path("/tmp/test.store"))?;
//! store.set("user:1", &("Kim".to_string(), 30u32))?;
//! let user: (String, u32) = store.get("user:1")?;
//! assert_eq!(user.1, 30);
//! store.close()?;
//! # Ok::<(), sealkv::StoreError>(())
//! ```
//!
//! Keys are bound to the machine's outbound network interface. A database
//! file copied to another host cannot be decrypted there.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod crypto;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use codec::{BincodeCodec, Codec};
pub use config::Config;
pub use crypto::KeyMaterial;
pub use error::{Result, StoreError};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of sealkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
