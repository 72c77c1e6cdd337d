//! Error types for sealkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for sealkv operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Failed to open store: {0}")]
    Open(String),

    #[error("Store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Key Material Errors
    // -------------------------------------------------------------------------
    #[error("Host identity unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("Invalid key material: key is {key_len} bytes (want 32), iv is {iv_len} bytes (want 16)")]
    InvalidKeyMaterial { key_len: usize, iv_len: usize },

    // -------------------------------------------------------------------------
    // Cipher Errors
    // -------------------------------------------------------------------------
    #[error("Invalid padding in ciphertext")]
    InvalidPadding,

    // -------------------------------------------------------------------------
    // Key / Bucket Errors
    // -------------------------------------------------------------------------
    #[error("Key must not be empty")]
    EmptyKey,

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Invalid bucket name: {0:?}")]
    InvalidBucketName(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    // -------------------------------------------------------------------------
    // Storage Engine Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// True for the errors a read produces when the stored blob does not
    /// match the current key material or has been tampered with.
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::InvalidPadding | StoreError::Decode(_))
    }
}

impl From<redb::DatabaseError> for StoreError {
    fn from(e: redb::DatabaseError) -> Self {
        StoreError::Open(e.to_string())
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(e: redb::TransactionError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<redb::TableError> for StoreError {
    fn from(e: redb::TableError) -> Self {
        match e {
            redb::TableError::TableDoesNotExist(name) => StoreError::BucketNotFound(name),
            other => StoreError::Storage(other.to_string()),
        }
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(e: redb::StorageError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<redb::CommitError> for StoreError {
    fn from(e: redb::CommitError) -> Self {
        StoreError::Storage(e.to_string())
    }
}
