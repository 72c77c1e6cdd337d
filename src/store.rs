//! Store Module
//!
//! The encrypted, bucketed key-value store.
//!
//! ## Responsibilities
//! - Open/create the database file and the configured bucket
//! - Encode + encrypt values on write, decrypt + decode on read
//! - One engine transaction per public call (all-or-nothing)
//! - Bucket lifecycle: select, list, delete
//!
//! ## Value Pipeline
//! ```text
//! set:  T ──codec──▶ bytes ──AES-256-CBC──▶ ciphertext ──write txn──▶ bucket[key]
//! get:  bucket[key] ──read txn──▶ ciphertext ──decrypt──▶ bytes ──codec──▶ T
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use redb::{
    Database, ReadableTable, ReadableTableMetadata, TableDefinition, TableHandle,
    WriteTransaction,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::{BincodeCodec, Codec};
use crate::config::Config;
use crate::crypto::{Cipher, KeyMaterial};
use crate::error::{Result, StoreError};

/// Bucket names starting with this prefix belong to the store itself.
pub const RESERVED_PREFIX: &str = "__sealkv";

/// On-disk layout version recorded in the meta table.
pub const FORMAT_VERSION: u64 = 1;

const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("__sealkv_meta");
const FORMAT_VERSION_KEY: &str = "format_version";

fn bucket_table(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

/// The encrypted key-value store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (set/delete/select_bucket/delete_bucket/close): take the
///   write side of `inner`, excluding readers and other writers
/// - **Reads** (get/keys/contains/len/buckets): take the read side and run
///   in parallel
///
/// Encoding and encryption happen before the lock is taken; decryption and
/// decoding after it is released. Only the engine transaction runs under
/// the lock.
pub struct Store<C: Codec = BincodeCodec> {
    /// Location of the database file
    path: PathBuf,

    /// Value cipher (immutable after open)
    cipher: Cipher,

    /// Value codec
    codec: C,

    /// Engine handle + active bucket
    inner: RwLock<Inner>,
}

struct Inner {
    /// `None` once the store is closed
    db: Option<Database>,

    /// Bucket addressed by key operations
    bucket: String,
}

impl Inner {
    fn db(&self) -> Result<&Database> {
        self.db.as_ref().ok_or(StoreError::Closed)
    }
}

impl Store<BincodeCodec> {
    /// Open or create a store with key material derived from this host
    ///
    /// # Errors
    ///
    /// `IdentityUnavailable` if no host key can be derived, `Open` if the
    /// file cannot be created, is locked by another handle, or has an
    /// unknown layout version.
    pub fn open(config: Config) -> Result<Self> {
        let keys = KeyMaterial::host()?;
        Self::open_with_keys(config, keys)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses the default bucket.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(Config::with_path(path.as_ref()))
    }

    /// Open with explicit key material instead of the host-derived keys
    pub fn open_with_keys(config: Config, keys: KeyMaterial) -> Result<Self> {
        Self::open_with_codec(config, keys, BincodeCodec)
    }
}

impl<C: Codec> Store<C> {
    /// Open with explicit key material and codec
    ///
    /// On open:
    /// 1. Create parent directories if needed
    /// 2. Open/create the database file (takes the file lock)
    /// 3. Check or record the layout version
    /// 4. Ensure the configured bucket exists
    pub fn open_with_codec(config: Config, keys: KeyMaterial, codec: C) -> Result<Self> {
        let config = config.resolve()?;
        validate_bucket_name(&config.bucket)?;

        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Open(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let db = Database::create(&config.path)?;
        init_layout(&db, &config.bucket).map_err(|e| match e {
            StoreError::Open(_) => e,
            other => StoreError::Open(other.to_string()),
        })?;

        info!(path = %config.path.display(), bucket = %config.bucket, "store opened");

        Ok(Self {
            path: config.path,
            cipher: Cipher::new(keys),
            codec,
            inner: RwLock::new(Inner {
                db: Some(db),
                bucket: config.bucket,
            }),
        })
    }

    // =========================================================================
    // Bucket Operations
    // =========================================================================

    /// Make `name` the active bucket, creating it if needed
    ///
    /// Returns the name of the now-active bucket.
    pub fn select_bucket(&self, name: &str) -> Result<String> {
        validate_bucket_name(name)?;

        let mut inner = self.inner.write();
        let txn = inner.db()?.begin_write()?;
        txn.open_table(bucket_table(name))?;
        txn.commit()?;

        debug!(bucket = name, "bucket selected");
        inner.bucket = name.to_string();
        Ok(inner.bucket.clone())
    }

    /// Name of the active bucket
    pub fn bucket(&self) -> String {
        self.inner.read().bucket.clone()
    }

    /// All user buckets in name order
    pub fn buckets(&self) -> Result<Vec<String>> {
        let inner = self.inner.read();
        let txn = inner.db()?.begin_read()?;

        let mut names: Vec<String> = txn
            .list_tables()?
            .map(|handle| handle.name().to_string())
            .filter(|name| !name.starts_with(RESERVED_PREFIX))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Remove a bucket and every entry in it
    ///
    /// Deleting the active bucket leaves it selected; key operations then
    /// fail with `BucketNotFound` until a bucket is selected again.
    pub fn delete_bucket(&self, name: &str) -> Result<()> {
        validate_bucket_name(name)?;

        let inner = self.inner.write();
        let txn = inner.db()?.begin_write()?;
        if !txn.delete_table(bucket_table(name))? {
            return Err(StoreError::BucketNotFound(name.to_string()));
        }
        txn.commit()?;

        if inner.bucket == name {
            warn!(bucket = name, "deleted the active bucket");
        } else {
            info!(bucket = name, "bucket deleted");
        }
        Ok(())
    }

    // =========================================================================
    // Key Operations
    // =========================================================================

    /// Store `value` under `key` in the active bucket
    ///
    /// Overwrites any previous value.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        check_key(key)?;

        let plaintext = self.codec.encode(value)?;
        let ciphertext = self.cipher.encrypt(&plaintext)?;

        let inner = self.inner.write();
        let txn = inner.db()?.begin_write()?;
        ensure_bucket(&txn, &inner.bucket)?;
        {
            let mut table = txn.open_table(bucket_table(&inner.bucket))?;
            table.insert(key, ciphertext.as_slice())?;
        }
        txn.commit()?;

        debug!(bucket = %inner.bucket, key, bytes = ciphertext.len(), "set");
        Ok(())
    }

    /// Read and decode the value stored under `key`
    ///
    /// # Errors
    ///
    /// `KeyNotFound` if absent; `InvalidPadding` or `Decode` if the stored
    /// bytes were written with other key material, as another type, or have
    /// been corrupted.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        check_key(key)?;

        let ciphertext = {
            let inner = self.inner.read();
            let txn = inner.db()?.begin_read()?;
            let table = txn.open_table(bucket_table(&inner.bucket))?;
            let found = table.get(key)?.map(|guard| guard.value().to_vec());
            found.ok_or_else(|| StoreError::KeyNotFound(key.to_string()))?
        };

        let plaintext = self.cipher.decrypt(&ciphertext).map_err(|e| {
            warn!(key, error = %e, "stored value failed to decrypt");
            e
        })?;
        self.codec.decode(&plaintext).map_err(|e| {
            warn!(key, error = %e, "stored value failed to decode");
            e
        })
    }

    /// Whether `key` exists in the active bucket
    pub fn contains(&self, key: &str) -> Result<bool> {
        check_key(key)?;

        let inner = self.inner.read();
        let txn = inner.db()?.begin_read()?;
        let table = txn.open_table(bucket_table(&inner.bucket))?;
        let found = table.get(key)?.is_some();
        Ok(found)
    }

    /// Remove `key` from the active bucket
    ///
    /// Removing an absent key succeeds.
    pub fn delete(&self, key: &str) -> Result<()> {
        check_key(key)?;

        let inner = self.inner.write();
        let txn = inner.db()?.begin_write()?;
        ensure_bucket(&txn, &inner.bucket)?;
        let removed = txn
            .open_table(bucket_table(&inner.bucket))?
            .remove(key)?
            .is_some();
        txn.commit()?;

        debug!(bucket = %inner.bucket, key, removed, "delete");
        Ok(())
    }

    /// All keys of the active bucket in byte order
    pub fn keys(&self) -> Result<Vec<String>> {
        let inner = self.inner.read();
        let txn = inner.db()?.begin_read()?;
        let table = txn.open_table(bucket_table(&inner.bucket))?;

        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }

    /// Number of entries in the active bucket
    pub fn len(&self) -> Result<usize> {
        let inner = self.inner.read();
        let txn = inner.db()?.begin_read()?;
        let table = txn.open_table(bucket_table(&inner.bucket))?;
        let count = table.len()?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release the database file
    ///
    /// Waits for in-flight operations. Every later operation fails with
    /// `Closed`. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.db.take().is_some() {
            info!(path = %self.path.display(), "store closed");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().db.is_none()
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Record the layout version and create the initial bucket
fn init_layout(db: &Database, bucket: &str) -> Result<()> {
    let txn = db.begin_write()?;
    {
        let mut meta = txn.open_table(META_TABLE)?;
        let stored = meta.get(FORMAT_VERSION_KEY)?.map(|guard| guard.value());
        match stored {
            Some(version) if version != FORMAT_VERSION => {
                return Err(StoreError::Open(format!(
                    "unsupported format version {} (expected {})",
                    version, FORMAT_VERSION
                )));
            }
            Some(_) => {}
            None => {
                meta.insert(FORMAT_VERSION_KEY, FORMAT_VERSION)?;
            }
        }
    }
    txn.open_table(bucket_table(bucket))?;
    txn.commit()?;
    Ok(())
}

/// A write transaction's `open_table` creates missing tables, so key writes
/// check first to avoid resurrecting a deleted bucket.
fn ensure_bucket(txn: &WriteTransaction, name: &str) -> Result<()> {
    let exists = txn.list_tables()?.any(|handle| handle.name() == name);
    if exists {
        Ok(())
    } else {
        Err(StoreError::BucketNotFound(name.to_string()))
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::EmptyKey);
    }
    Ok(())
}

fn validate_bucket_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with(RESERVED_PREFIX) {
        return Err(StoreError::InvalidBucketName(name.to_string()));
    }
    Ok(())
}
