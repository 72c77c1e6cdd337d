//! Tests for bucket lifecycle
//!
//! These tests verify:
//! - Buckets are independent keyspaces
//! - select_bucket creates on demand and switches the active bucket
//! - delete_bucket removes entries and reports missing buckets
//! - Reserved names are refused

use sealkv::config::Config;
use sealkv::crypto::KeyMaterial;
use sealkv::{Store, StoreError};
use tempfile::TempDir;

fn setup_temp_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp_dir.path().join("buckets.store"))
        .build();
    let keys = KeyMaterial::from_identity("aa:bb:cc:dd:ee:ff");
    let store = Store::open_with_keys(config, keys).unwrap();
    (temp_dir, store)
}

#[test]
fn test_default_bucket_exists_after_open() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.bucket(), "default");
    assert_eq!(store.buckets().unwrap(), vec!["default"]);
}

#[test]
fn test_open_with_configured_bucket() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp_dir.path().join("b.store"))
        .bucket("sessions")
        .build();
    let store = Store::open_with_keys(config, KeyMaterial::from_identity("x")).unwrap();

    assert_eq!(store.bucket(), "sessions");
    assert_eq!(store.buckets().unwrap(), vec!["sessions"]);
}

#[test]
fn test_select_bucket_creates_and_activates() {
    let (_temp, store) = setup_temp_store();

    let active = store.select_bucket("users").unwrap();

    assert_eq!(active, "users");
    assert_eq!(store.bucket(), "users");
    assert_eq!(store.buckets().unwrap(), vec!["default", "users"]);
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_bucket_isolation() {
    let (_temp, store) = setup_temp_store();

    store.select_bucket("a").unwrap();
    store.set("k", "from a").unwrap();

    store.select_bucket("b").unwrap();
    assert!(matches!(store.get::<String>("k"), Err(StoreError::KeyNotFound(_))));
    store.set("k", "from b").unwrap();

    store.select_bucket("a").unwrap();
    assert_eq!(store.get::<String>("k").unwrap(), "from a");
    store.select_bucket("b").unwrap();
    assert_eq!(store.get::<String>("k").unwrap(), "from b");
}

#[test]
fn test_delete_bucket_removes_entries() {
    let (_temp, store) = setup_temp_store();

    store.select_bucket("tmp").unwrap();
    store.set("x", &1u8).unwrap();
    store.select_bucket("default").unwrap();

    store.delete_bucket("tmp").unwrap();
    assert_eq!(store.buckets().unwrap(), vec!["default"]);

    // Recreated bucket starts empty
    store.select_bucket("tmp").unwrap();
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_delete_missing_bucket() {
    let (_temp, store) = setup_temp_store();

    match store.delete_bucket("nope") {
        Err(StoreError::BucketNotFound(name)) => assert_eq!(name, "nope"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_delete_active_bucket() {
    let (_temp, store) = setup_temp_store();
    store.set("k", "v").unwrap();

    store.delete_bucket("default").unwrap();

    assert_eq!(store.bucket(), "default");
    assert!(matches!(store.get::<String>("k"), Err(StoreError::BucketNotFound(_))));
    assert!(matches!(store.set("k", "v"), Err(StoreError::BucketNotFound(_))));
    assert!(matches!(store.delete("k"), Err(StoreError::BucketNotFound(_))));
    assert!(matches!(store.keys(), Err(StoreError::BucketNotFound(_))));
    assert!(store.buckets().unwrap().is_empty());

    store.select_bucket("default").unwrap();
    store.set("k", "again").unwrap();
    assert_eq!(store.get::<String>("k").unwrap(), "again");
}

#[test]
fn test_reserved_bucket_names_refused() {
    let (_temp, store) = setup_temp_store();

    assert!(matches!(
        store.select_bucket("__sealkv_meta"),
        Err(StoreError::InvalidBucketName(_))
    ));
    assert!(matches!(
        store.delete_bucket("__sealkv_meta"),
        Err(StoreError::InvalidBucketName(_))
    ));
    assert!(matches!(store.select_bucket(""), Err(StoreError::InvalidBucketName(_))));
    assert_eq!(store.bucket(), "default");
}

#[test]
fn test_reserved_bucket_in_config_refused() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp_dir.path().join("r.store"))
        .bucket("__sealkv_internal")
        .build();

    let result = Store::open_with_keys(config, KeyMaterial::from_identity("x"));
    assert!(matches!(result, Err(StoreError::InvalidBucketName(_))));
}

#[test]
fn test_selected_bucket_survives_reopen_as_data() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.store");
    let keys = KeyMaterial::from_identity("aa:bb:cc:dd:ee:ff");

    {
        let store = Store::open_with_keys(Config::with_path(&path), keys.clone()).unwrap();
        store.select_bucket("users").unwrap();
        store.set("u1", "Kim").unwrap();
        store.close().unwrap();
    }

    // The active bucket is not persisted; the config decides it
    let config = Config::builder().path(&path).bucket("users").build();
    let store = Store::open_with_keys(config, keys).unwrap();
    assert_eq!(store.get::<String>("u1").unwrap(), "Kim");
    assert_eq!(store.buckets().unwrap(), vec!["default", "users"]);
}
