//! Leadbook Store - key-value persistence for leads, admin users and the
//! admin session marker.
//!
//! # Architecture
//!
//! A [`StorageBackend`] is a flat string map. [`MemoryStorage`] keeps it in
//! process, [`FileStorage`] keeps it in one JSON file so the storefront,
//! admin console and CLI can share data. [`RecordStore`] stores each
//! collection as a JSON document under a namespaced key.
//!
//! # Example
//!
//! ```
//! use leadbook_store::RecordStore;
//!
//! let store = RecordStore::in_memory();
//! assert!(store.list_leads().is_empty());
//! assert!(store.validate_credentials("admin", "admin123").is_some());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod error;
pub mod file;
pub mod password;
pub mod records;

pub use backend::{MemoryStorage, StorageBackend};
pub use error::{Result, StoreError};
pub use file::FileStorage;
pub use password::{hash_password, verify_password};
pub use records::{
    DEFAULT_ADMIN_ID, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, DEFAULT_NAMESPACE,
    RecordStore, StoreConfig,
};
