// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! All persistent state goes through the [`KvStore`] trait: a table-scoped
//! byte store with get/put/delete semantics plus an atomic insert-if-absent.
//! Typed access lives in [`repository`]; file bytes live in the [`BlobStore`].
//!
//! ## Backends
//!
//! - [`MemoryStore`] - process-local maps behind a single lock
//! - [`RedbStore`] - embedded redb database (pure Rust, ACID)
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   exchange.redb          # users, files, grants (redb backend only)
//!   uploads/
//!     {file_id}_{filename} # uploaded document bytes
//! ```
//!
//! Both backends serialize writers, so a read-check-insert done through
//! [`KvStore::insert_new`] can never lose an update.

pub mod blob;
pub mod memory;
pub mod paths;
pub mod redb_store;
pub mod repository;

pub use blob::{BlobError, BlobStore};
pub use memory::MemoryStore;
pub use paths::StoragePaths;
pub use redb_store::RedbStore;
pub use repository::{
    FileRepository, GrantRepository, StoredFile, StoredGrant, StoredUser, UserRepository,
};

/// Logical tables of the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    /// email → StoredUser
    Users,
    /// file_id → StoredFile
    Files,
    /// download token → StoredGrant
    Grants,
    /// Internal bookkeeping (health probes).
    Meta,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Users, Table::Files, Table::Grants, Table::Meta];
}

/// Error type for key-value storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("integrity violation: {0}")]
    IntegrityViolation(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Abstract key-value store shared by every repository.
///
/// Implementations must serialize mutations; readers may run in parallel.
pub trait KvStore: Send + Sync {
    /// Fetch the raw value stored under `key`.
    fn get(&self, table: Table, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Insert or overwrite `key`.
    fn put(&self, table: Table, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Insert `key` only if it is absent. Returns `false` when the key existed.
    ///
    /// The existence check and the write happen under one writer.
    fn insert_new(&self, table: Table, key: &str, value: &[u8]) -> StorageResult<bool>;

    /// Remove `key`. Returns `true` if something was removed.
    fn delete(&self, table: Table, key: &str) -> StorageResult<bool>;

    /// All entries of a table, ordered by key.
    fn list(&self, table: Table) -> StorageResult<Vec<(String, Vec<u8>)>>;

    /// Write-read-delete round trip against the meta table.
    fn health_check(&self) -> StorageResult<()> {
        let key = ".health_check";
        let probe = b"health_check_data";

        self.put(Table::Meta, key, probe)?;
        let read_back = self.get(Table::Meta, key)?;
        self.delete(Table::Meta, key)?;

        if read_back.as_deref() != Some(probe.as_slice()) {
            return Err(StorageError::IntegrityViolation(
                "Health check data mismatch".to_string(),
            ));
        }
        Ok(())
    }
}
