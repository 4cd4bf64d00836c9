// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded key-value store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: email → serialized StoredUser
//! - `files`: file_id → serialized StoredFile
//! - `grants`: download token → serialized StoredGrant
//! - `meta`: internal bookkeeping

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{KvStore, StorageResult, Table};

const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
const FILES: TableDefinition<&str, &[u8]> = TableDefinition::new("files");
const GRANTS: TableDefinition<&str, &[u8]> = TableDefinition::new("grants");
const META: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");

fn definition(table: Table) -> TableDefinition<'static, &'static str, &'static [u8]> {
    match table {
        Table::Users => USERS,
        Table::Files => FILES,
        Table::Grants => GRANTS,
        Table::Meta => META,
    }
}

/// redb-backed [`KvStore`]. redb allows one write transaction at a time.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        for table in Table::ALL {
            let _ = write_txn.open_table(definition(table))?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Opened redb store");
        Ok(Self { db })
    }
}

impl KvStore for RedbStore {
    fn get(&self, table: Table, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let rows = read_txn.open_table(definition(table))?;
        Ok(rows.get(key)?.map(|value| value.value().to_vec()))
    }

    fn put(&self, table: Table, key: &str, value: &[u8]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut rows = write_txn.open_table(definition(table))?;
            rows.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn insert_new(&self, table: Table, key: &str, value: &[u8]) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let inserted = {
            let mut rows = write_txn.open_table(definition(table))?;
            let exists = rows.get(key)?.is_some();
            if !exists {
                rows.insert(key, value)?;
            }
            !exists
        };
        if inserted {
            write_txn.commit()?;
        } else {
            write_txn.abort()?;
        }
        Ok(inserted)
    }

    fn delete(&self, table: Table, key: &str) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut rows = write_txn.open_table(definition(table))?;
            let removed = rows.remove(key)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    fn list(&self, table: Table) -> StorageResult<Vec<(String, Vec<u8>)>> {
        let read_txn = self.db.begin_read()?;
        let rows = read_txn.open_table(definition(table))?;

        let mut entries = Vec::new();
        for entry in rows.iter()? {
            let (key, value) = entry?;
            entries.push((key.value().to_string(), value.value().to_vec()));
        }
        Ok(entries)
    }
}
