// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-local key-value store.
//!
//! Every table is a `BTreeMap` and the whole store sits behind one
//! `RwLock`, which is plenty at this scale and makes `insert_new` atomic.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use super::{KvStore, StorageResult, Table};

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, table: Table, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let tables = self.tables.read();
        Ok(tables.get(&table).and_then(|rows| rows.get(key)).cloned())
    }

    fn put(&self, table: Table, key: &str, value: &[u8]) -> StorageResult<()> {
        let mut tables = self.tables.write();
        tables
            .entry(table)
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn insert_new(&self, table: Table, key: &str, value: &[u8]) -> StorageResult<bool> {
        let mut tables = self.tables.write();
        let rows = tables.entry(table).or_default();
        if rows.contains_key(key) {
            return Ok(false);
        }
        rows.insert(key.to_string(), value.to_vec());
        Ok(true)
    }

    fn delete(&self, table: Table, key: &str) -> StorageResult<bool> {
        let mut tables = self.tables.write();
        Ok(tables
            .get_mut(&table)
            .map(|rows| rows.remove(key).is_some())
            .unwrap_or(false))
    }

    fn list(&self, table: Table) -> StorageResult<Vec<(String, Vec<u8>)>> {
        let tables = self.tables.read();
        Ok(tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
