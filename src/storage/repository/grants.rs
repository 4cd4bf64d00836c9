// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Download grant repository.
//!
//! A grant binds a download token to the user who requested it and the file
//! it unlocks. Grants are read on redemption, never consumed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{KvStore, StorageResult, Table};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredGrant {
    /// Email of the client that requested the link
    pub granting_user: String,
    /// File the link unlocks
    pub file_id: String,
    /// When the link was issued
    pub issued_at: DateTime<Utc>,
}

pub struct GrantRepository<'a> {
    store: &'a dyn KvStore,
}

impl<'a> GrantRepository<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub fn get(&self, token: &str) -> StorageResult<Option<StoredGrant>> {
        match self.store.get(Table::Grants, token)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Record a grant. Returns `false` if the token is already bound.
    pub fn create(&self, token: &str, grant: &StoredGrant) -> StorageResult<bool> {
        let json = serde_json::to_vec(grant)?;
        self.store.insert_new(Table::Grants, token, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn create_and_get() {
        let store = MemoryStore::new();
        let repo = GrantRepository::new(&store);
        let grant = StoredGrant {
            granting_user: "client@example.com".to_string(),
            file_id: "f1".to_string(),
            issued_at: Utc::now(),
        };

        assert!(repo.create("token-1", &grant).unwrap());
        assert_eq!(repo.get("token-1").unwrap(), Some(grant.clone()));
        assert!(!repo.create("token-1", &grant).unwrap());
        assert_eq!(repo.get("token-2").unwrap(), None);
    }
}
