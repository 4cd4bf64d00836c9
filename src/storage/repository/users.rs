// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are keyed by their normalized email address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::storage::{KvStore, StorageResult, Table};

/// User record as persisted. The password is only ever stored hashed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Normalized email, unique key
    pub email: String,
    /// One-way password hash (bcrypt)
    pub password_hash: String,
    /// Role chosen at signup
    pub role: Role,
    /// Set once the email verification link is followed
    pub is_verified: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    store: &'a dyn KvStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    /// Get a user by normalized email.
    pub fn get(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        match self.store.get(Table::Users, email)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Create a user. Returns `false` if the email is already taken.
    pub fn create(&self, user: &StoredUser) -> StorageResult<bool> {
        let json = serde_json::to_vec(user)?;
        self.store.insert_new(Table::Users, &user.email, &json)
    }

    /// Overwrite an existing user record.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        let json = serde_json::to_vec(user)?;
        self.store.put(Table::Users, &user.email, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn sample_user(email: &str) -> StoredUser {
        StoredUser {
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            role: Role::Client,
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        let user = sample_user("client@example.com");

        assert!(repo.create(&user).unwrap());
        assert_eq!(repo.get("client@example.com").unwrap(), Some(user));
        assert_eq!(repo.get("other@example.com").unwrap(), None);
    }

    #[test]
    fn create_duplicate_returns_false() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        assert!(repo.create(&sample_user("dup@example.com")).unwrap());

        let mut second = sample_user("dup@example.com");
        second.role = Role::Ops;
        assert!(!repo.create(&second).unwrap());
        assert_eq!(
            repo.get("dup@example.com").unwrap().unwrap().role,
            Role::Client
        );
    }

    #[test]
    fn update_persists_changes() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        let mut user = sample_user("client@example.com");
        repo.create(&user).unwrap();

        user.is_verified = true;
        repo.update(&user).unwrap();
        assert!(repo.get("client@example.com").unwrap().unwrap().is_verified);
    }
}
