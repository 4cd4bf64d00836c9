// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store: signup, password login, and email verification state.
//!
//! Emails are normalized (trimmed, NFC, lower-cased) before they are used as
//! keys, so `Client@Example.com` and `client@example.com` are one account.

use std::sync::Arc;

use chrono::Utc;
use unicode_normalization::UnicodeNormalization;

use super::password::PasswordHasher;
use super::roles::Role;
use crate::error::{ServiceError, ServiceResult};
use crate::storage::{KvStore, StoredUser, UserRepository};

#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KvStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KvStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self.store.as_ref())
    }

    /// Create an account. Fails with `Conflict` if the email is taken.
    pub fn register(&self, email: &str, password: &str, role: Role) -> ServiceResult<StoredUser> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Password must not be empty".to_string(),
            ));
        }

        let user = StoredUser {
            email,
            password_hash: self.hasher.hash(password)?,
            role,
            is_verified: false,
            created_at: Utc::now(),
        };

        if !self.users().create(&user)? {
            return Err(ServiceError::Conflict("Email already registered".to_string()));
        }

        tracing::info!(email = %user.email, role = %user.role, "User registered");
        Ok(user)
    }

    /// Check a password. Unknown emails and wrong passwords fail identically.
    pub fn authenticate(&self, email: &str, password: &str) -> ServiceResult<StoredUser> {
        let Ok(email) = normalize_email(email) else {
            return Err(ServiceError::InvalidCredentials);
        };

        match self.users().get(&email)? {
            Some(user) if self.hasher.verify(password, &user.password_hash) => Ok(user),
            _ => {
                tracing::debug!(email = %email, "Login rejected");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    /// Flip the verified flag. Idempotent.
    pub fn mark_verified(&self, email: &str) -> ServiceResult<StoredUser> {
        let email = normalize_email(email)?;
        let users = self.users();

        let Some(mut user) = users.get(&email)? else {
            return Err(ServiceError::NotFound("User not found".to_string()));
        };

        if !user.is_verified {
            user.is_verified = true;
            users.update(&user)?;
            tracing::info!(email = %user.email, "Email verified");
        }
        Ok(user)
    }

    /// Look up a user by (unnormalized) email.
    pub fn get(&self, email: &str) -> ServiceResult<Option<StoredUser>> {
        match normalize_email(email) {
            Ok(email) => Ok(self.users().get(&email)?),
            Err(_) => Ok(None),
        }
    }
}

/// Normalize and validate an email address.
///
/// Accepts `local@domain.tld` shapes only; no whitespace, exactly one `@`,
/// and a dotted domain without empty labels.
pub fn normalize_email(raw: &str) -> ServiceResult<String> {
    let email: String = raw.trim().nfc().collect::<String>().to_lowercase();
    let invalid = || ServiceError::InvalidInput(format!("Invalid email address: {raw}"));

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };

    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty());

    if well_formed {
        Ok(email)
    } else {
        Err(invalid())
    }
}
