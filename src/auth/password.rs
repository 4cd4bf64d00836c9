// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-way password hashing.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::ServiceError;

/// Opaque one-way hash/verify primitive used by the credential store.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, ServiceError>;

    /// `false` on mismatch and on unparseable hashes alike.
    fn verify(&self, plaintext: &str, password_hash: &str) -> bool;
}

/// bcrypt-based [`PasswordHasher`].
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, ServiceError> {
        hash(plaintext, self.cost)
            .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {e}")))
    }

    fn verify(&self, plaintext: &str, password_hash: &str) -> bool {
        match verify(plaintext, password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be verified");
                false
            }
        }
    }
}
