// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;
use crate::storage::StoredUser;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject: the user's normalized email
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Authenticated user information.
///
/// Built from a verified session token *and* the current user record, so
/// role and verification state are always fresh, never taken from the token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Normalized email (token subject)
    pub email: String,
    /// User's role
    pub role: Role,
    /// Whether the email has been verified
    pub is_verified: bool,
}

impl AuthenticatedUser {
    pub fn from_user(user: StoredUser) -> Self {
        Self {
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
        }
    }

    /// Check if this user is a client whose email has been verified.
    pub fn is_verified_client(&self) -> bool {
        self.role == Role::Client && self.is_verified
    }
}
