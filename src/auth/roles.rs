// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Roles
///
/// - `Ops` - Operations staff, may upload documents
/// - `Client` - Customer, may list and download once verified
/// - `Other` - Any other signup role; holds no privileges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Operations user (uploads documents)
    Ops,
    /// Client user (lists and downloads documents)
    Client,
    /// Unrecognized role
    Other,
}

impl Role {
    /// Parse role from a signup string (case-insensitive).
    /// Anything that is not `ops` or `client` becomes `Other`.
    pub fn parse(s: &str) -> Role {
        match s.trim().to_lowercase().as_str() {
            "ops" => Role::Ops,
            "client" => Role::Client,
            _ => Role::Other,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Ops => write!(f, "ops"),
            Role::Client => write!(f, "client"),
            Role::Other => write!(f, "other"),
        }
    }
}
