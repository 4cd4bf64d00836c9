// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the key-value store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! serializing records as JSON into one [`Table`](super::Table).

pub mod files;
pub mod grants;
pub mod users;

pub use files::{FileRepository, StoredFile};
pub use grants::{GrantRepository, StoredGrant};
pub use users::{StoredUser, UserRepository};
