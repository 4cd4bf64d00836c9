// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Office Exchange - Role-Based Document Exchange Service
//!
//! Operators upload office documents; verified clients list them and fetch
//! them through download links bound to the client that requested them.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Accounts, session tokens, and the access policy
//! - `broker` - Download link issuance and redemption
//! - `catalog` - Upload validation and file metadata
//! - `codec` - Reversible tokens for verification and download links
//! - `storage` - Key-value store backends and the blob store

pub mod api;
pub mod auth;
pub mod broker;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod tls;
