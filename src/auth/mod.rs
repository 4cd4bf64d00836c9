// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Accounts, session tokens, and the access policy for the exchange API.
//!
//! ## Auth Flow
//!
//! 1. A user signs up with email, password, and role (`ops` or `client`)
//! 2. The user opens the verification link returned at signup
//! 3. `POST /login` with form credentials returns a bearer session token
//! 4. Protected endpoints take `Authorization: Bearer <token>`:
//!    - signature, algorithm, and expiry are checked
//!    - `sub` is re-resolved against the credential store
//!    - role and verification state come from the stored record
//!
//! ## Security
//!
//! - Passwords are stored only as bcrypt hashes
//! - Session tokens are HMAC-signed and expire after a fixed TTL
//! - No clock skew tolerance
//! - Authorization failures are 403, authentication failures 401

pub mod claims;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod password;
pub mod policy;
pub mod roles;
pub mod session;

pub use claims::{AuthenticatedUser, SessionClaims};
pub use credentials::{normalize_email, CredentialStore};
pub use error::AuthError;
pub use extractor::Auth;
pub use password::{BcryptHasher, PasswordHasher};
pub use policy::{allowed, authorize, Operation};
pub use roles::Role;
pub use session::{IssuedToken, SessionTokens, DEFAULT_TTL_MINUTES};
