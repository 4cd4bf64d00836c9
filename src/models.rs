// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Everything exposed over
//! HTTP derives `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Accounts**: signup, email verification, login
//! - **Files**: upload and listing
//! - **Downloads**: secure links and history

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::broker::HistoryEntry;
pub use crate::storage::StoredFile;

// =============================================================================
// Account Models
// =============================================================================

/// Request body for `POST /signup`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// `ops` or `client`; anything else creates an account with no privileges
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SignupResponse {
    pub message: String,
    /// Relative link that verifies the new account's email
    pub verification_url: String,
}

/// Generic `{ "message": ... }` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Form body for `POST /login` (OAuth2 password-flow field names).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LoginForm {
    /// The account email
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
}

// =============================================================================
// File Models
// =============================================================================

/// Multipart body for `POST /upload`. Documentation only; the handler reads
/// the stream directly.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// A `.docx`, `.pptx`, or `.xlsx` document
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UploadResponse {
    pub message: String,
    pub file: StoredFile,
}

// =============================================================================
// Download Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DownloadLinkResponse {
    /// Relative link, redeemable only by the requesting client
    #[serde(rename = "download-link")]
    pub download_link: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_link_uses_hyphenated_key() {
        let body = DownloadLinkResponse {
            download_link: "/secure-download/abc".to_string(),
            message: "success".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["download-link"], "/secure-download/abc");
        assert!(json.get("download_link").is_none());
    }

    #[test]
    fn signup_request_parses() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"a@example.com","password":"pw","role":"client"}"#,
        )
        .unwrap();
        assert_eq!(req.role, "client");
    }
}
