// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types.
//!
//! Components return [`ServiceError`]; only the HTTP layer turns it into an
//! [`ApiError`] with a status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::codec::CodecError;
use crate::storage::{BlobError, StorageError};

/// Failures raised by the credential store, catalog, and download broker.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid file type: {0}")]
    UnsupportedType(String),

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("blob failure: {0}")]
    Blob(#[from] BlobError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CodecError> for ServiceError {
    fn from(_: CodecError) -> Self {
        ServiceError::InvalidToken
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            ServiceError::Forbidden(message) => ApiError::forbidden(message),
            ServiceError::NotFound(message) => ApiError::not_found(message),
            // Duplicate signup is reported as a plain 400
            ServiceError::Conflict(message) | ServiceError::InvalidInput(message) => {
                ApiError::bad_request(message)
            }
            ServiceError::InvalidToken | ServiceError::UnsupportedType(_) => {
                ApiError::bad_request(err.to_string())
            }
            ServiceError::Storage(_) | ServiceError::Blob(_) | ServiceError::Internal(_) => {
                tracing::error!(error = %err, "Request failed with internal error");
                ApiError::internal("Unexpected error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::new(err.status_code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
