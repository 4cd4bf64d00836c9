// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::io;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use futures_util::{pin_mut, TryStreamExt};
use tokio_util::io::StreamReader;

use crate::{
    auth::{authorize, Auth, Operation},
    error::{ApiError, ServiceError},
    models::{StoredFile, UploadForm, UploadResponse},
    state::AppState,
    storage::BlobError,
};

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    tag = "Files",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UploadResponse),
        (status = 400, description = "Missing file or unsupported type"),
        (status = 403, description = "Caller is not ops")
    )
)]
pub async fn upload_file(
    Auth(user): Auth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    authorize(Operation::Upload, &user)?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::bad_request("Missing filename"))?;

        let reader = StreamReader::new(field.map_err(io::Error::other));
        pin_mut!(reader);

        let file = state
            .catalog
            .register_upload(&filename, &user.email, &mut reader)
            .await
            .map_err(upload_error)?;

        return Ok(Json(UploadResponse {
            message: "File uploaded".to_string(),
            file,
        }));
    }

    Err(ApiError::bad_request("Missing file"))
}

#[utoipa::path(
    get,
    path = "/list-files",
    tag = "Files",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [StoredFile]),
        (status = 403, description = "Caller is not a verified client")
    )
)]
pub async fn list_files(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredFile>>, ApiError> {
    authorize(Operation::ListFiles, &user)?;
    Ok(Json(state.catalog.list_all()?))
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

/// A body that fails mid-stream (too large, truncated) is the client's
/// fault, not a storage failure.
fn upload_error(err: ServiceError) -> ApiError {
    if let ServiceError::Blob(BlobError::Io(io_err)) = &err {
        if let Some(multipart) = io_err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
        {
            tracing::debug!(error = %multipart, "Upload body rejected");
            let status = multipart.status();
            let status = if status.is_client_error() {
                status
            } else {
                StatusCode::BAD_REQUEST
            };
            return ApiError::new(status, multipart.body_text());
        }
    }
    err.into()
}
