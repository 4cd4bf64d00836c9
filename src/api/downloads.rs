// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tokio_util::io::ReaderStream;

use crate::{
    auth::{authorize, Auth, Operation},
    error::{ApiError, ServiceError},
    models::{DownloadLinkResponse, HistoryEntry},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/download-file/{file_id}",
    params(
        ("file_id" = String, Path, description = "Identifier of the file to download")
    ),
    tag = "Downloads",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = DownloadLinkResponse),
        (status = 403, description = "Caller is not a verified client"),
        (status = 404, description = "File not found")
    )
)]
pub async fn request_download_link(
    Auth(user): Auth,
    Path(file_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DownloadLinkResponse>, ApiError> {
    authorize(Operation::RequestDownloadLink, &user)?;
    let token = state.broker.request_link(&file_id, &user)?;

    Ok(Json(DownloadLinkResponse {
        download_link: format!("/secure-download/{token}"),
        message: "success".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/secure-download/{token}",
    params(
        ("token" = String, Path, description = "Token from a download link")
    ),
    tag = "Downloads",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "File bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid or expired token"),
        (status = 403, description = "Link belongs to another user"),
        (status = 404, description = "File not found")
    )
)]
pub async fn secure_download(
    Auth(user): Auth,
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let handle = state.broker.redeem(&token, &user).await?;
    tracing::debug!(file_id = %handle.file_id, size = handle.blob.len, "Streaming download");

    let disposition = content_disposition(&handle.filename)?;
    let body = Body::from_stream(ReaderStream::new(handle.blob.file));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(handle.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(handle.blob.len)),
        ],
        body,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/download-history",
    tag = "Downloads",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [HistoryEntry]),
        (status = 403, description = "Caller is not a verified client")
    )
)]
pub async fn download_history(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    authorize(Operation::ViewDownloadHistory, &user)?;
    Ok(Json(state.broker.history()?))
}

/// `attachment` with an ASCII `filename` fallback and an RFC 5987
/// `filename*` carrying the exact UTF-8 name.
fn content_disposition(filename: &str) -> Result<HeaderValue, ApiError> {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' => "\\\"".to_string(),
            '\\' => "\\\\".to_string(),
            ' '..='~' => c.to_string(),
            _ => "_".to_string(),
        })
        .collect();
    let encoded = urlencoding::encode(filename);

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}"
    ))
    .map_err(|e| ServiceError::Internal(format!("Invalid filename header: {e}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_disposition_quotes_filename() {
        assert_eq!(
            content_disposition("q3.xlsx").unwrap(),
            "attachment; filename=\"q3.xlsx\"; filename*=UTF-8''q3.xlsx"
        );
        assert_eq!(
            content_disposition("a\"b.docx").unwrap(),
            "attachment; filename=\"a\\\"b.docx\"; filename*=UTF-8''a%22b.docx"
        );
    }

    #[test]
    fn content_disposition_encodes_non_ascii_names() {
        let value = content_disposition("résumé.docx").unwrap();
        assert_eq!(
            value,
            "attachment; filename=\"r_sum_.docx\"; filename*=UTF-8''r%C3%A9sum%C3%A9.docx"
        );
        assert!(value.to_str().is_ok());
    }
}
