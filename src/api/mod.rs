// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    models::{
        DownloadLinkResponse, HistoryEntry, LoginForm, MessageResponse, SignupRequest,
        SignupResponse, StoredFile, TokenResponse, UploadForm, UploadResponse,
    },
    state::AppState,
};

pub mod accounts;
pub mod downloads;
pub mod files;
pub mod health;

pub fn router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    let routes = Router::new()
        .route("/", get(root))
        .route("/signup", post(accounts::signup))
        .route("/verify-email/{token}", get(accounts::verify_email))
        .route("/login", post(accounts::login))
        .route("/upload", post(files::upload_file).layer(upload_limit))
        .route("/list-files", get(files::list_files))
        .route(
            "/download-file/{file_id}",
            get(downloads::request_download_link),
        )
        .route("/secure-download/{token}", get(downloads::secure_download))
        .route("/download-history", get(downloads::download_history))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// `GET /` sends browsers to the API docs.
async fn root() -> Redirect {
    Redirect::temporary("/docs")
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::signup,
        accounts::verify_email,
        accounts::login,
        files::upload_file,
        files::list_files,
        downloads::request_download_link,
        downloads::secure_download,
        downloads::download_history,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Role,
            SignupRequest,
            SignupResponse,
            MessageResponse,
            LoginForm,
            TokenResponse,
            UploadForm,
            UploadResponse,
            StoredFile,
            DownloadLinkResponse,
            HistoryEntry,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Signup, email verification, and login"),
        (name = "Files", description = "Document upload and listing"),
        (name = "Downloads", description = "Secure download links"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
