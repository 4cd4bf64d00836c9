// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Form, Json,
};
use tokio::task::spawn_blocking;

use crate::{
    auth::Role,
    error::{ApiError, ServiceError},
    models::{LoginForm, MessageResponse, SignupRequest, SignupResponse, TokenResponse},
    state::AppState,
};

/// Run password hashing work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::Internal(format!("Blocking task failed: {e}")))?
        .map_err(ApiError::from)
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    tag = "Accounts",
    responses(
        (status = 200, body = SignupResponse),
        (status = 400, description = "Email already registered or malformed")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    let role = Role::parse(&request.role);
    let credentials = state.credentials.clone();
    let user = blocking(move || credentials.register(&request.email, &request.password, role)).await?;

    let token = state
        .codec
        .encode(&user.email)
        .map_err(|e| ApiError::from(ServiceError::Internal(e.to_string())))?;

    Ok(Json(SignupResponse {
        message: "Signup successful".to_string(),
        verification_url: format!("/verify-email/{token}"),
    }))
}

#[utoipa::path(
    get,
    path = "/verify-email/{token}",
    params(
        ("token" = String, Path, description = "Verification token returned at signup")
    ),
    tag = "Accounts",
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid token or unknown email")
    )
)]
pub async fn verify_email(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = state.codec.decode(&token).map_err(ServiceError::from)?;

    match state.credentials.mark_verified(&email) {
        Ok(_) => Ok(Json(MessageResponse::new("Email verified"))),
        Err(ServiceError::NotFound(message)) => Err(ApiError::bad_request(message)),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    tag = "Accounts",
    responses(
        (status = 200, body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let credentials = state.credentials.clone();
    let user = blocking(move || credentials.authenticate(&form.username, &form.password)).await?;

    let issued = state.sessions.issue(&user.email)?;
    tracing::info!(email = %user.email, expires_at = %issued.expires_at, "Session issued");

    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "bearer".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::TestContext;
    use axum::http::StatusCode;

    fn signup_request(email: &str, role: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: "pw".to_string(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn signup_then_verify_flips_flag() {
        let ctx = TestContext::new().await;

        let Json(response) = signup(
            State(ctx.state.clone()),
            Json(signup_request("client@example.com", "client")),
        )
        .await
        .unwrap();
        assert_eq!(response.message, "Signup successful");

        let token = response
            .verification_url
            .strip_prefix("/verify-email/")
            .unwrap()
            .to_string();
        let Json(message) = verify_email(Path(token), State(ctx.state.clone()))
            .await
            .unwrap();
        assert_eq!(message.message, "Email verified");

        let user = ctx.state.credentials.get("client@example.com").unwrap().unwrap();
        assert!(user.is_verified);
        assert_eq!(user.role, Role::Client);
    }

    #[tokio::test]
    async fn duplicate_signup_is_bad_request() {
        let ctx = TestContext::new().await;
        ctx.user("dup@example.com", Role::Ops, false);

        let err = signup(
            State(ctx.state.clone()),
            Json(signup_request("dup@example.com", "client")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Email already registered");
    }

    #[tokio::test]
    async fn verify_with_bad_token_is_bad_request() {
        let ctx = TestContext::new().await;
        let err = verify_email(Path("garbage".to_string()), State(ctx.state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid or expired token");
    }

    #[tokio::test]
    async fn verify_for_unknown_email_is_bad_request() {
        let ctx = TestContext::new().await;
        let token = ctx.state.codec.encode("ghost@example.com").unwrap();
        let err = verify_email(Path(token), State(ctx.state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_issues_bearer_token() {
        let ctx = TestContext::new().await;
        ctx.user("ops@example.com", Role::Ops, false);

        let Json(response) = login(
            State(ctx.state.clone()),
            Form(LoginForm {
                username: "ops@example.com".to_string(),
                password: "password".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.token_type, "bearer");

        let claims = ctx.state.sessions.decode(&response.access_token).unwrap();
        assert_eq!(claims.sub, "ops@example.com");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let ctx = TestContext::new().await;
        ctx.user("ops@example.com", Role::Ops, false);

        let err = login(
            State(ctx.state.clone()),
            Form(LoginForm {
                username: "ops@example.com".to_string(),
                password: "nope".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Invalid credentials");
    }
}
