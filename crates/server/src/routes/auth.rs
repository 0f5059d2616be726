use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::errors::ApiError;
use crate::extract::{CurrentUser, RequestMeta};
use crate::state::AppState;
use service::audit::AuditEvent;
use service::auth::domain::{AuthUser, LoginInput, ProfileUpdate, RegisterInput};
use service::auth::errors::AuthError;

#[derive(Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[utoipa::path(
    post, path = "/register/", tag = "users",
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthUser>), ApiError> {
    let email = input.email.clone();
    match state.auth.register(input).await {
        Ok(user) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("register", "SUCCESS")
                        .user(user.id)
                        .entity("user", user.id)
                        .details("user registered successfully")
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Ok((StatusCode::CREATED, Json(user)))
        }
        Err(e) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("register_attempt", "FAILED")
                        // The account does not exist yet; identify by email
                        .user(&email)
                        .details(format!("registration failed: {e}"))
                        .request_meta(meta.source_ip, meta.user_agent)
                        .masked(),
                )
                .await;
            Err(e.into())
        }
    }
}

#[utoipa::path(
    post, path = "/token", tag = "users",
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 400, description = "Account locked"),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(input): Json<LoginInput>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = input.email.clone();
    match state.auth.login(input).await {
        Ok(session) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("login", "SUCCESS")
                        .user(session.user.id)
                        .details("user logged in successfully")
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Ok(Json(TokenResponse { access_token: session.token, token_type: "bearer" }))
        }
        Err(e) => {
            let status = match &e {
                AuthError::Locked => "FAILED_LOCKED",
                _ => "FAILED",
            };
            state
                .audit
                .log_event(
                    AuditEvent::new("login_attempt", status)
                        .user(&email)
                        .details(format!("login failed: {e}"))
                        .request_meta(meta.source_ip, meta.user_agent)
                        .masked(),
                )
                .await;
            Err(e.into())
        }
    }
}

#[utoipa::path(
    get, path = "/users/me/", tag = "users",
    responses(
        (status = 200, description = "Current user"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<AuthUser> {
    Json(user)
}

#[utoipa::path(
    put, path = "/users/me/", tag = "users",
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<AuthUser>, ApiError> {
    let updated = state.auth.update_profile(user.id, update).await?;
    Ok(Json(updated))
}
