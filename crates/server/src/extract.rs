//! Request extractors: the authenticated user and best-effort request
//! metadata for audit rows.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::{AUTHORIZATION, USER_AGENT};
use axum::http::request::Parts;
use axum::http::StatusCode;

use crate::errors::ApiError;
use crate::state::AppState;
use service::auth::domain::AuthUser;

/// The bearer-token authenticated user. Rejects with 401 when the header is
/// missing or the token does not resolve to an active account.
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                ApiError::new(StatusCode::UNAUTHORIZED, "could not validate credentials")
            })?;
        let user = state.auth.current_user(token).await?;
        Ok(CurrentUser(user))
    }
}

/// Source address and user agent, both optional; audit rows leave the
/// columns empty when they are unavailable.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let source_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip().to_string());
        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(RequestMeta { source_ip, user_agent })
    }
}
