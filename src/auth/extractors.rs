use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error};

use super::services::TokenAuth;
use crate::{error::AppError, state::AppState, users::repo_types::User, web::pages};

/// Name of the cookie carrying the access token in the HTML flow.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Caller identified by `Authorization: Bearer <token>`.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let user = TokenAuth::from_state(state).current_user(token.trim()).await?;
        Ok(AuthUser(user))
    }
}

/// Caller identified by the `access_token` cookie. Anyone else is sent to
/// the login page; a server failure renders an error page instead.
pub struct CookieUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CookieUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) else {
            debug!("no session cookie");
            return Err(Redirect::to("/login").into_response());
        };
        match TokenAuth::from_state(state).current_user(cookie.value()).await {
            Ok(user) => Ok(CookieUser(user)),
            Err(err) if err.status().is_server_error() => {
                error!(error = %err, "session lookup failed");
                Err((err.status(), pages::error(&err.public_message())).into_response())
            }
            Err(_) => Err(Redirect::to("/login").into_response()),
        }
    }
}
