use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginForm, MessageResponse, RegisterRequest, TokenResponse},
        extractors::AuthUser,
        services::{authenticate, register as register_user, TokenAuth},
    },
    error::{AppError, AppForm, AppJson},
    state::AppState,
    users::repo_types::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

/// A taken email is a 400 on this endpoint, like any other bad input.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    register_user(state.users.as_ref(), payload)
        .await
        .map_err(|e| match e {
            AppError::Conflict(msg) => AppError::Validation(msg),
            other => other,
        })?;
    Ok(Json(MessageResponse {
        msg: "User registered successfully".into(),
    }))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    AppForm(form): AppForm<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = authenticate(state.users.as_ref(), &form.username, &form.password).await?;
    let token = TokenAuth::from_state(&state).issue(&user)?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
