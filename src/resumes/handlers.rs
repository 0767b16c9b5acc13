use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateResumeRequest, UpdateResumeRequest},
    repo_types::Resume,
    services,
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppJson, AppPath},
    state::AppState,
};

pub fn resume_routes() -> Router<AppState> {
    Router::new()
        .route("/resumes", get(list_resumes).post(create_resume))
        .route(
            "/resumes/:id",
            get(get_resume)
                .put(update_resume)
                .patch(update_resume_partial)
                .delete(delete_resume),
        )
        .route("/resumes/:id/improve", post(improve_resume))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn list_resumes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(
        services::list_resumes(state.resumes.as_ref(), user.id).await?,
    ))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn create_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<CreateResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let resume = services::create_resume(state.resumes.as_ref(), user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

#[instrument(skip_all, fields(user_id = user.id, resume_id = id))]
pub async fn get_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(
        services::get_resume(state.resumes.as_ref(), user.id, id).await?,
    ))
}

#[instrument(skip_all, fields(user_id = user.id, resume_id = id))]
pub async fn update_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateResumeRequest>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(
        services::update_resume(state.resumes.as_ref(), user.id, id, payload, false).await?,
    ))
}

#[instrument(skip_all, fields(user_id = user.id, resume_id = id))]
pub async fn update_resume_partial(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateResumeRequest>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(
        services::update_resume(state.resumes.as_ref(), user.id, id, payload, true).await?,
    ))
}

#[instrument(skip_all, fields(user_id = user.id, resume_id = id))]
pub async fn delete_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    services::delete_resume(state.resumes.as_ref(), user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(user_id = user.id, resume_id = id))]
pub async fn improve_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(
        services::improve_resume(state.resumes.as_ref(), user.id, id).await?,
    ))
}
