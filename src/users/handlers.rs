use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateUserRequest, UpdateUserRequest},
    repo_types::User,
    services,
};
use crate::{
    error::{AppError, AppJson, AppPath},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user)
                .put(update_user)
                .patch(update_user_partial)
                .delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(services::list_users(state.users.as_ref()).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = services::create_user(state.users.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<User>, AppError> {
    Ok(Json(services::get_user(state.users.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        services::update_user(state.users.as_ref(), id, payload, false).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_user_partial(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        services::update_user(state.users.as_ref(), id, payload, true).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    services::delete_user(state.users.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    use crate::{app::build_app, config::AppMode, state::AppState};

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn login(app: &Router, email: &str, password: &str) -> StatusCode {
        let form = serde_urlencoded::to_string([("username", email), ("password", password)])
            .unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn crud_roundtrip() {
        let app = build_app(AppState::fake(AppMode::Api));

        let (status, created) = call(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({"name": "Ann", "email": "ann@x.com", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created.get("password_hash").is_none());
        let id = created["id"].as_i64().unwrap();
        let uri = format!("/api/v1/users/{id}");

        let (status, listed) = call(&app, "GET", "/api/v1/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, fetched) = call(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, replaced) = call(
            &app,
            "PUT",
            &uri,
            Some(json!({"name": "Annie", "email": "annie@x.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(replaced["name"], "Annie");
        assert_eq!(replaced["email"], "annie@x.com");

        let (status, _) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = call(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], format!("User {id} not found"));
    }

    #[tokio::test]
    async fn duplicate_email_is_409() {
        let app = build_app(AppState::fake(AppMode::Api));
        let ann = json!({"name": "Ann", "email": "ann@x.com", "password": "pw"});
        call(&app, "POST", "/api/v1/users", Some(ann.clone())).await;
        let (status, _) = call(&app, "POST", "/api/v1/users", Some(ann)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn put_without_email_is_400() {
        let app = build_app(AppState::fake(AppMode::Api));
        let (_, created) = call(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({"name": "Ann", "email": "ann@x.com", "password": "pw"})),
        )
        .await;
        let uri = format!("/api/v1/users/{}", created["id"]);
        let (status, _) = call(&app, "PUT", &uri, Some(json!({"name": "Ann"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_user_is_404_for_every_verb() {
        let app = build_app(AppState::fake(AppMode::Api));
        let body = json!({"name": "X", "email": "x@x.com"});
        assert_eq!(call(&app, "GET", "/api/v1/users/7", None).await.0, StatusCode::NOT_FOUND);
        assert_eq!(
            call(&app, "PUT", "/api/v1/users/7", Some(body.clone())).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            call(&app, "PATCH", "/api/v1/users/7", Some(body)).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(call(&app, "DELETE", "/api/v1/users/7", None).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_id_is_400_with_message() {
        let app = build_app(AppState::fake(AppMode::Api));
        for uri in ["/api/v1/users/abc", "/api/v1/users/99999999999999999999"] {
            let (status, body) = call(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["message"].is_string(), "{uri}: {body}");
        }
        let (status, body) = call(&app, "DELETE", "/api/v1/users/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn patched_password_replaces_the_old_one() {
        let app = build_app(AppState::fake(AppMode::Api));
        let (_, created) = call(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({"name": "Ann", "email": "ann@x.com", "password": "pw"})),
        )
        .await;
        let uri = format!("/api/v1/users/{}", created["id"]);

        let (status, patched) = call(&app, "PATCH", &uri, Some(json!({"password": "newpw"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["name"], "Ann");
        assert_eq!(patched["email"], "ann@x.com");

        assert_eq!(login(&app, "ann@x.com", "newpw").await, StatusCode::OK);
        assert_eq!(login(&app, "ann@x.com", "pw").await, StatusCode::UNAUTHORIZED);
    }
}
