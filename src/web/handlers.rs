use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{error, instrument, warn};

use super::pages;
use crate::{
    auth::{
        dto::RegisterRequest,
        extractors::{CookieUser, ACCESS_TOKEN_COOKIE},
        services::{authenticate, register as register_user, TokenAuth},
    },
    error::AppError,
    resumes::{
        dto::{CreateResumeRequest, UpdateResumeRequest},
        services as resumes,
    },
    state::AppState,
};

pub fn web_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/register", get(register_page).post(register_submit))
        .route("/index", get(index))
        .route("/create_resume", post(create_resume))
        .route("/update_resume", post(update_resume))
        .route("/update_resume_partial", post(update_resume_partial))
        .route("/delete_resume/:id", post(delete_resume))
        .route("/improve_resume", post(improve_resume))
        .route("/logout", post(logout))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumeForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeEditForm {
    pub resume_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeIdForm {
    pub resume_id: i64,
}

/// `303` to `path`, carrying `msg` in the query string.
fn redirect_with(path: &str, msg: &str) -> Redirect {
    match serde_urlencoded::to_string([("msg", msg)]) {
        Ok(query) => Redirect::to(&format!("{path}?{query}")),
        Err(_) => Redirect::to(path),
    }
}

fn back_to(path: &str, err: AppError) -> Redirect {
    if err.status().is_server_error() {
        warn!(error = %err, "html action failed");
    }
    redirect_with(path, &err.public_message())
}

fn bad_form(path: &str, rejection: FormRejection) -> Redirect {
    redirect_with(path, &rejection.body_text())
}

/// Blank form fields count as not supplied.
fn supplied(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

pub async fn login_page(Query(query): Query<PageQuery>) -> Html<String> {
    pages::login(query.msg.as_deref())
}

pub async fn register_page(Query(query): Query<PageQuery>) -> Html<String> {
    pages::register(query.msg.as_deref())
}

#[instrument(skip_all)]
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return bad_form("/login", rejection).into_response(),
    };
    let user = match authenticate(state.users.as_ref(), &form.email, &form.password).await {
        Ok(user) => user,
        Err(err) => return back_to("/login", err).into_response(),
    };
    match TokenAuth::from_state(&state).issue(&user) {
        Ok(token) => (jar.add(session_cookie(token)), Redirect::to("/index")).into_response(),
        Err(err) => back_to("/login", err).into_response(),
    }
}

#[instrument(skip_all)]
pub async fn register_submit(
    State(state): State<AppState>,
    form: Result<Form<RegisterRequest>, FormRejection>,
) -> Redirect {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return bad_form("/register", rejection),
    };
    match register_user(state.users.as_ref(), form).await {
        Ok(_) => redirect_with("/login", "Registration successful, please log in"),
        Err(err) => back_to("/register", err),
    }
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn index(
    State(state): State<AppState>,
    CookieUser(user): CookieUser,
    Query(query): Query<PageQuery>,
) -> Response {
    match resumes::list_resumes(state.resumes.as_ref(), user.id).await {
        Ok(list) => pages::index(&user, &list, query.msg.as_deref()).into_response(),
        Err(err) => {
            error!(error = %err, "index page failed");
            (err.status(), pages::error(&err.public_message())).into_response()
        }
    }
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn create_resume(
    State(state): State<AppState>,
    CookieUser(user): CookieUser,
    form: Result<Form<ResumeForm>, FormRejection>,
) -> Redirect {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return bad_form("/index", rejection),
    };
    let input = CreateResumeRequest {
        title: form.title.unwrap_or_default(),
        description: supplied(form.description),
    };
    match resumes::create_resume(state.resumes.as_ref(), user.id, input).await {
        Ok(_) => Redirect::to("/index"),
        Err(err) => back_to("/index", err),
    }
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn update_resume(
    State(state): State<AppState>,
    CookieUser(user): CookieUser,
    form: Result<Form<ResumeEditForm>, FormRejection>,
) -> Redirect {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return bad_form("/index", rejection),
    };
    let input = UpdateResumeRequest {
        title: form.title,
        description: Some(supplied(form.description)),
    };
    match resumes::update_resume(state.resumes.as_ref(), user.id, form.resume_id, input, false)
        .await
    {
        Ok(_) => Redirect::to("/index"),
        Err(err) => back_to("/index", err),
    }
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn update_resume_partial(
    State(state): State<AppState>,
    CookieUser(user): CookieUser,
    form: Result<Form<ResumeEditForm>, FormRejection>,
) -> Redirect {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return bad_form("/index", rejection),
    };
    let input = UpdateResumeRequest {
        title: supplied(form.title),
        description: supplied(form.description).map(Some),
    };
    match resumes::update_resume(state.resumes.as_ref(), user.id, form.resume_id, input, true)
        .await
    {
        Ok(_) => Redirect::to("/index"),
        Err(err) => back_to("/index", err),
    }
}

#[instrument(skip_all, fields(user_id = user.id, resume_id = id))]
pub async fn delete_resume(
    State(state): State<AppState>,
    CookieUser(user): CookieUser,
    Path(id): Path<i64>,
) -> Redirect {
    match resumes::delete_resume(state.resumes.as_ref(), user.id, id).await {
        Ok(()) => Redirect::to("/index"),
        Err(err) => back_to("/index", err),
    }
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn improve_resume(
    State(state): State<AppState>,
    CookieUser(user): CookieUser,
    form: Result<Form<ResumeIdForm>, FormRejection>,
) -> Redirect {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return bad_form("/index", rejection),
    };
    match resumes::improve_resume(state.resumes.as_ref(), user.id, form.resume_id).await {
        Ok(_) => Redirect::to("/index"),
        Err(err) => back_to("/index", err),
    }
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"));
    (jar, Redirect::to("/login"))
}
