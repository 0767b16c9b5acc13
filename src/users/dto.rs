use serde::Deserialize;

/// Request body for `POST /users` and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `PUT` and `PATCH /users/{id}`.
///
/// For `PUT` the service requires `name` and `email`; `password` is optional in
/// both cases and is re-hashed when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
