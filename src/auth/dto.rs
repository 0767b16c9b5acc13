use serde::{Deserialize, Serialize};

/// Request body for `POST /auth/register`.
pub use crate::users::dto::CreateUserRequest as RegisterRequest;

/// Form body for `POST /auth/login` (OAuth2 password-flow field names).
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}
