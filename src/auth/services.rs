use tracing::{info, warn};

use super::{
    dto::RegisterRequest,
    jwt::{JwtKeys, TokenError},
    password::verify_password,
};
use crate::{
    error::AppError,
    state::AppState,
    users::{repo::UserRepository, repo_types::User, services::create_user},
};

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

/// Creates an account. A taken email comes back as `Conflict`.
pub async fn register(
    repo: &dyn UserRepository,
    input: RegisterRequest,
) -> Result<User, AppError> {
    let user = create_user(repo, input).await?;
    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Checks an email/password pair. Unknown email and wrong password are
/// reported the same way.
pub async fn authenticate(
    repo: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = email.trim().to_lowercase();
    let Some(user) = repo.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(invalid_credentials());
    };
    if !verify_password(password, &user.password_hash) {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(invalid_credentials());
    }
    info!(user_id = user.id, "user logged in");
    Ok(user)
}

/// Resolves a bearer token to the user it was issued for. Shared by the
/// `Authorization` header and the session cookie.
pub struct TokenAuth<'a> {
    keys: &'a JwtKeys,
    users: &'a dyn UserRepository,
}

impl<'a> TokenAuth<'a> {
    pub fn new(keys: &'a JwtKeys, users: &'a dyn UserRepository) -> Self {
        Self { keys, users }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(&state.keys, state.users.as_ref())
    }

    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        Ok(self.keys.issue(&user.email)?)
    }

    pub async fn current_user(&self, token: &str) -> Result<User, AppError> {
        let claims = self.keys.verify(token).map_err(|e| {
            warn!(reason = %e, "token rejected");
            let message = match e {
                TokenError::Expired => "Token expired",
                TokenError::Invalid => "Invalid token",
            };
            AppError::Unauthorized(message.into())
        })?;

        self.users
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(sub = %claims.sub, "token subject has no user");
                AppError::Unauthorized("User not found".into())
            })
    }
}
