use tracing::info;

use super::{
    dto::{CreateUserRequest, UpdateUserRequest},
    repo::UserRepository,
    repo_types::{NewUser, User, UserChanges},
};
use crate::{
    auth::password::hash_password,
    error::AppError,
    validation::{normalize_email, required_password, required_text, NAME_MAX},
};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User {id} not found"))
}

pub async fn list_users(repo: &dyn UserRepository) -> Result<Vec<User>, AppError> {
    repo.list().await
}

pub async fn get_user(repo: &dyn UserRepository, id: i64) -> Result<User, AppError> {
    repo.find_by_id(id).await?.ok_or_else(|| not_found(id))
}

pub async fn create_user(
    repo: &dyn UserRepository,
    input: CreateUserRequest,
) -> Result<User, AppError> {
    let name = required_text("name", &input.name, NAME_MAX)?;
    let email = normalize_email(&input.email)?;
    let password_hash = hash_password(required_password(&input.password)?)?;

    let user = repo
        .insert(&NewUser {
            name,
            email,
            password_hash,
        })
        .await?;
    info!(user_id = user.id, email = %user.email, "user created");
    Ok(user)
}

/// Full (`partial == false`) or partial update. A full update needs `name`
/// and `email`; a partial one touches only what was supplied.
pub async fn update_user(
    repo: &dyn UserRepository,
    id: i64,
    input: UpdateUserRequest,
    partial: bool,
) -> Result<User, AppError> {
    if !partial {
        if input.name.is_none() {
            return Err(AppError::Validation("name is required".into()));
        }
        if input.email.is_none() {
            return Err(AppError::Validation("email is required".into()));
        }
    }

    let changes = UserChanges {
        name: input
            .name
            .as_deref()
            .map(|n| required_text("name", n, NAME_MAX))
            .transpose()?,
        email: input.email.as_deref().map(normalize_email).transpose()?,
        password_hash: input
            .password
            .as_deref()
            .map(|p| required_password(p).and_then(|p| Ok(hash_password(p)?)))
            .transpose()?,
    };

    let user = repo.update(id, &changes).await?.ok_or_else(|| not_found(id))?;
    info!(
        user_id = user.id,
        partial,
        password_changed = changes.password_hash.is_some(),
        "user updated"
    );
    Ok(user)
}

pub async fn delete_user(repo: &dyn UserRepository, id: i64) -> Result<(), AppError> {
    if !repo.delete(id).await? {
        return Err(not_found(id));
    }
    info!(user_id = id, "user deleted");
    Ok(())
}
