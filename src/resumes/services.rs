use tracing::info;

use super::{
    dto::{CreateResumeRequest, UpdateResumeRequest},
    repo::ResumeRepository,
    repo_types::{NewResume, Resume, ResumeChanges},
};
use crate::{
    error::AppError,
    validation::{bounded_text, required_text, DESCRIPTION_MAX, TITLE_MAX},
};

fn not_found() -> AppError {
    AppError::NotFound("Resume not found".into())
}

fn checked_description(raw: Option<&str>) -> Result<Option<String>, AppError> {
    raw.map(|d| bounded_text("description", d, DESCRIPTION_MAX))
        .transpose()
}

pub async fn list_resumes(
    repo: &dyn ResumeRepository,
    owner_id: i64,
) -> Result<Vec<Resume>, AppError> {
    repo.list_by_owner(owner_id).await
}

pub async fn get_resume(
    repo: &dyn ResumeRepository,
    owner_id: i64,
    id: i64,
) -> Result<Resume, AppError> {
    repo.find_owned(owner_id, id).await?.ok_or_else(not_found)
}

pub async fn create_resume(
    repo: &dyn ResumeRepository,
    owner_id: i64,
    input: CreateResumeRequest,
) -> Result<Resume, AppError> {
    let resume = repo
        .insert(&NewResume {
            title: required_text("title", &input.title, TITLE_MAX)?,
            description: checked_description(input.description.as_deref())?,
            owner_id,
        })
        .await?;
    info!(resume_id = resume.id, owner_id, "resume created");
    Ok(resume)
}

pub async fn update_resume(
    repo: &dyn ResumeRepository,
    owner_id: i64,
    id: i64,
    input: UpdateResumeRequest,
    partial: bool,
) -> Result<Resume, AppError> {
    let title = input
        .title
        .as_deref()
        .map(|t| required_text("title", t, TITLE_MAX))
        .transpose()?;
    let description = input
        .description
        .map(|d| checked_description(d.as_deref()))
        .transpose()?;

    let changes = if partial {
        ResumeChanges { title, description }
    } else {
        let Some(title) = title else {
            return Err(AppError::Validation("title is required".into()));
        };
        let Some(description) = description else {
            return Err(AppError::Validation("description is required".into()));
        };
        ResumeChanges {
            title: Some(title),
            description: Some(description),
        }
    };

    let resume = repo
        .update_owned(owner_id, id, &changes)
        .await?
        .ok_or_else(not_found)?;
    info!(resume_id = resume.id, owner_id, partial, "resume updated");
    Ok(resume)
}

pub async fn delete_resume(
    repo: &dyn ResumeRepository,
    owner_id: i64,
    id: i64,
) -> Result<(), AppError> {
    if !repo.delete_owned(owner_id, id).await? {
        return Err(not_found());
    }
    info!(resume_id = id, owner_id, "resume deleted");
    Ok(())
}

/// Idempotent: a second call returns the resume unchanged.
pub async fn improve_resume(
    repo: &dyn ResumeRepository,
    owner_id: i64,
    id: i64,
) -> Result<Resume, AppError> {
    let resume = repo
        .improve_owned(owner_id, id)
        .await?
        .ok_or_else(not_found)?;
    info!(resume_id = resume.id, owner_id, "resume improved");
    Ok(resume)
}
