use async_trait::async_trait;
use sqlx::PgPool;

use super::improve::improved_description;
use super::repo_types::{NewResume, Resume, ResumeChanges};
use crate::error::AppError;

/// Every lookup is scoped by owner, so a resume owned by someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Resume>, AppError>;
    async fn find_owned(&self, owner_id: i64, id: i64) -> Result<Option<Resume>, AppError>;
    async fn insert(&self, resume: &NewResume) -> Result<Resume, AppError>;
    async fn update_owned(
        &self,
        owner_id: i64,
        id: i64,
        changes: &ResumeChanges,
    ) -> Result<Option<Resume>, AppError>;
    async fn delete_owned(&self, owner_id: i64, id: i64) -> Result<bool, AppError>;
    /// Appends the improvement suffix unless the description already has it.
    async fn improve_owned(&self, owner_id: i64, id: i64) -> Result<Option<Resume>, AppError>;
}

pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Resume>, AppError> {
        let rows = sqlx::query_as::<_, Resume>(
            r#"
            SELECT id, title, description, owner_id
            FROM resumes
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_owned(&self, owner_id: i64, id: i64) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as::<_, Resume>(
            r#"
            SELECT id, title, description, owner_id
            FROM resumes
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, resume: &NewResume) -> Result<Resume, AppError> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, owner_id
            "#,
        )
        .bind(&resume.title)
        .bind(resume.description.as_deref())
        .bind(resume.owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Resume owner does not exist"))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update_owned(
        &self,
        owner_id: i64,
        id: i64,
        changes: &ResumeChanges,
    ) -> Result<Option<Resume>, AppError> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Resume>(
            r#"
            UPDATE resumes
               SET title = COALESCE($3, title),
                   description = CASE WHEN $4 THEN $5 ELSE description END
             WHERE id = $1 AND owner_id = $2
            RETURNING id, title, description, owner_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.title.as_deref())
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_owned(&self, owner_id: i64, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn improve_owned(&self, owner_id: i64, id: i64) -> Result<Option<Resume>, AppError> {
        let mut tx = self.pool.begin().await?;
        let Some(current) = sqlx::query_as::<_, Resume>(
            r#"
            SELECT id, title, description, owner_id
            FROM resumes
            WHERE id = $1 AND owner_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let Some(description) = improved_description(current.description.as_deref()) else {
            tx.commit().await?;
            return Ok(Some(current));
        };

        let improved = sqlx::query_as::<_, Resume>(
            r#"
            UPDATE resumes
               SET description = $2
             WHERE id = $1
            RETURNING id, title, description, owner_id
            "#,
        )
        .bind(id)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(improved))
    }
}
