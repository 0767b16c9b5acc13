//! Test doubles: an in-memory store that behaves like the Postgres schema
//! (unique email, restricting foreign key), a store whose every call fails,
//! and the fixture key pair.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::auth::jwt::JwtKeys;
use crate::error::AppError;
use crate::resumes::improve::improved_description;
use crate::resumes::repo::ResumeRepository;
use crate::resumes::repo_types::{NewResume, Resume, ResumeChanges};
use crate::users::repo::{UserRepository, EMAIL_TAKEN, USER_OWNS_RESUMES};
use crate::users::repo_types::{NewUser, User, UserChanges};

pub const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../tests/fixtures/jwt-private-key.pem");
pub const PUBLIC_KEY_PEM: &[u8] = include_bytes!("../tests/fixtures/jwt-public-key.pem");

/// Pool on `DATABASE_URL` with the schema in place, or `None` when the
/// variable is unset.
pub async fn pg_pool() -> Option<sqlx::PgPool> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");
    crate::db::ensure_schema(&pool).await.expect("ensure schema");
    Some(pool)
}

/// Email that no other test run has used.
pub fn unique_email(tag: &str) -> String {
    format!("{tag}-{:08x}@pg.test", rand::random::<u32>())
}

pub fn test_keys() -> JwtKeys {
    JwtKeys::from_pem("RS256", PRIVATE_KEY_PEM, PUBLIC_KEY_PEM, 60).expect("fixture keys load")
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    resumes: BTreeMap<i64, Resume>,
    next_user_id: i64,
    next_resume_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_user(&self, id: i64, email: &str) {
        let mut t = self.tables.lock().unwrap();
        t.users.insert(
            id,
            User {
                id,
                name: "seed".into(),
                email: email.into(),
                password_hash: String::new(),
            },
        );
        t.next_user_id = t.next_user_id.max(id);
    }

    pub fn seed_resume(&self, owner_id: i64, title: &str, description: Option<&str>) -> Resume {
        let mut t = self.tables.lock().unwrap();
        t.next_resume_id += 1;
        let resume = Resume {
            id: t.next_resume_id,
            title: title.into(),
            description: description.map(str::to_string),
            owner_id,
        };
        t.resumes.insert(resume.id, resume.clone());
        resume
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.lock().unwrap().users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.email_taken(&user.email, None) {
            return Err(AppError::Conflict(EMAIL_TAKEN.into()));
        }
        t.next_user_id += 1;
        let created = User {
            id: t.next_user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        };
        t.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<Option<User>, AppError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(email) = &changes.email {
            if t.email_taken(email, Some(id)) {
                return Err(AppError::Conflict(EMAIL_TAKEN.into()));
            }
        }
        let Some(user) = t.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.resumes.values().any(|r| r.owner_id == id) {
            return Err(AppError::Conflict(USER_OWNS_RESUMES.into()));
        }
        Ok(t.users.remove(&id).is_some())
    }
}

#[async_trait]
impl ResumeRepository for MemoryStore {
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Resume>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.resumes
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_owned(&self, owner_id: i64, id: i64) -> Result<Option<Resume>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.resumes.get(&id).filter(|r| r.owner_id == owner_id).cloned())
    }

    async fn insert(&self, resume: &NewResume) -> Result<Resume, AppError> {
        let mut t = self.tables.lock().unwrap();
        if !t.users.contains_key(&resume.owner_id) {
            return Err(AppError::Conflict("Resume owner does not exist".into()));
        }
        t.next_resume_id += 1;
        let created = Resume {
            id: t.next_resume_id,
            title: resume.title.clone(),
            description: resume.description.clone(),
            owner_id: resume.owner_id,
        };
        t.resumes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_owned(
        &self,
        owner_id: i64,
        id: i64,
        changes: &ResumeChanges,
    ) -> Result<Option<Resume>, AppError> {
        let mut t = self.tables.lock().unwrap();
        let Some(resume) = t.resumes.get_mut(&id).filter(|r| r.owner_id == owner_id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            resume.title = title.clone();
        }
        if let Some(description) = &changes.description {
            resume.description = description.clone();
        }
        Ok(Some(resume.clone()))
    }

    async fn delete_owned(&self, owner_id: i64, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let owned = t.resumes.get(&id).is_some_and(|r| r.owner_id == owner_id);
        if owned {
            t.resumes.remove(&id);
        }
        Ok(owned)
    }

    async fn improve_owned(&self, owner_id: i64, id: i64) -> Result<Option<Resume>, AppError> {
        let mut t = self.tables.lock().unwrap();
        let Some(resume) = t.resumes.get_mut(&id).filter(|r| r.owner_id == owner_id) else {
            return Ok(None);
        };
        if let Some(description) = improved_description(resume.description.as_deref()) {
            resume.description = Some(description);
        }
        Ok(Some(resume.clone()))
    }
}

/// Every call fails the way an unreachable database does.
pub struct FailingStore;

fn unavailable() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserRepository for FailingStore {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<User>, AppError> {
        Err(unavailable())
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AppError> {
        Err(unavailable())
    }

    async fn insert(&self, _user: &NewUser) -> Result<User, AppError> {
        Err(unavailable())
    }

    async fn update(&self, _id: i64, _changes: &UserChanges) -> Result<Option<User>, AppError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: i64) -> Result<bool, AppError> {
        Err(unavailable())
    }
}

#[async_trait]
impl ResumeRepository for FailingStore {
    async fn list_by_owner(&self, _owner_id: i64) -> Result<Vec<Resume>, AppError> {
        Err(unavailable())
    }

    async fn find_owned(&self, _owner_id: i64, _id: i64) -> Result<Option<Resume>, AppError> {
        Err(unavailable())
    }

    async fn insert(&self, _resume: &NewResume) -> Result<Resume, AppError> {
        Err(unavailable())
    }

    async fn update_owned(
        &self,
        _owner_id: i64,
        _id: i64,
        _changes: &ResumeChanges,
    ) -> Result<Option<Resume>, AppError> {
        Err(unavailable())
    }

    async fn delete_owned(&self, _owner_id: i64, _id: i64) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn improve_owned(&self, _owner_id: i64, _id: i64) -> Result<Option<Resume>, AppError> {
        Err(unavailable())
    }
}
