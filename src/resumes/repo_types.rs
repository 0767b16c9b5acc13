use serde::Serialize;
use sqlx::FromRow;

/// Resume record in the database.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Resume {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

/// Column changes for an update.
///
/// `description: Some(None)` clears the column, `None` leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct ResumeChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}
