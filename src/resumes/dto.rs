use serde::{Deserialize, Deserializer};

/// Request body for `POST /resumes`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for `PUT` and `PATCH /resumes/{id}`.
///
/// `description` tells an absent key (`None`) from an explicit `null`
/// (`Some(None)`). `PUT` needs both keys; `PATCH` applies only the keys present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResumeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

/// Runs only when the key is in the body, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
