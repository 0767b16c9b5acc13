use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub algorithm: String,
    pub ttl_minutes: i64,
}

/// Which presentation the process serves besides the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    /// JSON API plus the cookie-based HTML pages; `/` redirects to `/login`.
    Html,
    /// JSON API only; `/` answers with a greeting.
    Api,
}

impl std::str::FromStr for AppMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(AppMode::Html),
            "api" => Ok(AppMode::Api),
            other => anyhow::bail!("unknown APP_MODE {other:?} (expected \"html\" or \"api\")"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub api_prefix: String,
    pub mode: AppMode,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt = JwtConfig {
            private_key_path: std::env::var("JWT_PRIVATE_KEY_PATH")
                .unwrap_or_else(|_| "certs/jwt-private-key.pem".into())
                .into(),
            public_key_path: std::env::var("JWT_PUBLIC_KEY_PATH")
                .unwrap_or_else(|_| "certs/jwt-public-key.pem".into())
                .into(),
            algorithm: std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "RS256".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let api_prefix =
            normalize_prefix(&std::env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".into()));
        let mode = match std::env::var("APP_MODE") {
            Ok(v) => v.parse()?,
            Err(_) => AppMode::Html,
        };
        Ok(Self {
            database_url,
            db_max_connections,
            jwt,
            api_prefix,
            mode,
        })
    }
}

/// Turns `api/v1/`, `/api/v1` and `/api/v1/` into `/api/v1`; `""` and `/` become `""`.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("/api/v1"), "/api/v1");
        assert_eq!(normalize_prefix("api/v1/"), "/api/v1");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("  "), "");
    }

    #[test]
    fn app_mode_parses_case_insensitively() {
        assert_eq!("HTML".parse::<AppMode>().unwrap(), AppMode::Html);
        assert_eq!(" api ".parse::<AppMode>().unwrap(), AppMode::Api);
        assert!("desktop".parse::<AppMode>().is_err());
    }
}
