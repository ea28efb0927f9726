// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

/// Used when `JWT_SECRET` is unset. Only fit for local development.
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Catalog file to load instead of the built-in quizzes.
    pub catalog_path: Option<PathBuf>,
    /// Simulated latency of the mock identity provider.
    pub auth_delay: Duration,
    pub allowed_origins: Vec<String>,
    /// How long a completed session's result stays available.
    pub session_retention: Duration,
    /// Unfinished sessions older than this are dropped.
    pub session_max_age: Duration,
    pub max_sessions_per_user: usize,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let catalog_path = env::var("CATALOG_PATH").ok().map(PathBuf::from);

        let auth_delay = env::var("AUTH_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(1000));

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|s| parse_origins(&s))
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        let session_retention = env::var("SESSION_RETENTION_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(600));

        let session_max_age = env::var("SESSION_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(86_400));

        let max_sessions_per_user = env::var("MAX_SESSIONS_PER_USER")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(16);

        Self {
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            catalog_path,
            auth_delay,
            allowed_origins,
            session_retention,
            session_max_age,
            max_sessions_per_user,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" http://a.test , ,http://b.test");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }
}
