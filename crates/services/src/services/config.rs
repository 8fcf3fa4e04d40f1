//! Server configuration, read from the environment once at startup.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8722;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// When unset the server runs in demo mode on an in-memory database
    /// seeded with fixture data.
    pub database_url: Option<String>,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "comptoir-dev-secret".to_string());
        Self {
            host,
            port,
            database_url,
            jwt_secret,
        }
    }

    pub fn demo_mode(&self) -> bool {
        self.database_url.is_none()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            jwt_secret: "comptoir-dev-secret".to_string(),
        }
    }
}
