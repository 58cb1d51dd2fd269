use std::env;

// ============================================================================
// Runtime Configuration
// ============================================================================

/// Environment-derived settings with development defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (`EXPORTS_BIND_ADDR`).
    pub bind_addr: String,
    /// MongoDB connection string (`MONGODB_URI`).
    pub mongodb_uri: String,
    /// Database holding the exports, products and users collections
    /// (`EXPORTS_DB`).
    pub database: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("EXPORTS_BIND_ADDR", "0.0.0.0:8080"),
            mongodb_uri: env_or("MONGODB_URI", "mongodb://127.0.0.1:27017"),
            database: env_or("EXPORTS_DB", "export_service"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
