use std::path::PathBuf;

/// Error raised when an environment variable is present but unparseable.
#[derive(Debug, thiserror::Error)]
#[error("{var} must be a valid {expected}, got '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite://hive.db`).
    pub database_url: String,
    /// Directory under which `uploads/posts/` is created (default: `.`).
    pub upload_root: PathBuf,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Minimum accepted password length at registration (default: `6`).
    pub min_password_length: usize,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `DATABASE_URL`         | `sqlite://hive.db`      |
    /// | `UPLOAD_ROOT`          | `.`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `MIN_PASSWORD_LENGTH`  | `6`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse("PORT", "u16", var("PORT", "3000"))?;
        let database_url = var("DATABASE_URL", "sqlite://hive.db");
        let upload_root = PathBuf::from(var("UPLOAD_ROOT", "."));

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse(
            "REQUEST_TIMEOUT_SECS",
            "u64",
            var("REQUEST_TIMEOUT_SECS", "30"),
        )?;
        let min_password_length = parse(
            "MIN_PASSWORD_LENGTH",
            "usize",
            var("MIN_PASSWORD_LENGTH", "6"),
        )?;

        Ok(Self {
            host,
            port,
            database_url,
            upload_root,
            cors_origins,
            request_timeout_secs,
            min_password_length,
        })
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    expected: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        var,
        expected,
        value,
    })
}
