// config.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// One year. Longer sessions are rejected at startup.
pub const MAX_SESSION_MAXAGE_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Absolute session lifetime in hours.
    pub session_maxage: i64,
    pub port: u16,
    pub admin_default_password: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup so it can be exercised without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET_KEY").ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;

        let session_maxage = parse_or("SESSION_MAXAGE_HOURS", lookup("SESSION_MAXAGE_HOURS"), 24_i64)?;
        if session_maxage <= 0 || session_maxage > MAX_SESSION_MAXAGE_HOURS {
            return Err(ConfigError::Invalid {
                name: "SESSION_MAXAGE_HOURS",
                value: session_maxage.to_string(),
            });
        }

        let port = parse_or("PORT", lookup("PORT"), 5000_u16)?;

        let admin_default_password = lookup("ADMIN_DEFAULT_PASSWORD")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "admin123".to_string());

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            database_url,
            jwt_secret,
            session_maxage,
            port,
            admin_default_password,
            cors_origins,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
