use std::env;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://bookverse.db?mode=rwc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be true or false, got '{value}'")]
    InvalidBool { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    /// Exit non-zero when seeding leaves the store without roles.
    pub seed_fail_fast: bool,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let run_migrations = parse_bool("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), true)?;
        let seed_fail_fast = parse_bool("SEED_FAIL_FAST", lookup("SEED_FAIL_FAST"), false)?;

        Ok(Config {
            database_url,
            run_migrations,
            seed_fail_fast,
        })
    }
}

fn parse_bool(
    name: &'static str,
    value: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(ConfigError::InvalidBool {
            name,
            value: v.to_string(),
        }),
    }
}
