//! Server configuration from environment variables.
//!
//! # Responsibility
//! - Read `NOTEPAD_*` variables (optionally from a `.env` file).
//! - Validate values before any socket or database is opened.
//!
//! # Invariants
//! - Unset variables fall back to the documented defaults.
//! - Set but invalid variables are errors, never silently defaulted.

use crate::hosting::Hosting;
use axum::http::HeaderValue;
use notepad_core::{default_log_level, normalize_level, LogTarget};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DB_PATH: &str = "./notes.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid {
        variable: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(variable: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            variable,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid {
                variable,
                value,
                reason,
            } => write!(f, "invalid {variable}=`{value}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Cross-origin policy for the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub hosting: Hosting,
    pub allowed_origins: AllowedOrigins,
    pub log_level: String,
    pub log_target: LogTarget,
}

impl ServerConfig {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = read("NOTEPAD_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host
            .parse()
            .map_err(|err| ConfigError::invalid("NOTEPAD_HOST", &host, format!("{err}")))?;

        let port = match read("NOTEPAD_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|err| ConfigError::invalid("NOTEPAD_PORT", &raw, format!("{err}")))?,
            None => DEFAULT_PORT,
        };

        let db_path = PathBuf::from(
            read("NOTEPAD_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
        );

        let hosting = match read("NOTEPAD_HOSTING") {
            Some(raw) => raw
                .parse::<Hosting>()
                .map_err(|reason| ConfigError::invalid("NOTEPAD_HOSTING", &raw, reason))?,
            None => Hosting::Shared,
        };

        let allowed_origins = match read("NOTEPAD_ALLOWED_ORIGINS") {
            Some(raw) => parse_allowed_origins(&raw)?,
            None => AllowedOrigins::Any,
        };

        let log_level = match read("NOTEPAD_LOG_LEVEL") {
            Some(raw) => normalize_level(&raw)
                .map_err(|reason| ConfigError::invalid("NOTEPAD_LOG_LEVEL", &raw, reason))?
                .to_string(),
            None => default_log_level().to_string(),
        };
        let log_dir = read("NOTEPAD_LOG_DIR");
        let log_target = LogTarget::from_dir(log_dir.as_deref()).map_err(|reason| {
            ConfigError::invalid("NOTEPAD_LOG_DIR", log_dir.as_deref().unwrap_or(""), reason)
        })?;

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            db_path,
            hosting,
            allowed_origins,
            log_level,
            log_target,
        })
    }
}

/// Parses a comma-separated origin list; a `*` entry means any origin.
fn parse_allowed_origins(raw: &str) -> Result<AllowedOrigins, ConfigError> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if entries.is_empty() {
        return Err(ConfigError::invalid(
            "NOTEPAD_ALLOWED_ORIGINS",
            raw,
            "expected `*` or at least one origin",
        ));
    }
    if entries.contains(&"*") {
        return Ok(AllowedOrigins::Any);
    }

    let mut origins = Vec::with_capacity(entries.len());
    for origin in entries {
        let value = origin.parse::<HeaderValue>().map_err(|err| {
            ConfigError::invalid("NOTEPAD_ALLOWED_ORIGINS", origin, format!("{err}"))
        })?;
        origins.push(value);
    }
    Ok(AllowedOrigins::List(origins))
}
