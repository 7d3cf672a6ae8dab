//! Runtime settings read from the environment (`.env` is loaded by the binary).

use crate::error::ConfigError;
use std::collections::HashMap;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Schema holding the `simple_object` table.
    pub schema: String,
    pub cache_enabled: bool,
    pub metrics_enabled: bool,
    /// Create ten sample entities at startup.
    pub seed_samples: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            schema: DEFAULT_SCHEMA.into(),
            cache_enabled: true,
            metrics_enabled: true,
            seed_samples: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build from an explicit variable map. Unset or empty values take defaults.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "DATABASE_MAX_CONNECTIONS",
                    value: v.to_string(),
                })?,
            None => defaults.max_connections,
        };

        let schema = match get("SIMPLE_SCHEMA") {
            Some(v) if is_identifier(v) => v.to_string(),
            Some(v) => {
                return Err(ConfigError::InvalidIdentifier {
                    key: "SIMPLE_SCHEMA",
                    value: v.to_string(),
                })
            }
            None => defaults.schema,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").map(str::to_string).unwrap_or(defaults.bind_addr),
            database_url: get("DATABASE_URL").map(str::to_string),
            max_connections,
            schema,
            cache_enabled: parse_flag("SIMPLE_CACHE_ENABLED", get("SIMPLE_CACHE_ENABLED"), defaults.cache_enabled)?,
            metrics_enabled: parse_flag(
                "SIMPLE_METRICS_ENABLED",
                get("SIMPLE_METRICS_ENABLED"),
                defaults.metrics_enabled,
            )?,
            seed_samples: parse_flag("SIMPLE_SEED_SAMPLES", get("SIMPLE_SEED_SAMPLES"), defaults.seed_samples)?,
        })
    }
}

fn parse_flag(key: &'static str, value: Option<&str>, default: bool) -> Result<bool, ConfigError> {
    let Some(v) = value else {
        return Ok(default);
    };
    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: v.to_string(),
        }),
    }
}

/// Plain unquoted PostgreSQL identifier: letter or underscore, then alphanumerics/underscores.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
