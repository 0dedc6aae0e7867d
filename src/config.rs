use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("failed to parse {name}: '{value}'")]
    InvalidVar { name: &'static str, value: String },

    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database_dsn: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

const fn default_pool_size() -> usize {
    16
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Config {
    pub fn from_yaml(contents: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Builds a config from `PG_DSN`, `LISTEN_ADDR`, `PG_POOL_SIZE` and
    /// `CORS_ALLOWED_ORIGINS` as returned by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_dsn = lookup("PG_DSN").ok_or(ConfigError::MissingVar("PG_DSN"))?;

        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(default_listen_addr);

        let pool_size = match lookup("PG_POOL_SIZE") {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidVar {
                    name: "PG_POOL_SIZE",
                    value,
                })?,
            None => default_pool_size(),
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").map_or_else(
            default_cors_allowed_origins,
            |origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(ToString::to_string)
                    .collect()
            },
        );

        Ok(Self {
            database_dsn,
            listen_addr,
            pool_size,
            cors_allowed_origins,
        })
    }

    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.cors_allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
            })
            .collect()
    }
}

fn load_from_file(path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;

    Config::from_yaml(&contents, path)
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Retrieve env variable
    let config_path = env::var("NOTES_API_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    // Fallback to config.yaml
    if config_path != "config.yaml" && Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file("config.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    let config = Config::from_lookup(|name| env::var(name).ok())?;
    tracing::info!("Successfully loaded configuration from environment variables");

    Ok(config)
}
