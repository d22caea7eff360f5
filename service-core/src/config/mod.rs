use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Settings every service shares, read from `configuration.*` and `APP__*`.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// True when `ENVIRONMENT=prod`.
pub fn is_prod() -> bool {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod"
}

/// Read an environment variable.
///
/// Defaults only apply outside production; in production every key read
/// through here must be set explicitly.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Read an optional environment variable; empty values count as unset.
pub fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse a numeric (or otherwise `FromStr`) setting with a default.
pub fn get_env_parsed<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: {}", key, e))
        }),
        None => Ok(default),
    }
}
