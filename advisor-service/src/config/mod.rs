use secrecy::{ExposeSecret, Secret};
use service_core::config::{self as core_config, get_env, get_env_parsed, get_optional_env};
use service_core::error::AppError;
use std::time::Duration;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
    pub store: StoreConfig,
    pub limits: LimitsConfig,
    pub observability: ObservabilityConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Absent key is allowed; the service starts and reports itself unconfigured.
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    pub model: String,
}

impl OpenAiConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supabase" => Ok(StoreBackend::Supabase),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: String,
    pub key: Secret<String>,
}

/// Admission limits per external dependency plus the whole-request deadline.
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub provider_max_in_flight: usize,
    pub provider_timeout: Duration,
    pub store_max_in_flight: usize,
    pub store_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            provider_max_in_flight: 8,
            provider_timeout: Duration::from_secs(60),
            store_max_in_flight: 32,
            store_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(90),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl AdvisorConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = core_config::is_prod();
        let defaults = LimitsConfig::default();

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("supabase"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        // The in-memory backend needs no credentials.
        let (store_url, store_key) = match backend {
            StoreBackend::Supabase => (
                get_env("SUPABASE_URL", None, is_prod)?,
                get_env("SUPABASE_KEY", None, is_prod)?,
            ),
            StoreBackend::Memory => (String::new(), String::new()),
        };

        Ok(AdvisorConfig {
            common: common_config,
            openai: OpenAiConfig {
                api_key: get_optional_env("OPENAI_API_KEY").map(Secret::new),
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL), false)?,
                model: get_env("OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), false)?,
            },
            store: StoreConfig {
                backend,
                url: store_url,
                key: Secret::new(store_key),
            },
            limits: LimitsConfig {
                provider_max_in_flight: get_env_parsed(
                    "PROVIDER_MAX_IN_FLIGHT",
                    defaults.provider_max_in_flight,
                )?
                .max(1),
                provider_timeout: Duration::from_secs(get_env_parsed(
                    "PROVIDER_TIMEOUT_SECS",
                    defaults.provider_timeout.as_secs(),
                )?),
                store_max_in_flight: get_env_parsed(
                    "STORE_MAX_IN_FLIGHT",
                    defaults.store_max_in_flight,
                )?
                .max(1),
                store_timeout: Duration::from_secs(get_env_parsed(
                    "STORE_TIMEOUT_SECS",
                    defaults.store_timeout.as_secs(),
                )?),
                request_timeout: Duration::from_secs(get_env_parsed(
                    "REQUEST_TIMEOUT_SECS",
                    defaults.request_timeout.as_secs(),
                )?),
            },
            observability: ObservabilityConfig {
                service_name: "advisor-service".to_string(),
                log_level: get_env("LOG_LEVEL", Some("info"), false)?,
                otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some(DEFAULT_CORS_ORIGIN),
                    false,
                )?),
            },
        })
    }

    /// Configuration for tests and local runs: in-memory store, no provider key.
    pub fn local() -> Self {
        AdvisorConfig {
            common: core_config::Config::default(),
            openai: OpenAiConfig {
                api_key: None,
                base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
                model: DEFAULT_OPENAI_MODEL.to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                url: String::new(),
                key: Secret::new(String::new()),
            },
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig {
                service_name: "advisor-service".to_string(),
                log_level: "info".to_string(),
                otlp_endpoint: None,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            },
        }
    }

    pub fn with_openai_key(mut self, key: impl Into<String>) -> Self {
        self.openai.api_key = Some(Secret::new(key.into()));
        self
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
