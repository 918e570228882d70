// Centralized configuration management for PhishGuard Backend
// Load ALL env vars ONCE at startup

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::services::analysis::BatchConfig;
use crate::services::classifier::{ClassifierConfig, ForestParams};
use crate::services::site_probe::{ProbeConfig, MAX_REDIRECT_HOPS};

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "phishguard_backend_core=debug,tower_http=info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub environment: Environment,
    pub rust_log: String,
    pub cors_allowed_origins: Vec<String>,

    // Grouped settings
    pub model: ModelSettings,
    pub probe: ProbeSettings,
    pub batch: BatchSettings,
}

/// Classifier artifacts and bootstrap training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model_dir: PathBuf,
    pub forest_trees: usize,
    pub forest_max_depth: usize,
    pub forest_min_samples_split: usize,
    pub forest_min_samples_leaf: usize,
    pub training_seed: u64,
}

/// Outbound TLS and redirect probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSettings {
    pub enabled: bool,
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub tls_port: u16,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    pub enabled: bool,
    pub max_size: usize,
    pub concurrency: usize,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

fn get_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or_default<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError> {
    let raw = get_or_default(key, default);
    raw.trim().parse().map_err(|_| {
        ConfigError::InvalidValue(
            key.to_string(),
            format!("{:?} is not a valid {}", raw, std::any::type_name::<T>()),
        )
    })
}

fn parse_bool_or_default(key: &str, default: &str) -> bool {
    get_or_default(key, default).to_lowercase() == "true"
}

fn positive(key: &str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

fn at_most(key: &str, value: usize, max: usize) -> Result<usize, ConfigError> {
    if value > max {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be at most {}", max),
        ));
    }
    Ok(value)
}

/// `host:port` with a numeric port
fn check_bind_address(bind_address: &str) -> Result<(), ConfigError> {
    match bind_address.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(()),
        _ => Err(ConfigError::InvalidValue(
            "BIND_ADDRESS".to_string(),
            format!("{} has no valid port", bind_address),
        )),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:8000");
        check_bind_address(&bind_address)?;

        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));

        let cors_allowed_origins = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let model = ModelSettings {
            model_dir: PathBuf::from(get_or_default("MODEL_DIR", "ml_model")),
            forest_trees: positive("FOREST_TREES", parse_or_default("FOREST_TREES", "100")?)?,
            forest_max_depth: positive(
                "FOREST_MAX_DEPTH",
                parse_or_default("FOREST_MAX_DEPTH", "15")?,
            )?,
            forest_min_samples_split: parse_or_default("FOREST_MIN_SAMPLES_SPLIT", "5")?,
            forest_min_samples_leaf: parse_or_default("FOREST_MIN_SAMPLES_LEAF", "2")?,
            training_seed: parse_or_default("TRAINING_SEED", "42")?,
        };

        let probe = ProbeSettings {
            enabled: parse_bool_or_default("NETWORK_PROBES_ENABLED", "true"),
            timeout_secs: parse_or_default("PROBE_TIMEOUT_SECS", "5")?,
            max_redirects: at_most(
                "MAX_REDIRECTS",
                parse_or_default("MAX_REDIRECTS", "5")?,
                MAX_REDIRECT_HOPS,
            )?,
            tls_port: parse_or_default("TLS_PORT", "443")?,
            user_agent: get_or_default("PROBE_USER_AGENT", "PhishGuard-Analyzer/1.0"),
        };
        if probe.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "PROBE_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let batch = BatchSettings {
            enabled: parse_bool_or_default("ENABLE_BATCH_ANALYSIS", "true"),
            max_size: positive("MAX_BATCH_SIZE", parse_or_default("MAX_BATCH_SIZE", "100")?)?,
            concurrency: positive(
                "BATCH_CONCURRENCY",
                parse_or_default("BATCH_CONCURRENCY", "8")?,
            )?,
        };

        Ok(AppConfig {
            bind_address,
            environment,
            rust_log: get_or_default("RUST_LOG", DEFAULT_LOG_FILTER),
            cors_allowed_origins,
            model,
            probe,
            batch,
        })
    }

    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            timeout: Duration::from_secs(self.probe.timeout_secs),
            max_redirects: self.probe.max_redirects,
            tls_port: self.probe.tls_port,
            user_agent: self.probe.user_agent.clone(),
        }
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            model_dir: self.model.model_dir.clone(),
            forest: ForestParams {
                n_trees: self.model.forest_trees,
                max_depth: self.model.forest_max_depth,
                min_samples_split: self.model.forest_min_samples_split,
                min_samples_leaf: self.model.forest_min_samples_leaf,
                max_features: None,
                seed: self.model.training_seed,
            },
        }
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            enabled: self.batch.enabled,
            max_size: self.batch.max_size,
            concurrency: self.batch.concurrency,
        }
    }

    /// `*` (or an empty list) allows any origin
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.is_empty() || self.cors_allowed_origins.iter().any(|o| o == "*")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Get the global configuration instance
/// This is the primary way to access configuration throughout the app
pub fn config() -> &'static AppConfig {
    &CONFIG
}
