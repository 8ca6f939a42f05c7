//! Analyzer configuration.
//!
//! Built from defaults, deserialized by a collaborator, or read from the
//! `PWD_AUDIT_*` environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, de};

use crate::error::ConfigError;

pub const ENV_COMMON_PATH: &str = "PWD_AUDIT_COMMON_PATH";
pub const ENV_DICTIONARY_PATH: &str = "PWD_AUDIT_DICTIONARY_PATH";
pub const ENV_CONTEXT_PATH: &str = "PWD_AUDIT_CONTEXT_PATH";
pub const ENV_BREACH_URL: &str = "PWD_AUDIT_BREACH_URL";
pub const ENV_BREACH_TIMEOUT: &str = "PWD_AUDIT_BREACH_TIMEOUT";
pub const ENV_CACHE_DIR: &str = "PWD_AUDIT_CACHE_DIR";
pub const ENV_CACHE_TTL_DAYS: &str = "PWD_AUDIT_CACHE_TTL_DAYS";
pub const ENV_BATCH_CONCURRENCY: &str = "PWD_AUDIT_BATCH_CONCURRENCY";

pub const DEFAULT_BREACH_URL: &str = "https://api.pwnedpasswords.com";
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BreachConfig {
    pub api_url: String,
    #[serde(deserialize_with = "non_zero")]
    pub timeout_secs: u64,
    pub cache_ttl_days: u64,
    /// In-memory cache when unset.
    pub cache_dir: Option<PathBuf>,
    pub user_agent: String,
}

impl Default for BreachConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BREACH_URL.to_string(),
            timeout_secs: 5,
            cache_ttl_days: 30,
            cache_dir: None,
            user_agent: concat!("pwd-audit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl BreachConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_days.saturating_mul(24 * 60 * 60))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub common_passwords_path: Option<PathBuf>,
    pub dictionary_path: Option<PathBuf>,
    pub context_path: Option<PathBuf>,
    pub breach: BreachConfig,
    #[serde(deserialize_with = "non_zero")]
    pub batch_concurrency: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            common_passwords_path: None,
            dictionary_path: None,
            context_path: None,
            breach: BreachConfig::default(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl AnalyzerConfig {
    /// Defaults overridden by any `PWD_AUDIT_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(path) = env_var(ENV_COMMON_PATH) {
            self.common_passwords_path = Some(PathBuf::from(path));
        }
        if let Some(path) = env_var(ENV_DICTIONARY_PATH) {
            self.dictionary_path = Some(PathBuf::from(path));
        }
        if let Some(path) = env_var(ENV_CONTEXT_PATH) {
            self.context_path = Some(PathBuf::from(path));
        }
        if let Some(url) = env_var(ENV_BREACH_URL) {
            self.breach.api_url = url;
        }
        if let Some(timeout) = parse_env::<u64>(ENV_BREACH_TIMEOUT)? {
            if timeout == 0 {
                return Err(invalid(ENV_BREACH_TIMEOUT, "0"));
            }
            self.breach.timeout_secs = timeout;
        }
        if let Some(dir) = env_var(ENV_CACHE_DIR) {
            self.breach.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(days) = parse_env::<u64>(ENV_CACHE_TTL_DAYS)? {
            self.breach.cache_ttl_days = days;
        }
        if let Some(n) = parse_env::<usize>(ENV_BATCH_CONCURRENCY)? {
            if n == 0 {
                return Err(invalid(ENV_BATCH_CONCURRENCY, "0"));
            }
            self.batch_concurrency = n;
        }
        Ok(self)
    }
}

/// Rejects zero, matching the environment overrides.
fn non_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default + PartialEq,
{
    let value = T::deserialize(deserializer)?;
    if value == T::default() {
        return Err(de::Error::custom("must be greater than zero"));
    }
    Ok(value)
}

fn env_var(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env_var(var) {
        Some(raw) => raw.parse().map(Some).map_err(|_| invalid(var, &raw)),
        None => Ok(None),
    }
}

fn invalid(var: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    }
}
