use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::lookup::{DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};

/// Application-level constants
pub const APP_NAME: &str = "Sehatna";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default listen address for the HTTP API.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default completion request timeout (seconds).
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;

/// Upper bound on extra completion calls after a failed one.
pub const MAX_COMPLETION_RETRIES: usize = 5;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "sehatna=info,sehatna_lib=info,tower_http=warn"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which completion backend serves drug lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionProvider {
    Gemini,
    Ollama,
}

impl CompletionProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            CompletionProvider::Gemini => DEFAULT_GEMINI_MODEL,
            CompletionProvider::Ollama => DEFAULT_OLLAMA_MODEL,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            CompletionProvider::Gemini => DEFAULT_GEMINI_URL,
            CompletionProvider::Ollama => DEFAULT_OLLAMA_URL,
        }
    }
}

impl std::str::FromStr for CompletionProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(CompletionProvider::Gemini),
            "ollama" => Ok(CompletionProvider::Ollama),
            other => Err(format!("expected gemini or ollama, got {other:?}")),
        }
    }
}

/// Settings for the completion client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    pub provider: CompletionProvider,
    /// Credential for the hosted provider. Never logged.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Extra attempts after a fetch failure. 0 means one call per query.
    pub max_retries: usize,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub completion: CompletionConfig,
    /// Remote marketplace collaborator. Local fixtures when unset.
    pub market_base_url: Option<String>,
    /// Fixture directory overriding the embedded catalog.
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr: SocketAddr = parse_var("SEHATNA_ADDR", get("SEHATNA_ADDR"), DEFAULT_ADDR.parse().ok())?;

        let provider = match get("SEHATNA_PROVIDER") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "SEHATNA_PROVIDER",
                value: raw,
                reason,
            })?,
            None => CompletionProvider::Gemini,
        };

        let completion = CompletionConfig {
            provider,
            api_key: get("API_KEY"),
            model: get("SEHATNA_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            base_url: get("SEHATNA_COMPLETION_URL")
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            timeout_secs: parse_var(
                "SEHATNA_COMPLETION_TIMEOUT_SECS",
                get("SEHATNA_COMPLETION_TIMEOUT_SECS"),
                Some(DEFAULT_COMPLETION_TIMEOUT_SECS),
            )?,
            max_retries: parse_var(
                "SEHATNA_COMPLETION_RETRIES",
                get("SEHATNA_COMPLETION_RETRIES"),
                Some(0),
            )?,
        };

        if completion.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SEHATNA_COMPLETION_TIMEOUT_SECS",
                value: "0".into(),
                reason: "timeout must be at least one second".into(),
            });
        }

        if completion.max_retries > MAX_COMPLETION_RETRIES {
            return Err(ConfigError::Invalid {
                var: "SEHATNA_COMPLETION_RETRIES",
                value: completion.max_retries.to_string(),
                reason: format!("at most {MAX_COMPLETION_RETRIES} retries allowed"),
            });
        }

        Ok(Self {
            bind_addr,
            completion,
            market_base_url: get("SEHATNA_MARKET_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            data_dir: get("SEHATNA_DATA_DIR").map(PathBuf::from),
        })
    }
}

fn parse_var<T>(var: &'static str, raw: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
        None => default.ok_or_else(|| ConfigError::Invalid {
            var,
            value: String::new(),
            reason: "no default available".into(),
        }),
    }
}
