use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::Validate;

use crate::actors::llm::{LaunchSettings, LlmSettings};
use crate::error::AppError;
use crate::ocr::DEFAULT_MATHPIX_ENDPOINT;

/// Log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable `fmt` output
    Pretty,
    /// Bunyan-style JSON lines
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" | "bunyan" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Tutor server runtime configuration.
#[derive(Debug, Clone, Validate)]
pub struct Config {
    /// HTTP server bind address
    #[validate(length(min = 1))]
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Base URL of the llama.cpp-compatible completion server
    #[validate(url)]
    pub model_server_url: String,
    /// Bearer token for the completion server
    pub model_auth_token: Option<String>,
    /// GGUF model to launch `llama-server` with; unset when the server runs externally
    pub model_path: Option<PathBuf>,
    pub llama_server_bin: String,
    #[validate(range(min = 1, max = 600))]
    pub startup_retries: u32,
    #[validate(range(min = 1, max = 3600))]
    pub completion_timeout_secs: u64,
    /// Upper bound applied to a chat request's `max_tokens`
    #[validate(range(min = 1, max = 8192))]
    pub max_tokens_ceiling: u32,
    /// Lower bound applied to a chat request's `temperature`
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature_floor: f32,
    /// Chat requests per client per minute
    #[validate(range(min = 1))]
    pub chat_rate_limit: usize,
    /// OCR requests per client per minute
    #[validate(range(min = 1))]
    pub ocr_rate_limit: usize,
    /// Allowed CORS origins; `["*"]` means any
    pub cors_origins: Vec<String>,
    pub mathpix_app_id: Option<String>,
    pub mathpix_app_key: Option<String>,
    #[validate(url)]
    pub mathpix_endpoint: String,
    pub log_format: LogFormat,
    /// Default filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            model_server_url: "http://127.0.0.1:8080".to_string(),
            model_auth_token: None,
            model_path: None,
            llama_server_bin: "llama-server".to_string(),
            startup_retries: 30,
            completion_timeout_secs: 120,
            max_tokens_ceiling: 100,
            temperature_floor: 0.1,
            chat_rate_limit: 10,
            ocr_rate_limit: 5,
            cors_origins: vec!["*".to_string()],
            mathpix_app_id: None,
            mathpix_app_key: None,
            mathpix_endpoint: DEFAULT_MATHPIX_ENDPOINT.to_string(),
            log_format: LogFormat::Pretty,
            log_level: "info".to_string(),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from `.env` and environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, AppError> {
        // A missing .env file is fine
        let _ = dotenv::dotenv();
        Self::from_process_env()
    }

    /// Load configuration from the process environment only.
    pub fn from_process_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let config = Self {
            bind_address: var("TUTOR_BIND").unwrap_or(defaults.bind_address),
            port: parsed("TUTOR_PORT", defaults.port)?,
            model_server_url: var("TUTOR_MODEL_SERVER_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.model_server_url),
            model_auth_token: var("LLAMA_AUTH_TOKEN"),
            model_path: var("TUTOR_MODEL_PATH").map(PathBuf::from),
            llama_server_bin: var("TUTOR_LLAMA_SERVER_BIN").unwrap_or(defaults.llama_server_bin),
            startup_retries: parsed("TUTOR_STARTUP_RETRIES", defaults.startup_retries)?,
            completion_timeout_secs: parsed(
                "TUTOR_COMPLETION_TIMEOUT_SECS",
                defaults.completion_timeout_secs,
            )?,
            max_tokens_ceiling: parsed("TUTOR_MAX_TOKENS_CEILING", defaults.max_tokens_ceiling)?,
            temperature_floor: parsed("TUTOR_TEMPERATURE_FLOOR", defaults.temperature_floor)?,
            chat_rate_limit: parsed("TUTOR_CHAT_RATE_LIMIT", defaults.chat_rate_limit)?,
            ocr_rate_limit: parsed("TUTOR_OCR_RATE_LIMIT", defaults.ocr_rate_limit)?,
            cors_origins: var("TUTOR_CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            mathpix_app_id: var("MATHPIX_APP_ID"),
            mathpix_app_key: var("MATHPIX_APP_KEY"),
            mathpix_endpoint: var("MATHPIX_ENDPOINT").unwrap_or(defaults.mathpix_endpoint),
            log_format: var("LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.log_format),
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
        };

        config
            .validate()
            .map_err(|e| AppError::Config(format!("Invalid configuration: {}", e)))?;
        Ok(config)
    }

    /// Socket address string the HTTP server binds to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Settings for the model service actor.
    ///
    /// When a model path is configured, `llama-server` is launched on the host and
    /// port taken from `model_server_url`.
    pub fn llm_settings(&self) -> Result<LlmSettings, AppError> {
        let launch = match &self.model_path {
            Some(model_path) => {
                let url = Url::parse(&self.model_server_url)?;
                let host = url
                    .host_str()
                    .ok_or_else(|| AppError::Config("model server URL has no host".to_string()))?
                    .to_string();
                let port = url
                    .port_or_known_default()
                    .ok_or_else(|| AppError::Config("model server URL has no port".to_string()))?;
                Some(LaunchSettings {
                    binary: self.llama_server_bin.clone(),
                    model_path: model_path.clone(),
                    host,
                    port,
                })
            }
            None => None,
        };

        Ok(LlmSettings {
            server_url: self.model_server_url.clone(),
            auth_token: self.model_auth_token.clone(),
            launch,
            startup_retries: self.startup_retries,
            retry_interval: Duration::from_secs(1),
            completion_timeout: Duration::from_secs(self.completion_timeout_secs),
        })
    }

    /// True when any origin may call the API
    pub fn cors_allows_any(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}
