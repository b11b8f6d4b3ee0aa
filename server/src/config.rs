//! Process configuration, read once from the environment at startup.

use std::env;

use axum::http::HeaderValue;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::summarize::{DEFAULT_API_URL, DEFAULT_MODEL};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("SUPABASE_KEY is required when SUPABASE_URL is set")]
    MissingStoreKey,

    #[error("CORS_ORIGINS contains an invalid origin: {0:?}")]
    InvalidOrigin(String),
}

/// Hosted PostgREST credentials.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    /// `None` selects the in-process store.
    pub store: Option<StoreConfig>,
    pub generation: GenerationConfig,
    pub webhook_url: Option<String>,
    /// Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let store = match (get("SUPABASE_URL"), get("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(StoreConfig { url, key }),
            (Some(_), None) => return Err(ConfigError::MissingStoreKey),
            (None, _) => None,
        };

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        if let Some(bad) = cors_origins.iter().find(|o| o.parse::<HeaderValue>().is_err()) {
            return Err(ConfigError::InvalidOrigin(bad.clone()));
        }

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port,
            store,
            generation: GenerationConfig {
                api_key: get("GOOGLE_API_KEY"),
                api_url: get("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            },
            webhook_url: get("SLACK_WEBHOOK_URL"),
            cors_origins,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        if self.cors_origins.is_empty() {
            return layer.allow_origin(Any);
        }
        let origins = self
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<HeaderValue>>();
        layer.allow_origin(AllowOrigin::list(origins))
    }

    /// Log the effective configuration without secrets.
    pub fn log(&self) {
        info!("configuration:");
        info!("   Listen: {}", self.addr());
        match &self.store {
            Some(store) => info!("   Store: {}", store.url),
            None => warn!("   Store: in-memory (SUPABASE_URL not set, data is lost on exit)"),
        }
        if self.generation.api_key.is_some() {
            info!("   Generation: {} via {}", self.generation.model, self.generation.api_url);
        } else {
            warn!("   Generation: not configured (GOOGLE_API_KEY not set)");
        }
        if self.webhook_url.is_some() {
            info!("   Webhook: configured");
        } else {
            warn!("   Webhook: not configured (SLACK_WEBHOOK_URL not set)");
        }
        if self.cors_origins.is_empty() {
            info!("   CORS origins: any");
        } else {
            info!("   CORS origins: {:?}", self.cors_origins);
        }
    }
}
