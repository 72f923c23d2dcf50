use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main configuration structure loaded from seo_audit.toml and environment variables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub fetch: FetchConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Outbound fetch behavior for the audited page
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Browser-like user agent sent with every page fetch
    pub user_agent: String,
    pub timeout_ms: u64,
    /// Upper bound on the fetched response body; larger bodies are rejected
    pub max_body_bytes: usize,
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub http_bind: SocketAddr,
    pub log_level: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            timeout_ms: 10_000,
            max_body_bytes: 2_097_152,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            http_bind: "127.0.0.1:8080"
                .parse()
                .expect("default bind address should parse"),
            log_level: "seo_audit=info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut runtime = Self::default();

        if let Ok(bind) = std::env::var("SEOA_HTTP_BIND") {
            match bind.parse() {
                Ok(addr) => runtime.http_bind = addr,
                Err(_) => tracing::warn!(
                    "SEOA_HTTP_BIND '{}' is not a valid socket address, using default",
                    bind
                ),
            }
        }

        if let Ok(level) = std::env::var("SEOA_LOG").or_else(|_| std::env::var("RUST_LOG")) {
            runtime.log_level = level;
        }

        runtime
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses SEO_AUDIT_CONFIG environment variable or defaults to "seo_audit.toml"
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("SEO_AUDIT_CONFIG").unwrap_or_else(|_| "seo_audit.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            // Fall back to defaults if file doesn't exist
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        // Apply env overrides for fetch configuration (env-first)
        if let Ok(ua) = std::env::var("SEOA_USER_AGENT") {
            config.fetch.user_agent = ua;
        }
        if let Some(timeout) = std::env::var("SEOA_FETCH_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.fetch.timeout_ms = timeout;
        }
        if let Some(cap) = std::env::var("SEOA_MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            config.fetch.max_body_bytes = cap;
        }

        // Load runtime configuration from environment variables
        config.runtime = RuntimeConfig::load_from_env();

        // Validate configuration
        if config.fetch.user_agent.trim().is_empty() {
            anyhow::bail!("fetch.user_agent must not be empty");
        }
        if config.fetch.timeout_ms == 0 {
            config.fetch.timeout_ms = FetchConfig::default().timeout_ms;
        } else if config.fetch.timeout_ms > 120_000 {
            tracing::warn!(
                "fetch.timeout_ms {} exceeds max 120000, clamping to 120000",
                config.fetch.timeout_ms
            );
            config.fetch.timeout_ms = 120_000;
        }
        if config.fetch.max_body_bytes == 0 {
            config.fetch.max_body_bytes = FetchConfig::default().max_body_bytes;
        } else if config.fetch.max_body_bytes > 16_777_216 {
            tracing::warn!(
                "fetch.max_body_bytes {} exceeds max 16777216, clamping to 16777216",
                config.fetch.max_body_bytes
            );
            config.fetch.max_body_bytes = 16_777_216;
        }

        Ok(config)
    }
}
