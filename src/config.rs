use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Environment override tracking
// ---------------------------------------------------------------------------

/// Tracks which configuration settings are overridden by environment
/// variables, so the startup report can show where each effective value came
/// from.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    overrides: HashMap<String, String>,
}

impl EnvOverrides {
    /// Check whether a setting key (e.g. "server.host") is overridden by an env var.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.overrides.contains_key(key)
    }

    /// Get the env var name that overrides the given setting key.
    pub fn env_var_for(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).map(String::as_str)
    }

    /// Get all overrides as a map of setting key -> env var name.
    pub fn all(&self) -> &HashMap<String, String> {
        &self.overrides
    }

    fn record(&mut self, key: &str, env_var: &str) {
        self.overrides.insert(key.to_string(), env_var.to_string());
    }
}

// ---------------------------------------------------------------------------
// Provider kind
// ---------------------------------------------------------------------------

/// Which outbound provider contract the service is deployed against.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// The AI gateway's single-shot `{prompt, model, maxTokens}` contract.
    #[default]
    Gateway,
    /// An OpenAI-compatible chat-completions API.
    Openai,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gateway => write!(f, "gateway"),
            Self::Openai => write!(f, "openai"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gateway" => Ok(Self::Gateway),
            "openai" | "open_ai" => Ok(Self::Openai),
            _ => Err(format!("Unknown provider kind: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Main configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Env var overrides are not serialized to TOML.
    #[serde(skip)]
    pub env_overrides: EnvOverrides,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    /// Base URL, or a full URL already naming the generation endpoint.
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// Bearer token. There is deliberately no built-in fallback: an empty
    /// key after all override chains is a startup error.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Total provider attempts per generation, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            url: default_gateway_url(),
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "127.0.0.1".to_string()
}
const fn default_port() -> u16 {
    8080
}
fn default_gateway_url() -> String {
    "https://aigateway.avalern.com".to_string()
}
fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
const fn default_max_tokens() -> u32 {
    2000
}
const fn default_temperature() -> f64 {
    0.7
}
const fn default_max_retries() -> u32 {
    3
}
fn default_log_level() -> String {
    "info".to_string()
}

// ---------------------------------------------------------------------------
// Config loading and env overrides
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a TOML file, then apply environment variable
    /// overrides. Any setting prefixed with `PAGESMITH_` takes precedence over
    /// the file value and is tracked in `env_overrides`; a handful of legacy
    /// variable names are honored at lower precedence.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Save the current (file-level) configuration to a TOML file.
    /// This serializes the config without env overrides applied.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The effective API key, or a startup error when no source configured
    /// one. Missing credentials must fail loudly here, never fall back to a
    /// baked-in key.
    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        let key = self.gateway.api_key.trim();
        if key.is_empty() {
            anyhow::bail!("Gateway API key is not configured");
        }
        Ok(key)
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Chained settings (URL, API key, model) are applied lowest-precedence
    /// first, so when several variables are set the crate-native
    /// `PAGESMITH_*` name wins, then the legacy names, then the file value.
    fn apply_env_overrides(&mut self) {
        let mut ov = EnvOverrides::default();

        // -- Helpers (macros for concise per-field overrides) --

        macro_rules! env_str {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    $field = val;
                    ov.record($key, $env);
                }
            };
        }
        macro_rules! env_bool {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    $field = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
                    ov.record($key, $env);
                }
            };
        }
        macro_rules! env_parse {
            ($key:expr, $env:expr, $field:expr) => {
                if let Ok(val) = std::env::var($env) {
                    if let Ok(parsed) = val.parse() {
                        $field = parsed;
                        ov.record($key, $env);
                    }
                }
            };
        }

        // -- Server --
        env_str!("server.host", "PAGESMITH_SERVER_HOST", self.server.host);
        env_parse!("server.port", "PAGESMITH_SERVER_PORT", self.server.port);
        if let Ok(val) = std::env::var("PAGESMITH_SERVER_CORS_ORIGINS") {
            self.server.cors_origins = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            ov.record("server.cors_origins", "PAGESMITH_SERVER_CORS_ORIGINS");
        }

        // -- Gateway --
        // Kind first; the key chain below depends on the effective kind.
        if let Ok(val) = std::env::var("PAGESMITH_GATEWAY_KIND") {
            if let Ok(kind) = val.parse() {
                self.gateway.kind = kind;
                ov.record("gateway.kind", "PAGESMITH_GATEWAY_KIND");
            }
        }

        env_str!("gateway.url", "API_GATEWAY_URL", self.gateway.url);
        env_str!("gateway.url", "AI_GATEWAY_URL", self.gateway.url);
        env_str!("gateway.url", "PAGESMITH_GATEWAY_URL", self.gateway.url);

        match self.gateway.kind {
            ProviderKind::Gateway => {
                env_str!("gateway.api_key", "API_GATEWAY_KEY", self.gateway.api_key);
                env_str!("gateway.api_key", "AI_GATEWAY_API_KEY", self.gateway.api_key);
            }
            ProviderKind::Openai => {
                env_str!("gateway.api_key", "OPENAI_API_KEY", self.gateway.api_key);
            }
        }
        env_str!(
            "gateway.api_key",
            "PAGESMITH_GATEWAY_API_KEY",
            self.gateway.api_key
        );

        env_str!("gateway.model", "OPENAI_MODEL", self.gateway.model);
        env_str!("gateway.model", "PAGESMITH_GATEWAY_MODEL", self.gateway.model);

        env_parse!(
            "gateway.max_tokens",
            "PAGESMITH_GATEWAY_MAX_TOKENS",
            self.gateway.max_tokens
        );
        env_parse!(
            "gateway.temperature",
            "PAGESMITH_GATEWAY_TEMPERATURE",
            self.gateway.temperature
        );
        env_parse!(
            "gateway.max_retries",
            "PAGESMITH_GATEWAY_MAX_RETRIES",
            self.gateway.max_retries
        );

        // -- Logging --
        env_str!("logging.level", "PAGESMITH_LOG_LEVEL", self.logging.level);
        env_bool!("logging.json", "PAGESMITH_LOG_JSON", self.logging.json);

        self.env_overrides = ov;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            logging: LoggingConfig::default(),
            env_overrides: EnvOverrides::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
