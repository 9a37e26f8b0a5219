use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8787/api/generate";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    /// Sent as `model` in each request; the proxy picks its own default when unset.
    #[serde(default)]
    pub default_model: Option<String>,

    #[serde(default)]
    pub reliability: ReliabilityConfig,

    #[serde(default)]
    pub usage: UsageConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_proxy_url() -> String {
    DEFAULT_PROXY_URL.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            config_path: PathBuf::new(),
            proxy_url: default_proxy_url(),
            default_model: None,
            reliability: ReliabilityConfig::default(),
            usage: UsageConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl Config {
    pub fn templates_path(&self) -> PathBuf {
        self.data_dir.join("templates.json")
    }

    pub fn usage_path(&self) -> PathBuf {
        self.data_dir.join("usage.json")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    /// Requests per call before giving up (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before retry `i` is `base_backoff_ms * 2^i` (default: 1000)
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_backoff_ms() -> u64 {
    1000
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageConfig {
    /// Shared counter URL; site-wide counts are skipped when unset
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    /// Shown next to the count, never enforced
    #[serde(default = "default_monthly_quota")]
    pub monthly_quota: u64,
    /// How long one-shot commands wait for the site-wide sync before exiting
    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,
}

fn default_monthly_quota() -> u64 {
    1500
}

fn default_flush_timeout_ms() -> u64 {
    3000
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            secret: None,
            monthly_quota: default_monthly_quota(),
            flush_timeout_ms: default_flush_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_host")]
    pub host: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,
    #[serde(default = "default_gateway_model")]
    pub default_model: String,
    /// Upstream key; usually supplied through `GEMINI_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    8787
}

fn default_upstream_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_gateway_model() -> String {
    "gemini-2.5-flash".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            upstream_base_url: default_upstream_base_url(),
            default_model: default_gateway_model(),
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reliability.max_attempts, 5);
        assert_eq!(config.gateway.port, 8787);
        assert_eq!(config.usage.monthly_quota, 1500);
        assert_eq!(config.usage.flush_timeout_ms, 3000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
proxy_url = "https://reports.example/api/generate"

[reliability]
base_backoff_ms = 250

[gateway]
port = 9000
"#,
        )
        .unwrap();
        assert_eq!(config.proxy_url, "https://reports.example/api/generate");
        assert_eq!(config.reliability.max_attempts, 5);
        assert_eq!(config.reliability.base_backoff_ms, 250);
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.default_model, "gemini-2.5-flash");
    }
}
