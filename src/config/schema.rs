//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML file.
//! Every field has a default so a partial or absent file still resolves.

use serde::{Deserialize, Serialize};

/// Root configuration for the voting service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Vote board settings (button labels, title, host display).
    pub vote: VoteConfig,

    /// Counter store endpoint.
    pub store: StoreConfig,

    /// Telemetry settings.
    pub telemetry: TelemetryConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the vote endpoint (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Vote board configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VoteConfig {
    /// Label of the first vote button; doubles as its counter key.
    pub button1: String,

    /// Label of the second vote button; doubles as its counter key.
    pub button2: String,

    /// Page title shown above the buttons.
    pub title: String,

    /// Replace the title with the machine's hostname.
    pub show_host: bool,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            button1: "Cats".to_string(),
            button2: "Dogs".to_string(),
            title: "Vote Board".to_string(),
            show_host: false,
        }
    }
}

/// Counter store endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store host, without scheme or port.
    pub host: String,

    /// Store port.
    pub port: u16,

    /// Optional password; `None` means unauthenticated.
    pub password: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Enable the ops endpoint (metrics and health probes).
    pub metrics_enabled: bool,

    /// Ops endpoint bind address.
    pub metrics_address: String,

    /// Interval for refreshing runtime metrics, in seconds.
    pub runtime_interval_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
            runtime_interval_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_runnable() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.vote.button1, "Cats");
        assert_eq!(config.vote.button2, "Dogs");
        assert!(!config.vote.show_host);
        assert_eq!(config.store.port, 6379);
        assert!(config.telemetry.metrics_enabled);
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [vote]
            title = "Office Snacks"
            "#,
        )
        .unwrap();
        assert_eq!(config.vote.title, "Office Snacks");
        assert_eq!(config.vote.button1, "Cats");
        assert_eq!(config.store.host, "127.0.0.1");
    }
}
