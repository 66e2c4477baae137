//! Configuration loading and layering.
//!
//! Resolution order, lowest to highest precedence: built-in defaults,
//! the TOML configuration file, environment variables. The result is a
//! fixed struct; nothing re-reads the environment after startup.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Configuration file path used when no `--config` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "voteboard.toml";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolve the full configuration.
///
/// An explicitly requested file must exist; the default path is one
/// optional layer. Environment variables override file values.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(p) => load_file(p)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                load_file(default)?
            } else {
                AppConfig::default()
            }
        }
    };

    apply_env(&mut config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and parse one TOML configuration file.
pub fn load_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_toml(&content)
}

fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Overlay environment variables onto a parsed configuration.
///
/// `var` abstracts the environment so tests can inject values without
/// mutating process state. The hostname override is enabled only by the
/// literal string `true`; any other SHOWHOST value disables it.
pub fn apply_env(config: &mut AppConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("VOTE1VALUE") {
        config.vote.button1 = v;
    }
    if let Some(v) = var("VOTE2VALUE") {
        config.vote.button2 = v;
    }
    if let Some(v) = var("TITLE") {
        config.vote.title = v;
    }
    if let Some(v) = var("SHOWHOST") {
        config.vote.show_host = v == "true";
    }
    if let Some(v) = var("REDIS") {
        config.store.host = v;
    }
    if let Some(v) = var("REDIS_PWD") {
        config.store.password = Some(v);
    }
    if let Some(v) = var("METRICS_ADDR") {
        config.telemetry.metrics_address = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = parse_toml(
            r#"
            [vote]
            button1 = "Tea"
            button2 = "Coffee"

            [store]
            host = "file-host"
            "#,
        )
        .unwrap();

        apply_env(
            &mut config,
            env(&[("VOTE1VALUE", "Cats"), ("REDIS", "env-host")]),
        );

        assert_eq!(config.vote.button1, "Cats");
        assert_eq!(config.vote.button2, "Coffee");
        assert_eq!(config.store.host, "env-host");
    }

    #[test]
    fn showhost_requires_the_literal_true() {
        for (value, expected) in [("true", true), ("True", false), ("1", false), ("", false)] {
            let mut config = AppConfig::default();
            apply_env(&mut config, env(&[("SHOWHOST", value)]));
            assert_eq!(config.vote.show_host, expected, "SHOWHOST={:?}", value);
        }
    }

    #[test]
    fn absent_env_keeps_defaults() {
        let mut config = AppConfig::default();
        apply_env(&mut config, env(&[]));
        assert_eq!(config.vote.button1, "Cats");
        assert_eq!(config.store.password, None);
    }

    #[test]
    fn password_env_sets_some_even_when_empty() {
        let mut config = AppConfig::default();
        apply_env(&mut config, env(&[("REDIS_PWD", "")]));
        assert_eq!(config.store.password.as_deref(), Some(""));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_toml("vote = not valid").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }
}
