//! Semantic configuration checks.
//!
//! Serde handles syntax; this module rejects configurations that parse
//! but cannot run. All failures are collected so the operator sees every
//! problem at once instead of fixing them one restart at a time.

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A button label is empty or whitespace.
    EmptyButtonLabel(&'static str),
    /// Both buttons carry the same label, so they would share a counter.
    DuplicateButtonLabels(String),
    /// A button label equals the reset action and could never be voted for.
    ReservedButtonLabel(String),
    /// A bind address does not parse as `host:port`.
    InvalidBindAddress {
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyButtonLabel(field) => {
                write!(f, "vote.{} must not be empty", field)
            }
            ValidationError::DuplicateButtonLabels(label) => {
                write!(f, "vote buttons must have distinct labels (both are {:?})", label)
            }
            ValidationError::ReservedButtonLabel(label) => {
                write!(f, "button label {:?} collides with the reset action", label)
            }
            ValidationError::InvalidBindAddress { field, value } => {
                write!(f, "{} is not a valid socket address: {:?}", field, value)
            }
        }
    }
}

/// Check an already-parsed configuration for semantic problems.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let button1 = config.vote.button1.trim();
    let button2 = config.vote.button2.trim();

    if button1.is_empty() {
        errors.push(ValidationError::EmptyButtonLabel("button1"));
    }
    if button2.is_empty() {
        errors.push(ValidationError::EmptyButtonLabel("button2"));
    }
    if !button1.is_empty() && button1 == button2 {
        errors.push(ValidationError::DuplicateButtonLabels(button1.to_string()));
    }
    for label in [button1, button2] {
        if label == "reset" {
            errors.push(ValidationError::ReservedButtonLabel(label.to_string()));
        }
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.telemetry.metrics_enabled
        && config.telemetry.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidBindAddress {
            field: "telemetry.metrics_address",
            value: config.telemetry.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
