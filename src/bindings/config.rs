//! # Binding Configuration Schema
//!
//! YAML file wiring trigger events to invoker configurations.
//!
//! - **Version**: 1.1.1
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.1: Stop rejecting an empty `command_name`; it resolves to nothing at fire time
//! - 1.1.0: Add `command_ref` for commands from the host's command library
//! - 1.0.0: Initial release

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::converters::ConverterRegistry;

/// Root configuration containing all bindings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BindingConfig {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

impl BindingConfig {
    /// Load binding configuration from a YAML file
    pub fn load(path: &str, converters: &ConverterRegistry) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bindings from {path}"))?;
        let config = Self::from_yaml(&contents)?;
        config.validate(converters)?;
        Ok(config)
    }

    /// Parse without validating
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: BindingConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Create an empty configuration
    pub fn empty() -> Self {
        Self { bindings: vec![] }
    }

    /// Validate all bindings in the configuration
    ///
    /// A binding with both `command_ref` and `command_name` is accepted; the
    /// name is then never used.
    pub fn validate(&self, converters: &ConverterRegistry) -> Result<()> {
        for (index, binding) in self.bindings.iter().enumerate() {
            if binding.event.is_empty() {
                return Err(anyhow::anyhow!("Binding #{index} has no event name"));
            }

            // Event names: lowercase, digits, underscores, dots
            if !binding
                .event
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.')
            {
                return Err(anyhow::anyhow!(
                    "Event name must be lowercase: {}",
                    binding.event
                ));
            }

            if let Some(ref converter) = binding.converter {
                if !converters.contains(converter) {
                    return Err(anyhow::anyhow!(
                        "Unknown converter '{}' in binding for event '{}'. Known: {:?}",
                        converter,
                        binding.event,
                        converters.names()
                    ));
                }
            }
        }
        Ok(())
    }

    /// Distinct event names, in first-seen order
    pub fn events(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.bindings
            .iter()
            .map(|b| b.event.as_str())
            .filter(|e| seen.insert(*e))
            .collect()
    }
}

/// A single event-to-command binding
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Binding {
    /// Trigger event name
    pub event: String,

    /// Command taken from the host's command library; wins over `command_name`
    #[serde(default)]
    pub command_ref: Option<String>,

    /// Command member looked up on the bound target
    #[serde(default)]
    pub command_name: Option<String>,

    /// Static parameter; when set the payload is ignored
    #[serde(default)]
    pub parameter: Option<serde_json::Value>,

    /// Hand the event payload to the command
    #[serde(default)]
    pub pass_payload: bool,

    /// Registered converter applied to the payload
    #[serde(default)]
    pub converter: Option<String>,

    /// Auxiliary value handed to the converter
    #[serde(default)]
    pub converter_parameter: Option<serde_json::Value>,
}
