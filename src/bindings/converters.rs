//! Named payload converters
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.2.0: `double` reports integer overflow as an error; `Default` is an empty registry
//! - 1.1.0: Add `field` converter for picking a value out of an object payload
//! - 1.0.0: Initial release with `double` and `stringify`

use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::commands::{ConversionContext, Payload, PayloadConverter};

/// Registry mapping converter names to converters
///
/// # Example
///
/// ```ignore
/// let mut registry = ConverterRegistry::with_builtins();
/// registry.register("negate", Arc::new(NegateConverter));
///
/// let double = registry.get("double").expect("builtin");
/// ```
#[derive(Clone)]
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn PayloadConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Registry preloaded with `double`, `stringify` and `field`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("double", Arc::new(double));
        registry.register("stringify", Arc::new(stringify));
        registry.register("field", Arc::new(field));
        registry
    }

    /// Register a converter, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, converter: Arc<dyn PayloadConverter>) {
        self.converters.insert(name.into(), converter);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PayloadConverter>> {
        self.converters.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Multiply a numeric payload by two
///
/// Accepts JSON numbers as well as raw `i64` / `f64` payloads. Integers that
/// would overflow `i64` are an error.
fn double(payload: Option<&Payload>, _ctx: &ConversionContext) -> Result<Option<Payload>> {
    let payload = payload.ok_or_else(|| anyhow!("double: payload is null"))?;

    if let Some(n) = payload.downcast_ref::<i64>() {
        return Ok(Some(Payload::new(double_i64(*n)?)));
    }
    if let Some(n) = payload.downcast_ref::<f64>() {
        return Ok(Some(Payload::new(n * 2.0)));
    }

    match payload.downcast_ref::<Value>() {
        Some(Value::Number(n)) => {
            let doubled = match n.as_i64() {
                Some(i) => Value::from(double_i64(i)?),
                // u64 above i64::MAX
                None => n
                    .as_f64()
                    .map(|f| Value::from(f * 2.0))
                    .ok_or_else(|| anyhow!("double: {n} is out of range"))?,
            };
            Ok(Some(Payload::new(doubled)))
        }
        _ => bail!("double: expected a number, got {}", payload.type_name()),
    }
}

fn double_i64(n: i64) -> Result<i64> {
    n.checked_mul(2)
        .ok_or_else(|| anyhow!("double: {n} overflows"))
}

/// Render a JSON payload as a JSON string value
fn stringify(payload: Option<&Payload>, _ctx: &ConversionContext) -> Result<Option<Payload>> {
    let Some(payload) = payload else {
        return Ok(None);
    };

    let text = match payload.downcast_ref::<Value>() {
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
        None => match payload.downcast_ref::<String>() {
            Some(s) => s.clone(),
            None => bail!("stringify: unsupported payload {}", payload.type_name()),
        },
    };
    Ok(Some(Payload::new(Value::String(text))))
}

/// Pick the field named by the converter parameter out of an object payload
fn field(payload: Option<&Payload>, ctx: &ConversionContext) -> Result<Option<Payload>> {
    let name = ctx
        .parameter
        .as_ref()
        .and_then(|p| p.downcast_ref::<Value>())
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("field: converter_parameter must name a field"))?;

    let value = payload
        .and_then(|p| p.downcast_ref::<Value>())
        .and_then(|v| v.get(name))
        .cloned();

    Ok(value.map(Payload::new))
}
