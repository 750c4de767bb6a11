//! Payload converters
//!
//! Optional transform applied to an event payload before it becomes the
//! command parameter.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use std::env;
use std::fmt;

use super::payload::Payload;

/// Type hint handed to a converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TargetType {
    /// Any value; the converter decides what to produce
    Object,
}

/// Locale a conversion runs under
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Culture {
    name: String,
}

impl Culture {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Culture-neutral locale (empty name)
    pub fn invariant() -> Self {
        Self::default()
    }

    /// Culture of the current process, from the POSIX locale variables
    pub fn current() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.is_empty())
            .map(|value| Self::from_locale(&value))
            .unwrap_or_default()
    }

    /// Parse a POSIX locale string such as `de_DE.UTF-8@euro`
    pub fn from_locale(locale: &str) -> Self {
        let base = locale
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();

        match base {
            "" | "C" | "POSIX" => Self::invariant(),
            _ => Self::new(base.replace('_', "-")),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_invariant(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invariant() {
            write!(f, "invariant")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Everything a converter receives besides the payload itself
#[derive(Debug, Clone)]
pub struct ConversionContext {
    pub target_type: TargetType,
    /// Auxiliary value configured alongside the converter
    pub parameter: Option<Payload>,
    pub culture: Culture,
}

/// Trait for payload converters
///
/// Any closure of the shape `Fn(Option<&Payload>, &ConversionContext) -> Result<Option<Payload>>`
/// is a converter.
///
/// # Example
///
/// ```ignore
/// let double = |payload: Option<&Payload>, _ctx: &ConversionContext| {
///     let n = payload.and_then(|p| p.downcast_ref::<i64>()).copied().unwrap_or(0);
///     Ok(Some(Payload::new(n * 2)))
/// };
/// invoker.set_payload_converter(Some(Arc::new(double)));
/// ```
pub trait PayloadConverter: Send + Sync {
    fn convert(&self, payload: Option<&Payload>, ctx: &ConversionContext)
        -> Result<Option<Payload>>;
}

impl<F> PayloadConverter for F
where
    F: Fn(Option<&Payload>, &ConversionContext) -> Result<Option<Payload>> + Send + Sync,
{
    fn convert(
        &self,
        payload: Option<&Payload>,
        ctx: &ConversionContext,
    ) -> Result<Option<Payload>> {
        self(payload, ctx)
    }
}
