//! # Feature: Event Bindings
//!
//! YAML-configured bindings from trigger events to command invokers, with a
//! registry of named payload converters and a host that delivers events.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: `command_ref` bindings backed by a command library
//! - 1.0.0: Initial release

pub mod config;
pub mod converters;
pub mod host;

pub use config::{Binding, BindingConfig};
pub use converters::ConverterRegistry;
pub use host::BindingHost;
