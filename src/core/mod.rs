//! # Core Module
//!
//! Runtime configuration shared by the library and the `invoke` binary.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

pub mod config;

pub use config::Config;
