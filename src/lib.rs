// Core layer - runtime configuration
pub mod core;

// Command layer - resolution and invocation
pub mod commands;

// Bindings layer - event wiring driven by YAML
pub mod bindings;

pub use crate::core::Config;

pub use commands::{
    BoundTarget, Command, CommandInvoker, CommandTable, ConversionContext, Culture,
    InvokerSettings, Member, Outcome, Payload, PayloadConverter, RelayCommand,
};

pub use bindings::{Binding, BindingConfig, BindingHost, ConverterRegistry};
