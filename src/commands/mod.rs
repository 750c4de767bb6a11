//! # Command System
//!
//! Resolve-then-invoke dispatch of command-like handlers for triggered events.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Configuration observers on `CommandInvoker`
//! - 1.1.0: Add `CommandTable` and `RelayCommand`
//! - 1.0.0: Initial release with `CommandInvoker`, `BoundTarget` and payload converters

pub mod command;
pub mod converter;
pub mod invoker;
pub mod payload;
pub mod target;

pub use command::{Command, RelayCommand};
pub use converter::{ConversionContext, Culture, PayloadConverter, TargetType};
pub use invoker::{CommandInvoker, ConfigField, ConfigObserver, InvokerSettings, Outcome};
pub use payload::Payload;
pub use target::{BoundTarget, CommandTable, Member, MemberKind};
