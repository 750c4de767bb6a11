//! Command trait and closure-backed implementation
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add `RelayCommand::with_can_execute` guard
//! - 1.0.0: Initial implementation

use anyhow::Result;

use super::payload::Payload;

/// Trait for command-like values
///
/// A command exposes an executability predicate and an execute operation.
/// Both receive the same parameter computed by the invoker. Errors are
/// returned to whoever triggered the invocation unchanged.
///
/// # Example
///
/// ```ignore
/// struct SaveCommand;
///
/// impl Command for SaveCommand {
///     fn can_execute(&self, _parameter: Option<&Payload>) -> Result<bool> {
///         Ok(true)
///     }
///
///     fn execute(&self, _parameter: Option<&Payload>) -> Result<()> {
///         // Save the document
///         Ok(())
///     }
/// }
/// ```
pub trait Command: Send + Sync {
    /// Whether the command may run with this parameter
    fn can_execute(&self, parameter: Option<&Payload>) -> Result<bool>;

    /// Run the command
    fn execute(&self, parameter: Option<&Payload>) -> Result<()>;
}

type ExecuteFn = dyn Fn(Option<&Payload>) -> Result<()> + Send + Sync;
type CanExecuteFn = dyn Fn(Option<&Payload>) -> Result<bool> + Send + Sync;

/// Command built from closures
///
/// Without a predicate the command is always executable.
pub struct RelayCommand {
    execute: Box<ExecuteFn>,
    can_execute: Option<Box<CanExecuteFn>>,
}

impl RelayCommand {
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn(Option<&Payload>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            execute: Box::new(execute),
            can_execute: None,
        }
    }

    /// Add an executability predicate
    pub fn with_can_execute<F>(mut self, can_execute: F) -> Self
    where
        F: Fn(Option<&Payload>) -> Result<bool> + Send + Sync + 'static,
    {
        self.can_execute = Some(Box::new(can_execute));
        self
    }
}

impl Command for RelayCommand {
    fn can_execute(&self, parameter: Option<&Payload>) -> Result<bool> {
        match &self.can_execute {
            Some(predicate) => predicate(parameter),
            None => Ok(true),
        }
    }

    fn execute(&self, parameter: Option<&Payload>) -> Result<()> {
        (self.execute)(parameter)
    }
}
