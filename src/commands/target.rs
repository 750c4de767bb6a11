//! Bound targets and their declared members
//!
//! A bound target is the object name-based command lookup runs against. Since
//! members cannot be discovered at runtime, a target declares its public
//! members in order through [`BoundTarget::members`].
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add `CommandTable` for hosts that register commands explicitly
//! - 1.0.0: Initial implementation

use std::sync::Arc;

use super::command::Command;
use super::payload::Payload;

/// What a declared member holds
#[derive(Clone)]
pub enum MemberKind {
    /// A command-like value, eligible for name-based resolution
    Command(Arc<dyn Command>),
    /// Any other value; never resolved as a command
    Value(Option<Payload>),
}

/// A named public member of a bound target
#[derive(Clone)]
pub struct Member {
    name: String,
    kind: MemberKind,
}

impl Member {
    pub fn command(name: impl Into<String>, command: Arc<dyn Command>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Command(command),
        }
    }

    pub fn value(name: impl Into<String>, value: Option<Payload>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Value(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    /// The member's command, if it is command-like
    pub fn as_command(&self) -> Option<&Arc<dyn Command>> {
        match &self.kind {
            MemberKind::Command(command) => Some(command),
            MemberKind::Value(_) => None,
        }
    }
}

/// Trait for objects an invoker can be attached to
///
/// # Example
///
/// ```ignore
/// struct Editor {
///     save: Arc<dyn Command>,
///     title: String,
/// }
///
/// impl BoundTarget for Editor {
///     fn members(&self) -> Vec<Member> {
///         vec![
///             Member::command("Save", Arc::clone(&self.save)),
///             Member::value("Title", Some(Payload::new(self.title.clone()))),
///         ]
///     }
/// }
/// ```
pub trait BoundTarget: Send + Sync {
    /// Runtime type name used in diagnostics
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Public members in declaration order
    ///
    /// Called on every invocation; nothing is cached between calls.
    fn members(&self) -> Vec<Member>;
}

/// Explicit name-to-command table usable as a bound target
///
/// Members keep registration order. Registering a name twice keeps both
/// entries; name-based resolution then picks the later one.
///
/// # Example
///
/// ```ignore
/// let mut table = CommandTable::new("Editor");
/// table.register("Save", Arc::new(SaveCommand));
/// table.register("Close", Arc::new(CloseCommand));
///
/// if let Some(command) = table.get("Save") {
///     command.execute(None)?;
/// }
/// ```
#[derive(Clone)]
pub struct CommandTable {
    type_name: String,
    members: Vec<Member>,
}

impl CommandTable {
    /// Create an empty table reporting `type_name` in diagnostics
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            members: Vec::new(),
        }
    }

    /// Register a command under a name
    pub fn register(&mut self, name: impl Into<String>, command: Arc<dyn Command>) {
        self.members.push(Member::command(name, command));
    }

    /// Builder form of [`CommandTable::register`]
    pub fn with_command(mut self, name: impl Into<String>, command: Arc<dyn Command>) -> Self {
        self.register(name, command);
        self
    }

    /// Declare a non-command member
    pub fn with_value(mut self, name: impl Into<String>, value: Option<Payload>) -> Self {
        self.members.push(Member::value(name, value));
        self
    }

    /// Last command registered under exactly this name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.members
            .iter()
            .filter(|m| m.name == name)
            .filter_map(Member::as_command)
            .last()
            .cloned()
    }

    /// Check if a command is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of declared members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Names of command members, in registration order
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|m| m.as_command().is_some())
            .map(Member::name)
    }
}

impl BoundTarget for CommandTable {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn members(&self) -> Vec<Member> {
        self.members.clone()
    }
}
