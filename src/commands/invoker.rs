//! Command invoker
//!
//! Resolves a command for a triggered event and runs it with a derived
//! parameter. An explicitly configured command always wins over name-based
//! lookup on the bound target. "Not attached", "not found" and "not
//! executable" are expected conditions reported through [`Outcome`]; only
//! converter and command failures come back as errors.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Configuration observers
//! - 1.1.0: Return `Outcome` from `invoke` instead of `()`
//! - 1.0.0: Initial implementation with explicit/named resolution and payload conversion

use anyhow::Result;
use log::debug;
use std::fmt;
use std::sync::{Arc, Weak};
use uuid::Uuid;

use super::command::Command;
use super::converter::{ConversionContext, Culture, PayloadConverter, TargetType};
use super::payload::Payload;
use super::target::BoundTarget;

/// Result of a single invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No target attached, or the target has been dropped
    Detached,
    /// Neither the explicit command nor a named member resolved
    CommandNotFound {
        command_name: Option<String>,
        target_type: String,
    },
    /// The command's `can_execute` returned false
    Rejected,
    /// The command ran
    Executed,
}

impl Outcome {
    pub fn executed(&self) -> bool {
        matches!(self, Outcome::Executed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Detached => write!(f, "detached"),
            Outcome::CommandNotFound {
                command_name,
                target_type,
            } => write!(
                f,
                "command '{}' not found on {}",
                command_name.as_deref().unwrap_or_default(),
                target_type
            ),
            Outcome::Rejected => write!(f, "rejected"),
            Outcome::Executed => write!(f, "executed"),
        }
    }
}

/// Configuration value that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Command,
    CommandName,
    CommandParameter,
    PassPayloadToCommand,
    PayloadConverter,
    ConverterParameter,
}

/// Receives a notification whenever an invoker's configuration is set
pub trait ConfigObserver: Send + Sync {
    fn on_config_changed(&self, field: ConfigField);
}

impl<F> ConfigObserver for F
where
    F: Fn(ConfigField) + Send + Sync,
{
    fn on_config_changed(&self, field: ConfigField) {
        self(field)
    }
}

/// Full invoker configuration, applied at once by [`CommandInvoker::configure`]
#[derive(Clone, Default)]
pub struct InvokerSettings {
    pub command: Option<Arc<dyn Command>>,
    pub command_name: Option<String>,
    pub command_parameter: Option<Payload>,
    pub pass_payload_to_command: bool,
    pub payload_converter: Option<Arc<dyn PayloadConverter>>,
    pub converter_parameter: Option<Payload>,
}

impl InvokerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, command: Arc<dyn Command>) -> Self {
        self.command = Some(command);
        self
    }

    pub fn with_command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = Some(name.into());
        self
    }

    pub fn with_command_parameter(mut self, parameter: Payload) -> Self {
        self.command_parameter = Some(parameter);
        self
    }

    pub fn pass_payload(mut self, pass: bool) -> Self {
        self.pass_payload_to_command = pass;
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn PayloadConverter>) -> Self {
        self.payload_converter = Some(converter);
        self
    }

    pub fn with_converter_parameter(mut self, parameter: Payload) -> Self {
        self.converter_parameter = Some(parameter);
        self
    }
}

/// Resolves and runs a command each time its trigger fires
///
/// # Example
///
/// ```ignore
/// let target: Arc<dyn BoundTarget> = Arc::new(
///     CommandTable::new("Editor").with_command("Save", Arc::new(SaveCommand)),
/// );
///
/// let mut invoker = CommandInvoker::new();
/// invoker.configure(InvokerSettings::new().with_command_name("Save"));
/// invoker.attach(&target);
///
/// assert_eq!(invoker.invoke(None)?, Outcome::Executed);
/// ```
#[derive(Default)]
pub struct CommandInvoker {
    command: Option<Arc<dyn Command>>,
    command_name: Option<String>,
    command_parameter: Option<Payload>,
    pass_payload_to_command: bool,
    payload_converter: Option<Arc<dyn PayloadConverter>>,
    converter_parameter: Option<Payload>,
    target: Option<Weak<dyn BoundTarget>>,
    observers: Vec<Arc<dyn ConfigObserver>>,
}

impl CommandInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    ///
    /// Nothing is validated here: a command name configured next to an
    /// explicit command is simply never consulted.
    pub fn configure(&mut self, settings: InvokerSettings) {
        let InvokerSettings {
            command,
            command_name,
            command_parameter,
            pass_payload_to_command,
            payload_converter,
            converter_parameter,
        } = settings;

        self.set_command(command);
        self.set_command_name(command_name);
        self.set_command_parameter(command_parameter);
        self.set_pass_payload_to_command(pass_payload_to_command);
        self.set_payload_converter(payload_converter);
        self.set_converter_parameter(converter_parameter);
    }

    /// Register a configuration observer
    pub fn observe(&mut self, observer: Arc<dyn ConfigObserver>) {
        self.observers.push(observer);
    }

    fn notify(&self, field: ConfigField) {
        for observer in &self.observers {
            observer.on_config_changed(field);
        }
    }

    pub fn set_command(&mut self, command: Option<Arc<dyn Command>>) {
        self.command = command;
        self.notify(ConfigField::Command);
    }

    pub fn set_command_name(&mut self, name: Option<String>) {
        self.command_name = name;
        self.notify(ConfigField::CommandName);
    }

    pub fn set_command_parameter(&mut self, parameter: Option<Payload>) {
        self.command_parameter = parameter;
        self.notify(ConfigField::CommandParameter);
    }

    pub fn set_pass_payload_to_command(&mut self, pass: bool) {
        self.pass_payload_to_command = pass;
        self.notify(ConfigField::PassPayloadToCommand);
    }

    pub fn set_payload_converter(&mut self, converter: Option<Arc<dyn PayloadConverter>>) {
        self.payload_converter = converter;
        self.notify(ConfigField::PayloadConverter);
    }

    pub fn set_converter_parameter(&mut self, parameter: Option<Payload>) {
        self.converter_parameter = parameter;
        self.notify(ConfigField::ConverterParameter);
    }

    pub fn command(&self) -> Option<&Arc<dyn Command>> {
        self.command.as_ref()
    }

    pub fn command_name(&self) -> Option<&str> {
        self.command_name.as_deref()
    }

    pub fn pass_payload_to_command(&self) -> bool {
        self.pass_payload_to_command
    }

    /// Attach to a target without taking ownership of it
    pub fn attach(&mut self, target: &Arc<dyn BoundTarget>) {
        self.target = Some(Arc::downgrade(target));
    }

    pub fn detach(&mut self) {
        self.target = None;
    }

    /// The attached target, if it is still alive
    pub fn target(&self) -> Option<Arc<dyn BoundTarget>> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_attached(&self) -> bool {
        self.target().is_some()
    }

    /// Run the resolve, convert, guard, execute sequence for one trigger
    pub fn invoke(&self, payload: Option<&Payload>) -> Result<Outcome> {
        let Some(target) = self.target() else {
            debug!("Invoke skipped: no target attached");
            return Ok(Outcome::Detached);
        };

        let invocation_id = Uuid::new_v4();

        let Some(command) = self.resolve_on(target.as_ref()) else {
            debug!(
                "[{invocation_id}] Could not find command '{}' on target '{}'",
                self.command_name.as_deref().unwrap_or_default(),
                target.type_name()
            );
            return Ok(Outcome::CommandNotFound {
                command_name: self.command_name.clone(),
                target_type: target.type_name().to_string(),
            });
        };

        let parameter = self.command_parameter(payload)?;

        if !command.can_execute(parameter.as_ref())? {
            debug!("[{invocation_id}] Command cannot execute with {parameter:?}");
            return Ok(Outcome::Rejected);
        }

        command.execute(parameter.as_ref())?;
        debug!("[{invocation_id}] Command executed with {parameter:?}");

        Ok(Outcome::Executed)
    }

    /// Resolve the command the next invocation would run
    ///
    /// The explicit command is returned even when detached; name lookup
    /// needs a live target.
    pub fn resolve_command(&self) -> Option<Arc<dyn Command>> {
        if let Some(command) = &self.command {
            return Some(Arc::clone(command));
        }
        let target = self.target()?;
        self.resolve_on(target.as_ref())
    }

    fn resolve_on(&self, target: &dyn BoundTarget) -> Option<Arc<dyn Command>> {
        if let Some(command) = &self.command {
            return Some(Arc::clone(command));
        }

        let name = self.command_name.as_deref()?;

        // No early return: a later member with the same name replaces an earlier one
        let mut found = None;
        for member in target.members() {
            if let Some(command) = member.as_command() {
                if member.name() == name {
                    found = Some(Arc::clone(command));
                }
            }
        }
        found
    }

    /// Parameter handed to `can_execute` and `execute` for this payload
    pub fn command_parameter(&self, payload: Option<&Payload>) -> Result<Option<Payload>> {
        if let Some(parameter) = &self.command_parameter {
            return Ok(Some(parameter.clone()));
        }

        if !self.pass_payload_to_command {
            return Ok(None);
        }

        match &self.payload_converter {
            None => Ok(payload.cloned()),
            Some(converter) => {
                let ctx = ConversionContext {
                    target_type: TargetType::Object,
                    parameter: self.converter_parameter.clone(),
                    culture: Culture::current(),
                };
                converter.convert(payload, &ctx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::target::{CommandTable, Member};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // Mock command recording every call
    struct CountingCommand {
        executable: bool,
        checks: AtomicUsize,
        executions: AtomicUsize,
        last_parameter: Mutex<Option<Payload>>,
    }

    impl CountingCommand {
        fn new(executable: bool) -> Arc<Self> {
            Arc::new(Self {
                executable,
                checks: AtomicUsize::new(0),
                executions: AtomicUsize::new(0),
                last_parameter: Mutex::new(None),
            })
        }

        fn executions(&self) -> usize {
            self.executions.load(Ordering::SeqCst)
        }

        fn checks(&self) -> usize {
            self.checks.load(Ordering::SeqCst)
        }

        fn last_parameter(&self) -> Option<Payload> {
            self.last_parameter.lock().unwrap().clone()
        }
    }

    impl Command for CountingCommand {
        fn can_execute(&self, _parameter: Option<&Payload>) -> Result<bool> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            Ok(self.executable)
        }

        fn execute(&self, parameter: Option<&Payload>) -> Result<()> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            *self.last_parameter.lock().unwrap() = parameter.cloned();
            Ok(())
        }
    }

    // Target that counts how often its members are enumerated
    struct CountingTarget {
        enumerations: AtomicUsize,
        members: Vec<Member>,
    }

    impl BoundTarget for CountingTarget {
        fn type_name(&self) -> &str {
            "CountingTarget"
        }

        fn members(&self) -> Vec<Member> {
            self.enumerations.fetch_add(1, Ordering::SeqCst);
            self.members.clone()
        }
    }

    fn target_with(commands: &[(&str, Arc<CountingCommand>)]) -> Arc<dyn BoundTarget> {
        let mut table = CommandTable::new("TestTarget");
        for (name, command) in commands {
            table.register(*name, Arc::clone(command) as Arc<dyn Command>);
        }
        Arc::new(table)
    }

    fn doubler() -> Arc<dyn PayloadConverter> {
        Arc::new(
            |payload: Option<&Payload>, _ctx: &ConversionContext| -> Result<Option<Payload>> {
                let n = payload
                    .and_then(|p| p.downcast_ref::<i64>())
                    .copied()
                    .ok_or_else(|| anyhow::anyhow!("expected an integer payload"))?;
                Ok(Some(Payload::new(n * 2)))
            },
        )
    }

    fn int(p: &Option<Payload>) -> Option<i64> {
        p.as_ref().and_then(|p| p.downcast_ref::<i64>()).copied()
    }

    #[test]
    fn test_scenario_named_command_executes() {
        let save = CountingCommand::new(true);
        let target = target_with(&[("Save", Arc::clone(&save))]);

        let mut invoker = CommandInvoker::new();
        invoker.configure(InvokerSettings::new().with_command_name("Save"));
        invoker.attach(&target);

        assert_eq!(invoker.invoke(None).unwrap(), Outcome::Executed);
        assert_eq!(save.executions(), 1);
        assert!(save.last_parameter().is_none());
    }

    #[test]
    fn test_scenario_explicit_command_wins_over_name() {
        let explicit = CountingCommand::new(true);
        let save = CountingCommand::new(true);
        let target = target_with(&[("Save", Arc::clone(&save))]);

        let mut invoker = CommandInvoker::new();
        invoker.configure(
            InvokerSettings::new()
                .with_command(Arc::clone(&explicit) as Arc<dyn Command>)
                .with_command_name("Save"),
        );
        invoker.attach(&target);

        let outcome = invoker.invoke(Some(&Payload::new("click"))).unwrap();
        assert_eq!(outcome, Outcome::Executed);
        assert_eq!(explicit.executions(), 1);
        assert_eq!(save.checks(), 0);
        assert_eq!(save.executions(), 0);
    }

    #[test]
    fn test_scenario_missing_command_reports_diagnostic() {
        let save = CountingCommand::new(true);
        let target = target_with(&[("Save", Arc::clone(&save))]);

        let mut invoker = CommandInvoker::new();
        invoker.set_command_name(Some("Missing".to_string()));
        invoker.attach(&target);

        let outcome = invoker.invoke(None).unwrap();
        assert_eq!(
            outcome,
            Outcome::CommandNotFound {
                command_name: Some("Missing".to_string()),
                target_type: "TestTarget".to_string(),
            }
        );
        assert_eq!(outcome.to_string(), "command 'Missing' not found on TestTarget");
        assert_eq!(save.checks(), 0);
        assert_eq!(save.executions(), 0);
    }

    #[test]
    fn test_scenario_converter_doubles_payload() {
        let command = CountingCommand::new(true);
        let target = target_with(&[("Compute", Arc::clone(&command))]);

        let mut invoker = CommandInvoker::new();
        invoker.configure(
            InvokerSettings::new()
                .with_command_name("Compute")
                .pass_payload(true)
                .with_converter(doubler()),
        );
        invoker.attach(&target);

        invoker.invoke(Some(&Payload::new(21_i64))).unwrap();
        assert_eq!(int(&command.last_parameter()), Some(42));
    }

    #[test]
    fn test_scenario_rejected_command_not_executed() {
        let command = CountingCommand::new(false);
        let target = target_with(&[("Save", Arc::clone(&command))]);

        let mut invoker = CommandInvoker::new();
        invoker.set_command_name(Some("Save".to_string()));
        invoker.attach(&target);

        assert_eq!(invoker.invoke(None).unwrap(), Outcome::Rejected);
        assert_eq!(command.checks(), 1);
        assert_eq!(command.executions(), 0);
    }

    #[test]
    fn test_detached_invoke_is_noop() {
        let command = CountingCommand::new(true);
        let mut invoker = CommandInvoker::new();
        invoker.set_command(Some(Arc::clone(&command) as Arc<dyn Command>));

        assert!(!invoker.is_attached());
        assert_eq!(invoker.invoke(None).unwrap(), Outcome::Detached);
        assert_eq!(command.checks(), 0);
        assert_eq!(command.executions(), 0);
    }

    #[test]
    fn test_detach_stops_invocation() {
        let command = CountingCommand::new(true);
        let target = target_with(&[("Save", Arc::clone(&command))]);

        let mut invoker = CommandInvoker::new();
        invoker.set_command_name(Some("Save".to_string()));
        invoker.attach(&target);
        invoker.invoke(None).unwrap();
        invoker.detach();

        assert_eq!(invoker.invoke(None).unwrap(), Outcome::Detached);
        assert_eq!(command.executions(), 1);
    }

    #[test]
    fn test_dropped_target_acts_detached() {
        let command = CountingCommand::new(true);
        let target = target_with(&[("Save", Arc::clone(&command))]);

        let mut invoker = CommandInvoker::new();
        invoker.set_command_name(Some("Save".to_string()));
        invoker.attach(&target);
        drop(target);

        assert!(!invoker.is_attached());
        assert_eq!(invoker.invoke(None).unwrap(), Outcome::Detached);
        assert_eq!(command.executions(), 0);
    }

    #[test]
    fn test_name_lookup_is_case_sensitive() {
        let upper = CountingCommand::new(true);
        let lower = CountingCommand::new(true);
        let target = target_with(&[
            ("Submit", Arc::clone(&upper)),
            ("submit", Arc::clone(&lower)),
        ]);

        let mut invoker = CommandInvoker::new();
        invoker.set_command_name(Some("Submit".to_string()));
        invoker.attach(&target);
        invoker.invoke(None).unwrap();

        assert_eq!(upper.executions(), 1);
        assert_eq!(lower.executions(), 0);

        invoker.set_command_name(Some("SUBMIT".to_string()));
        assert!(matches!(
            invoker.invoke(None).unwrap(),
            Outcome::CommandNotFound { .. }
        ));
    }

    #[test]
    fn test_last_matching_member_wins() {
        let first = CountingCommand::new(true);
        let second = CountingCommand::new(true);
        let target = target_with(&[
            ("Save", Arc::clone(&first)),
            ("Save", Arc::clone(&second)),
        ]);

        let mut invoker = CommandInvoker::new();
        invoker.set_command_name(Some("Save".to_string()));
        invoker.attach(&target);
        invoker.invoke(None).unwrap();

        assert_eq!(first.executions(), 0);
        assert_eq!(second.executions(), 1);
    }

    #[test]
    fn test_value_member_with_matching_name_is_ignored() {
        let target: Arc<dyn BoundTarget> =
            Arc::new(CommandTable::new("Editor").with_value("Save", Some(Payload::new(1_i32))));

        let mut invoker = CommandInvoker::new();
        invoker.set_command_name(Some("Save".to_string()));
        invoker.attach(&target);

        assert!(invoker.resolve_command().is_none());
        assert!(matches!(
            invoker.invoke(None).unwrap(),
            Outcome::CommandNotFound { .. }
        ));
    }

    #[test]
    fn test_no_command_name_resolves_nothing() {
        let save = CountingCommand::new(true);
        let target = target_with(&[("Save", Arc::clone(&save))]);

        let mut invoker = CommandInvoker::new();
        invoker.attach(&target);

        assert_eq!(
            invoker.invoke(None).unwrap(),
            Outcome::CommandNotFound {
                command_name: None,
                target_type: "TestTarget".to_string(),
            }
        );
        assert_eq!(save.executions(), 0);
    }

    #[test]
    fn test_explicit_command_skips_member_enumeration() {
        let explicit = CountingCommand::new(true);
        let named = CountingCommand::new(true);
        let target = Arc::new(CountingTarget {
            enumerations: AtomicUsize::new(0),
            members: vec![Member::command("Save", Arc::clone(&named) as Arc<dyn Command>)],
        });
        let dyn_target: Arc<dyn BoundTarget> = Arc::clone(&target) as Arc<dyn BoundTarget>;

        let mut invoker = CommandInvoker::new();
        invoker.configure(
            InvokerSettings::new()
                .with_command(Arc::clone(&explicit) as Arc<dyn Command>)
                .with_command_name("Save"),
        );
        invoker.attach(&dyn_target);
        invoker.invoke(None).unwrap();

        assert_eq!(target.enumerations.load(Ordering::SeqCst), 0);
        assert_eq!(explicit.executions(), 1);
        assert_eq!(named.executions(), 0);
    }

    #[test]
    fn test_resolution_recomputed_each_invoke() {
        let target = Arc::new(CountingTarget {
            enumerations: AtomicUsize::new(0),
            members: vec![],
        });
        let dyn_target: Arc<dyn BoundTarget> = Arc::clone(&target) as Arc<dyn BoundTarget>;

        let mut invoker = CommandInvoker::new();
        invoker.set_command_name(Some("Save".to_string()));
        invoker.attach(&dyn_target);
        invoker.invoke(None).unwrap();
        invoker.invoke(None).unwrap();

        assert_eq!(target.enumerations.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_static_parameter_overrides_payload() {
        let command = CountingCommand::new(true);
        let target = target_with(&[("Save", Arc::clone(&command))]);
        let fixed = Payload::new(7_i64);

        let mut invoker = CommandInvoker::new();
        invoker.configure(
            InvokerSettings::new()
                .with_command_name("Save")
                .with_command_parameter(fixed.clone())
                .pass_payload(true)
                .with_converter(doubler()),
        );
        invoker.attach(&target);
        invoker.invoke(Some(&Payload::new(100_i64))).unwrap();

        let last = command.last_parameter().unwrap();
        assert!(Payload::ptr_eq(&last, &fixed));
    }

    #[test]
    fn test_payload_dropped_when_not_passed() {
        let invoker = CommandInvoker::new();
        let parameter = invoker
            .command_parameter(Some(&Payload::new(5_i64)))
            .unwrap();
        assert!(parameter.is_none());
    }

    #[test]
    fn test_converter_ignored_when_payload_not_passed() {
        let mut invoker = CommandInvoker::new();
        invoker.set_payload_converter(Some(doubler()));

        // Converter would fail on a string payload if it were called
        let parameter = invoker
            .command_parameter(Some(&Payload::new("text")))
            .unwrap();
        assert!(parameter.is_none());
    }

    #[test]
    fn test_raw_payload_passed_with_identity() {
        let mut invoker = CommandInvoker::new();
        invoker.set_pass_payload_to_command(true);

        let payload = Payload::new(serde_json::json!({"x": 1}));
        let parameter = invoker.command_parameter(Some(&payload)).unwrap().unwrap();
        assert!(Payload::ptr_eq(&parameter, &payload));

        assert!(invoker.command_parameter(None).unwrap().is_none());
    }

    #[test]
    fn test_converter_receives_parameter_hint_and_culture() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in = Arc::clone(&seen);
        let converter = move |payload: Option<&Payload>,
                              ctx: &ConversionContext|
              -> Result<Option<Payload>> {
            *seen_in.lock().unwrap() = Some((ctx.target_type, ctx.culture.clone()));
            let suffix = ctx
                .parameter
                .as_ref()
                .and_then(|p| p.downcast_ref::<&str>())
                .copied()
                .unwrap_or_default();
            let base = payload
                .and_then(|p| p.downcast_ref::<&str>())
                .copied()
                .unwrap_or_default();
            Ok(Some(Payload::new(format!("{base}{suffix}"))))
        };

        let mut invoker = CommandInvoker::new();
        invoker.configure(
            InvokerSettings::new()
                .pass_payload(true)
                .with_converter(Arc::new(converter))
                .with_converter_parameter(Payload::new("!")),
        );

        let parameter = invoker
            .command_parameter(Some(&Payload::new("hi")))
            .unwrap()
            .unwrap();
        assert_eq!(parameter.downcast_ref::<String>().map(String::as_str), Some("hi!"));
        assert_eq!(
            *seen.lock().unwrap(),
            Some((TargetType::Object, Culture::current()))
        );
    }

    #[test]
    fn test_converter_may_produce_null() {
        let mut invoker = CommandInvoker::new();
        invoker.set_pass_payload_to_command(true);
        invoker.set_payload_converter(Some(Arc::new(
            |_: Option<&Payload>, _: &ConversionContext| -> Result<Option<Payload>> { Ok(None) },
        )));

        assert!(invoker
            .command_parameter(Some(&Payload::new(1_i64)))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_converter_error_propagates_unmodified() {
        let command = CountingCommand::new(true);
        let target = target_with(&[("Compute", Arc::clone(&command))]);

        let mut invoker = CommandInvoker::new();
        invoker.configure(
            InvokerSettings::new()
                .with_command_name("Compute")
                .pass_payload(true)
                .with_converter(doubler()),
        );
        invoker.attach(&target);

        let err = invoker.invoke(Some(&Payload::new("nope"))).unwrap_err();
        assert_eq!(err.to_string(), "expected an integer payload");
        assert_eq!(err.chain().count(), 1);
        assert_eq!(command.checks(), 0);
    }

    #[test]
    fn test_execute_error_propagates() {
        let failing: Arc<dyn Command> = Arc::new(crate::commands::command::RelayCommand::new(
            |_| Err(anyhow::anyhow!("write failed")),
        ));
        let target: Arc<dyn BoundTarget> = Arc::new(CommandTable::new("Editor"));

        let mut invoker = CommandInvoker::new();
        invoker.set_command(Some(failing));
        invoker.attach(&target);

        let err = invoker.invoke(None).unwrap_err();
        assert_eq!(err.to_string(), "write failed");
    }

    #[test]
    fn test_can_execute_error_skips_execute() {
        let executed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&executed);
        let command: Arc<dyn Command> = Arc::new(
            crate::commands::command::RelayCommand::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .with_can_execute(|_| Err(anyhow::anyhow!("state unavailable"))),
        );
        let target: Arc<dyn BoundTarget> = Arc::new(CommandTable::new("Editor"));

        let mut invoker = CommandInvoker::new();
        invoker.set_command(Some(command));
        invoker.attach(&target);

        assert!(invoker.invoke(None).is_err());
        assert_eq!(executed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_guard_sees_computed_parameter() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in = Arc::clone(&seen);
        let command: Arc<dyn Command> = Arc::new(
            crate::commands::command::RelayCommand::new(|_| Ok(())).with_can_execute(move |p| {
                let n = p.and_then(|p| p.downcast_ref::<i64>()).copied();
                seen_in.lock().unwrap().push(n);
                Ok(n.map(|n| n > 10).unwrap_or(false))
            }),
        );
        let target: Arc<dyn BoundTarget> = Arc::new(CommandTable::new("Editor"));

        let mut invoker = CommandInvoker::new();
        invoker.configure(
            InvokerSettings::new()
                .with_command(command)
                .pass_payload(true)
                .with_converter(doubler()),
        );
        invoker.attach(&target);

        assert_eq!(invoker.invoke(Some(&Payload::new(3_i64))).unwrap(), Outcome::Rejected);
        assert_eq!(invoker.invoke(Some(&Payload::new(6_i64))).unwrap(), Outcome::Executed);
        assert_eq!(*seen.lock().unwrap(), vec![Some(6), Some(12)]);
    }

    #[test]
    fn test_resolve_command_explicit_without_target() {
        let explicit = CountingCommand::new(true);
        let mut invoker = CommandInvoker::new();
        invoker.set_command(Some(Arc::clone(&explicit) as Arc<dyn Command>));

        let resolved = invoker.resolve_command().unwrap();
        let explicit_dyn: Arc<dyn Command> = explicit;
        assert!(Arc::ptr_eq(&resolved, &explicit_dyn));
    }

    #[test]
    fn test_observers_see_every_setter() {
        let fields = Arc::new(Mutex::new(Vec::new()));
        let fields_in = Arc::clone(&fields);

        let mut invoker = CommandInvoker::new();
        invoker.observe(Arc::new(move |field: ConfigField| {
            fields_in.lock().unwrap().push(field);
        }));

        invoker.set_command_name(Some("Save".to_string()));
        invoker.set_pass_payload_to_command(true);
        assert_eq!(
            *fields.lock().unwrap(),
            vec![ConfigField::CommandName, ConfigField::PassPayloadToCommand]
        );

        fields.lock().unwrap().clear();
        invoker.configure(InvokerSettings::new());
        assert_eq!(fields.lock().unwrap().len(), 6);
        assert!(invoker.command_name().is_none());
        assert!(!invoker.pass_payload_to_command());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Detached.to_string(), "detached");
        assert_eq!(Outcome::Rejected.to_string(), "rejected");
        assert_eq!(Outcome::Executed.to_string(), "executed");
        assert!(Outcome::Executed.executed());
        assert!(!Outcome::Rejected.executed());
    }
}
