//! Binding host
//!
//! Plays the host-framework role around [`CommandInvoker`]: stores the
//! configuration of every binding, attaches invokers to the bound target and
//! delivers trigger events to them one at a time.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use anyhow::{anyhow, Result};
use log::{debug, info};
use std::sync::Arc;

use super::config::{Binding, BindingConfig};
use super::converters::ConverterRegistry;
use crate::commands::{BoundTarget, CommandInvoker, CommandTable, InvokerSettings, Outcome, Payload};

/// Event-driven host for a set of bindings on one target
pub struct BindingHost {
    target: Arc<dyn BoundTarget>,
    invokers: Vec<(String, CommandInvoker)>,
}

impl BindingHost {
    /// Build one attached invoker per binding
    ///
    /// `library` supplies the commands named by `command_ref`; those become
    /// explicit commands and take precedence over `command_name`.
    pub fn build(
        config: &BindingConfig,
        converters: &ConverterRegistry,
        library: &CommandTable,
        target: Arc<dyn BoundTarget>,
    ) -> Result<Self> {
        let mut invokers = Vec::with_capacity(config.bindings.len());

        for binding in &config.bindings {
            let mut invoker = CommandInvoker::new();
            invoker.configure(Self::settings_for(binding, converters, library)?);
            invoker.attach(&target);
            invokers.push((binding.event.clone(), invoker));
        }

        info!(
            "Bound {} binding(s) for {} event(s) to {}",
            invokers.len(),
            config.events().len(),
            target.type_name()
        );

        Ok(Self { target, invokers })
    }

    fn settings_for(
        binding: &Binding,
        converters: &ConverterRegistry,
        library: &CommandTable,
    ) -> Result<InvokerSettings> {
        let command = match binding.command_ref.as_deref() {
            Some(name) => Some(library.get(name).ok_or_else(|| {
                anyhow!(
                    "Unknown command_ref '{}' in binding for event '{}'",
                    name,
                    binding.event
                )
            })?),
            None => None,
        };

        let payload_converter = match binding.converter.as_deref() {
            Some(name) => Some(converters.get(name).ok_or_else(|| {
                anyhow!(
                    "Unknown converter '{}' in binding for event '{}'",
                    name,
                    binding.event
                )
            })?),
            None => None,
        };

        Ok(InvokerSettings {
            command,
            command_name: binding.command_name.clone(),
            command_parameter: binding.parameter.clone().map(Payload::new),
            pass_payload_to_command: binding.pass_payload,
            payload_converter,
            converter_parameter: binding.converter_parameter.clone().map(Payload::new),
        })
    }

    /// Deliver one trigger to every binding of `event`, in file order
    ///
    /// Stops at the first converter or command error.
    pub fn fire(&self, event: &str, payload: Option<&Payload>) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::new();

        for invoker in self.invokers_for(event) {
            let outcome = invoker.invoke(payload)?;
            debug!("Event '{event}': {outcome}");
            outcomes.push(outcome);
        }

        if outcomes.is_empty() {
            debug!("Event '{event}' has no bindings");
        }

        Ok(outcomes)
    }

    /// Invokers bound to `event`
    pub fn invokers_for<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a CommandInvoker> {
        self.invokers
            .iter()
            .filter(move |(e, _)| e == event)
            .map(|(_, invoker)| invoker)
    }

    /// Re-attach every invoker to the target
    pub fn attach_all(&mut self) {
        for (_, invoker) in &mut self.invokers {
            invoker.attach(&self.target);
        }
    }

    /// Detach every invoker; further events become no-ops
    pub fn detach_all(&mut self) {
        for (_, invoker) in &mut self.invokers {
            invoker.detach();
        }
    }

    pub fn target(&self) -> &Arc<dyn BoundTarget> {
        &self.target
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.invokers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invokers.is_empty()
    }
}
