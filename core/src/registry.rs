//! Command registration and dispatch.
//!
//! [`RegistryBuilder`] collects commands during application startup; the
//! registration phase may run from multiple threads, so the builder guards
//! its command list with one coarse mutex. [`RegistryBuilder::build`]
//! freezes the tree into an immutable [`Registry`] for the resolution and
//! dispatch phase, which needs no locking.
//!
//! Registering a command computes the schema for every runnable node in
//! its subtree, so annotation mistakes surface immediately instead of on
//! first use.
//!
//! # Example
//!
//! ```
//! use command_bind_core::{
//!     Bindable, Command, ProcessEnv, RegistryBuilder, RunContext, RunOutcome,
//! };
//!
//! #[derive(Debug, Default, Bindable)]
//! struct AddArgs {
//!     #[bind("t,text,Note text,required")]
//!     text: String,
//! }
//!
//! let builder = RegistryBuilder::new();
//! builder
//!     .register(Command::new("add").with_handler(
//!         |args: AddArgs| -> Result<(), std::convert::Infallible> {
//!             assert_eq!(args.text, "milk");
//!             Ok(())
//!         },
//!     ))
//!     .unwrap();
//! let registry = builder.build();
//!
//! let args: Vec<String> = vec!["add".into(), "--text".into(), "milk".into()];
//! let outcome = registry.run(&args, &RunContext::new(&ProcessEnv)).unwrap();
//! assert!(matches!(outcome, RunOutcome::Completed));
//! ```

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::warn;

use crate::command::{Command, RunContext};
use crate::error::Error;
use crate::resolve::{Resolution, ResolveError, resolve};
use crate::schema::SchemaError;

/// Command registration errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A runnable node in the registered subtree has an invalid schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A top-level name or alias is already taken.
    #[error("duplicate command in registry: {0}")]
    DuplicateCommand(String),
    /// Two children of the same node share a name or alias.
    #[error("duplicate subcommand under '{parent}': {name}")]
    DuplicateSubcommand {
        /// Name of the node owning the colliding children.
        parent: String,
        /// The colliding name or alias.
        name: String,
    },
}

/// The outcome of a dispatched invocation.
#[derive(Debug)]
pub enum RunOutcome<'a> {
    /// The resolved command's handler ran to completion.
    Completed,
    /// A non-runnable parent was invoked directly; the caller should show
    /// subcommand guidance for `command`.
    SubcommandRequired {
        /// The parent node that was resolved.
        command: &'a Command,
        /// Canonical path walked to reach it.
        path: Vec<String>,
    },
}

/// Collects commands before the tree is frozen.
#[derive(Debug)]
pub struct RegistryBuilder {
    commands: Mutex<Vec<Command>>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Registers a top-level command.
    ///
    /// Computes schemas for the whole subtree, rejects name and alias
    /// collisions, and logs any schema warnings. Takes `&self`, so threads
    /// sharing the builder can register concurrently.
    pub fn register(&self, mut command: Command) -> Result<(), RegistryError> {
        command.compute_schemas()?;
        check_sibling_collisions(&command)?;

        let mut commands = self
            .commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for existing in commands.iter() {
            for token in name_tokens(&command) {
                if existing.matches(token) {
                    return Err(RegistryError::DuplicateCommand(token.to_string()));
                }
            }
        }
        log_schema_warnings(&command);
        commands.push(command);
        Ok(())
    }

    /// Freezes the registered commands into an immutable [`Registry`].
    pub fn build(self) -> Registry {
        Registry {
            commands: self
                .commands
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable command tree ready for resolution and dispatch.
#[derive(Debug)]
pub struct Registry {
    commands: Vec<Command>,
}

impl Registry {
    /// Top-level commands in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Finds a top-level command by name or alias.
    pub fn find(&self, token: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.matches(token))
    }

    /// Resolves an argument vector to a command node without running it.
    pub fn resolve<'v>(&self, args: &'v [String]) -> Result<Resolution<'_, 'v>, ResolveError> {
        resolve(&self.commands, args)
    }

    /// Resolves and runs one invocation.
    ///
    /// Executes the resolved command's binding pipeline against the
    /// residual arguments and the layers in `context`, then invokes its
    /// handler. Invoking a non-runnable parent with nothing after it is
    /// not an error; it returns [`RunOutcome::SubcommandRequired`] so the
    /// caller can render guidance.
    pub fn run(&self, args: &[String], context: &RunContext<'_>) -> Result<RunOutcome<'_>, Error> {
        let resolution = self.resolve(args)?;

        let Some(binding) = resolution.command.binding() else {
            return match resolution.residual.first() {
                Some(token) => Err(ResolveError::UnknownSubcommand {
                    path: resolution.display_path(),
                    name: token.clone(),
                }
                .into()),
                None => Ok(RunOutcome::SubcommandRequired {
                    command: resolution.command,
                    path: resolution.path,
                }),
            };
        };

        let computed;
        let schema = match resolution.command.schema() {
            Some(schema) => schema,
            None => {
                computed = binding.analyze()?;
                &computed
            }
        };

        binding.run(resolution.residual, schema, context)?;
        Ok(RunOutcome::Completed)
    }
}

fn name_tokens(command: &Command) -> impl Iterator<Item = &str> {
    std::iter::once(command.name()).chain(command.aliases().iter().map(String::as_str))
}

fn check_sibling_collisions(command: &Command) -> Result<(), RegistryError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for child in command.subcommands() {
        for token in name_tokens(child) {
            if !seen.insert(token) {
                return Err(RegistryError::DuplicateSubcommand {
                    parent: command.name().to_string(),
                    name: token.to_string(),
                });
            }
        }
    }
    for child in command.subcommands() {
        check_sibling_collisions(child)?;
    }
    Ok(())
}

fn log_schema_warnings(command: &Command) {
    if let Some(schema) = command.schema() {
        for warning in &schema.warnings {
            warn!(command = command.name(), "{}", warning);
        }
    }
    for child in command.subcommands() {
        log_schema_warnings(child);
    }
}
