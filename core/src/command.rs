//! Command tree nodes and their typed bindings.
//!
//! A [`Command`] describes one node of a CLI: its name, aliases, nested
//! subcommands, and optionally a typed handler. Attaching a handler with
//! [`Command::with_handler`] captures the record type, so the node can run
//! the whole binding pipeline (environment overlay, config-file layer, CLI
//! arguments, defaults, validation) without the caller naming the type
//! again at dispatch time.
//!
//! # Example
//!
//! ```
//! use command_bind_core::{Bindable, Command};
//!
//! #[derive(Debug, Default, Bindable)]
//! struct AddArgs {
//!     #[bind("t,text,Note text,required")]
//!     text: String,
//! }
//!
//! let add = Command::new("add")
//!     .with_description("Add a note")
//!     .with_alias("a")
//!     .with_handler(|args: AddArgs| -> Result<(), std::convert::Infallible> {
//!         assert!(!args.text.is_empty());
//!         Ok(())
//!     });
//!
//! assert!(add.is_runnable());
//! assert!(add.matches("a"));
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::bind::{apply_defaults, bind_args, bind_values};
use crate::env::{EnvSource, environment_values};
use crate::error::Error;
use crate::merge::merge_records;
use crate::record::Bindable;
use crate::schema::{SchemaError, SchemaMetadata, schema_of};
use crate::tokenize::tokenize;
use crate::validate::validate;
use crate::value::FieldValue;

/// Per-invocation inputs for the binding pipeline.
///
/// Carries the environment source and the values loaded from a config
/// file. The config-file map is keyed by flag long names, the shape
/// produced by the `command-bind-config` crate.
pub struct RunContext<'a> {
    env: &'a dyn EnvSource,
    file_values: HashMap<String, FieldValue>,
}

impl<'a> RunContext<'a> {
    /// Creates a context reading from `env` with no config-file layer.
    pub fn new(env: &'a dyn EnvSource) -> Self {
        Self {
            env,
            file_values: HashMap::new(),
        }
    }

    /// Sets the config-file value layer.
    pub fn with_file_values(mut self, values: HashMap<String, FieldValue>) -> Self {
        self.file_values = values;
        self
    }
}

type RunFn = Box<dyn Fn(&[String], &SchemaMetadata, &RunContext<'_>) -> Result<(), Error> + Send + Sync>;

/// The type-erased binding attached to a runnable command.
///
/// Created by [`Command::with_handler`]; holds a schema constructor for the
/// captured record type and a closure running the layered pipeline plus the
/// handler.
pub struct Binding {
    analyze: fn() -> Result<SchemaMetadata, SchemaError>,
    run: RunFn,
}

impl Binding {
    fn new<T, F, E>(handler: F) -> Self
    where
        T: Bindable,
        F: Fn(T) -> Result<(), E> + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        Binding {
            analyze: schema_of::<T>,
            run: Box::new(move |args, schema, context| {
                let record = bind_layers::<T>(args, schema, context)?;
                handler(record).map_err(|err| Error::Handler(Box::new(err)))
            }),
        }
    }

    pub(crate) fn analyze(&self) -> Result<SchemaMetadata, SchemaError> {
        (self.analyze)()
    }

    pub(crate) fn run(
        &self,
        args: &[String],
        schema: &SchemaMetadata,
        context: &RunContext<'_>,
    ) -> Result<(), Error> {
        (self.run)(args, schema, context)
    }
}

/// Runs the full layering chain for one record type.
///
/// Environment overlay first, config-file values filled over it, tokenized
/// CLI arguments filled over that, defaults last, validation on the result.
/// Each stronger layer keeps its own values and takes the weaker layer's
/// only where it is still at the kind's zero value.
fn bind_layers<T: Bindable>(
    args: &[String],
    schema: &SchemaMetadata,
    context: &RunContext<'_>,
) -> Result<T, Error> {
    let mut env_record = T::default();
    let env_values = environment_values(context.env, schema);
    bind_values(&mut env_record, &env_values, schema)?;

    let mut file_record = T::default();
    bind_values(&mut file_record, &context.file_values, schema)?;
    merge_records(&mut file_record, &env_record, schema)?;

    let tokens = tokenize(args, schema)?;
    let mut record = T::default();
    bind_args(&mut record, &tokens, schema)?;
    merge_records(&mut record, &file_record, schema)?;

    apply_defaults(&mut record, schema)?;
    validate(&record, schema)?;
    Ok(record)
}

/// One node of the command tree.
pub struct Command {
    name: String,
    description: String,
    aliases: Vec<String>,
    subcommands: Vec<Command>,
    binding: Option<Binding>,
    schema: Option<SchemaMetadata>,
}

impl Command {
    /// Creates a command with the given name.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_core::Command;
    ///
    /// let cmd = Command::new("list");
    /// assert_eq!(cmd.name(), "list");
    /// assert!(!cmd.is_runnable());
    /// assert!(!cmd.has_children());
    /// ```
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            aliases: Vec::new(),
            subcommands: Vec::new(),
            binding: None,
            schema: None,
        }
    }

    /// Adds a description shown in help output.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Adds an alias the resolver accepts in place of the name.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a nested subcommand.
    pub fn with_subcommand(mut self, subcommand: Command) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Attaches a typed handler, making the command runnable.
    ///
    /// The record type `T` determines the command's schema; running the
    /// command binds all layers into a `T` and passes it to `handler`.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_core::{Bindable, Command};
    ///
    /// #[derive(Debug, Default, Bindable)]
    /// struct ListArgs {
    ///     #[bind("l,limit,Maximum results,default=20")]
    ///     limit: i64,
    /// }
    ///
    /// let list = Command::new("list").with_handler(
    ///     |args: ListArgs| -> Result<(), std::convert::Infallible> {
    ///         assert!(args.limit > 0);
    ///         Ok(())
    ///     },
    /// );
    /// assert!(list.is_runnable());
    /// ```
    pub fn with_handler<T, F, E>(mut self, handler: F) -> Self
    where
        T: Bindable,
        F: Fn(T) -> Result<(), E> + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.binding = Some(Binding::new::<T, F, E>(handler));
        self
    }

    /// The command's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command's description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Aliases accepted in place of the name.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Nested subcommands in registration order.
    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    /// The schema computed at registration, when the command is runnable.
    pub fn schema(&self) -> Option<&SchemaMetadata> {
        self.schema.as_ref()
    }

    /// Whether a handler is attached.
    pub fn is_runnable(&self) -> bool {
        self.binding.is_some()
    }

    /// Whether the command has subcommands.
    pub fn has_children(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Whether `token` is the command's name or one of its aliases.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|alias| alias == token)
    }

    pub(crate) fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// Computes and stores the schema for this node and all descendants.
    ///
    /// Called at registration time so schema errors surface before any
    /// argument is parsed.
    pub(crate) fn compute_schemas(&mut self) -> Result<(), SchemaError> {
        if let Some(binding) = &self.binding {
            self.schema = Some(binding.analyze()?);
        }
        for subcommand in &mut self.subcommands {
            subcommand.compute_schemas()?;
        }
        Ok(())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .field("subcommands", &self.subcommands)
            .field("runnable", &self.binding.is_some())
            .finish_non_exhaustive()
    }
}
