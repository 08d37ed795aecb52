//! Typed argument binding for CLI commands.
//!
//! This crate turns annotated configuration structs into runnable commands:
//!
//! - [`Bindable`] / [`RawField`] — the record contract, implemented by hand
//!   or through `#[derive(Bindable)]`.
//! - [`SchemaMetadata`] / [`FieldSpec`] — flag metadata derived from the
//!   per-field annotations ([`analyze`], [`schema_of`]).
//! - [`tokenize`] — POSIX/GNU-style argument tokenizing (long flags with
//!   `=` or a following value, short-flag bundling, `--` end-of-flags).
//! - [`bind_values`] / [`bind_positionals`] / [`apply_defaults`] — the
//!   binder, with [`bind`] as the single-layer shortcut.
//! - [`merge_records`] — the layering primitive behind the precedence
//!   contract: CLI flag > config-file value > environment variable >
//!   schema default.
//! - [`validate`] — post-bind required and choices checks.
//! - [`Command`] / [`RegistryBuilder`] / [`Registry`] — the command tree,
//!   path resolution, and dispatch through typed handlers.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use command_bind_core::{Bindable, Command, RegistryBuilder, RunContext, RunOutcome};
//!
//! #[derive(Debug, Default, Bindable)]
//! struct AddArgs {
//!     #[bind("t,text,Note text,required")]
//!     text: String,
//!     #[bind("p,priority,Priority level,default=3|choices=1;2;3;4;5")]
//!     priority: i64,
//!     #[bind(",tags,Tags to attach,positional")]
//!     tags: Vec<String>,
//! }
//!
//! let builder = RegistryBuilder::new();
//! builder
//!     .register(Command::new("add").with_alias("a").with_handler(
//!         |args: AddArgs| -> Result<(), std::convert::Infallible> {
//!             assert_eq!(args.text, "buy milk");
//!             assert_eq!(args.priority, 3);
//!             assert_eq!(args.tags, ["errand"]);
//!             Ok(())
//!         },
//!     ))
//!     .unwrap();
//! let registry = builder.build();
//!
//! let env: HashMap<String, String> = HashMap::new();
//! let args: Vec<String> =
//!     vec!["add".into(), "--text".into(), "buy milk".into(), "errand".into()];
//! let outcome = registry.run(&args, &RunContext::new(&env)).unwrap();
//! assert!(matches!(outcome, RunOutcome::Completed));
//! ```

mod bind;
mod command;
mod env;
mod error;
mod merge;
mod record;
mod registry;
mod resolve;
mod schema;
mod tokenize;
mod validate;
mod value;

pub use bind::{apply_defaults, bind, bind_args, bind_positionals, bind_values};
pub use command::{Binding, Command, RunContext};
pub use env::{EnvSource, ProcessEnv, environment_values};
pub use error::{Error, Result};
pub use merge::{MergeError, merge_records};
pub use record::{Bindable, RawField, SetError};
pub use registry::{Registry, RegistryBuilder, RegistryError, RunOutcome};
pub use resolve::{Resolution, ResolveError, resolve};
pub use schema::{FieldSpec, SchemaError, SchemaMetadata, SchemaWarning, analyze, schema_of};
pub use tokenize::{ParseError, TokenizedArgs, tokenize};
pub use validate::{ValidationError, validate};
pub use value::{ConversionError, FieldValue, ValueKind, coerce};

#[cfg(feature = "derive")]
pub use command_bind_macros::Bindable;
