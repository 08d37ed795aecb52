//! Help and suggestion rendering for command-bind trees.
//!
//! Pure string-building over analyzed schemas and command nodes:
//!
//! - [`command_help`] renders the full help page for one command.
//! - [`subcommand_overview`] renders the guidance for a parent invoked
//!   without a subcommand.
//! - [`suggest`] finds the closest command name for "did you mean" output.

mod help;
mod suggest;

pub use help::{command_help, subcommand_overview};
pub use suggest::suggest;
