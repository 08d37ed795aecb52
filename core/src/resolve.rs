//! Command path resolution.
//!
//! Walks a registered command tree against the raw argument vector before
//! any tokenizing happens, because the resolved node decides which schema
//! the remaining tokens are parsed against. The walk is purely positional:
//! it descends while tokens keep matching child names or aliases and stops
//! at the first flag-shaped or unmatched token, leaving everything from
//! that point as residual arguments for the binder.
//!
//! # Example
//!
//! ```
//! use command_bind_core::{resolve, Command};
//!
//! let commands = vec![
//!     Command::new("tag")
//!         .with_subcommand(Command::new("list"))
//!         .with_subcommand(Command::new("rm")),
//! ];
//! let args: Vec<String> = vec!["tag".into(), "rm".into(), "old".into()];
//!
//! let resolution = resolve(&commands, &args).unwrap();
//! assert_eq!(resolution.command.name(), "rm");
//! assert_eq!(resolution.path, vec!["tag", "rm"]);
//! assert_eq!(resolution.residual, ["old".to_string()]);
//! ```

use thiserror::Error;

use crate::command::Command;

/// Command resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The argument vector is empty.
    #[error("no command given")]
    NoCommand,
    /// The first argument matches no registered command name or alias.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// A non-runnable parent received a token matching none of its children.
    #[error("unknown subcommand '{name}' for '{path}'")]
    UnknownSubcommand {
        /// Canonical path of the parent command.
        path: String,
        /// The token that matched no child.
        name: String,
    },
}

/// The result of walking the command tree.
#[derive(Debug)]
pub struct Resolution<'c, 'v> {
    /// The deepest command reached.
    pub command: &'c Command,
    /// Canonical names walked, aliases replaced by the commands' names.
    pub path: Vec<String>,
    /// Arguments left for tokenizing against the resolved command's schema.
    pub residual: &'v [String],
}

impl Resolution<'_, '_> {
    /// Whether a non-runnable parent was invoked with nothing after it.
    ///
    /// Callers present subcommand guidance for this condition instead of
    /// binding against a node that cannot execute. A runnable parent with
    /// no residual arguments executes normally.
    pub fn subcommand_required(&self) -> bool {
        self.command.has_children() && self.residual.is_empty() && !self.command.is_runnable()
    }

    /// The canonical path as one space-separated string.
    pub fn display_path(&self) -> String {
        self.path.join(" ")
    }
}

/// Resolves an argument vector against a command list.
///
/// The first argument selects a top-level command by name or alias. While
/// the selected node has children, subsequent tokens descend the tree; the
/// walk stops at the first token that starts with `-` or matches no child,
/// and everything from that token on becomes residual.
///
/// # Examples
///
/// ```
/// use command_bind_core::{resolve, Command, ResolveError};
///
/// let commands = vec![Command::new("list").with_alias("ls")];
///
/// let args: Vec<String> = vec!["ls".into(), "--all".into()];
/// let resolution = resolve(&commands, &args).unwrap();
/// assert_eq!(resolution.path, vec!["list"]);
///
/// let args: Vec<String> = vec!["lost".into()];
/// let err = resolve(&commands, &args).unwrap_err();
/// assert_eq!(err, ResolveError::UnknownCommand("lost".to_string()));
/// ```
pub fn resolve<'c, 'v>(
    commands: &'c [Command],
    args: &'v [String],
) -> Result<Resolution<'c, 'v>, ResolveError> {
    let first = args.first().ok_or(ResolveError::NoCommand)?;
    let mut command = commands
        .iter()
        .find(|command| command.matches(first))
        .ok_or_else(|| ResolveError::UnknownCommand(first.clone()))?;

    let mut path = vec![command.name().to_string()];
    let mut index = 1;

    while command.has_children() {
        let Some(token) = args.get(index) else { break };
        if token.starts_with('-') {
            break;
        }
        let Some(child) = command
            .subcommands()
            .iter()
            .find(|child| child.matches(token))
        else {
            break;
        };
        command = child;
        path.push(child.name().to_string());
        index += 1;
    }

    Ok(Resolution {
        command,
        path,
        residual: &args[index..],
    })
}
