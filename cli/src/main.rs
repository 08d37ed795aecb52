use std::convert::Infallible;

use command_bind_config::ConfigFile;
use command_bind_core::{
    Bindable, Command, Error, ProcessEnv, Registry, RegistryBuilder, RegistryError, ResolveError,
    RunContext, RunOutcome,
};
use command_bind_render::{command_help, subcommand_overview, suggest};

const PROGRAM: &str = "notectl";

// ---------------------------------------------------------------------------
// Argument records
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Bindable)]
struct AddArgs {
    /// Body of the note.
    #[bind("t,text,Note text,required")]
    text: String,
    /// 1 is the most urgent bucket.
    #[bind("p,priority,Priority from 1 (high) to 5 (low),default=3|choices=1;2;3;4;5|env=NOTECTL_PRIORITY")]
    priority: i64,
    #[bind(",pin,Pin the note to the top,")]
    pin: bool,
    #[bind(",tags,Labels to attach,positional")]
    tags: Vec<String>,
}

#[derive(Debug, Default, Bindable)]
struct ListArgs {
    #[bind("l,limit,Maximum notes to show,default=20|env=NOTECTL_LIMIT")]
    limit: i64,
    #[bind("f,format,Output format,default=table|choices=table;json;yaml|env=NOTECTL_FORMAT")]
    format: String,
    #[bind("a,archived,Include archived notes,")]
    archived: bool,
    #[bind("w,wide,Show full note text,")]
    wide: bool,
}

#[derive(Debug, Default, Bindable)]
struct ShowArgs {
    #[bind(",id,Note identifier,required|positional")]
    id: String,
    #[bind(",raw,Print the raw bound record,hidden")]
    raw: bool,
}

#[derive(Debug, Default, Bindable)]
struct TagAddArgs {
    #[bind(",note,Note identifier,required|positional")]
    note: String,
    #[bind(",name,Tag to attach,required|positional")]
    name: String,
}

#[derive(Debug, Default, Bindable)]
struct TagRmArgs {
    #[bind(",note,Note identifier,required|positional")]
    note: String,
    #[bind(",name,Tag to remove,positional")]
    name: String,
    #[bind(",all,Remove every tag,")]
    all: bool,
}

#[derive(Debug, Default, Bindable)]
struct TagListArgs {
    #[bind("s,sort,Sort order,default=name|choices=name;count")]
    sort: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
enum TagError {
    #[error("a tag name is required unless --all is set")]
    MissingName,

    #[error("cannot combine --all with a tag name")]
    AllWithName,
}

fn run_add(args: AddArgs) -> Result<(), Infallible> {
    println!("added note \"{}\" (priority {})", args.text, args.priority);
    if !args.tags.is_empty() {
        println!("  tags: {}", args.tags.join(", "));
    }
    if args.pin {
        println!("  pinned");
    }
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), Infallible> {
    let mut line = format!("listing up to {} notes as {}", args.limit, args.format);
    if args.archived {
        line.push_str(" including archived");
    }
    if args.wide {
        line.push_str(" in wide layout");
    }
    println!("{line}");
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<(), Infallible> {
    if args.raw {
        println!("{args:?}");
    } else {
        println!("showing note {}", args.id);
    }
    Ok(())
}

fn run_tag_add(args: TagAddArgs) -> Result<(), Infallible> {
    println!("tagged note {} with '{}'", args.note, args.name);
    Ok(())
}

fn run_tag_rm(args: TagRmArgs) -> Result<(), TagError> {
    if args.all && !args.name.is_empty() {
        return Err(TagError::AllWithName);
    }
    if !args.all && args.name.is_empty() {
        return Err(TagError::MissingName);
    }
    if args.all {
        println!("removed all tags from note {}", args.note);
    } else {
        println!("removed tag '{}' from note {}", args.name, args.note);
    }
    Ok(())
}

fn run_tag_list(args: TagListArgs) -> Result<(), Infallible> {
    println!("tags sorted by {}", args.sort);
    Ok(())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let registry = build_registry().map_err(|err| err.to_string())?;

    if args.is_empty() || is_help_token(&args[0]) {
        print!("{}", root_help(&registry));
        return Ok(());
    }
    if args[0] == "help" {
        return run_help(&registry, &args[1..]);
    }

    if let Ok(resolution) = registry.resolve(args) {
        if resolution
            .residual
            .first()
            .is_some_and(|token| is_help_token(token))
        {
            let path = format!("{PROGRAM} {}", resolution.display_path());
            print!("{}", command_help(resolution.command, &path));
            return Ok(());
        }
    }

    let env = ProcessEnv;
    let mut context = RunContext::new(&env);
    if let Some(path) = config_path() {
        let file = ConfigFile::load(&path).map_err(|err| format!("config file '{path}': {err}"))?;
        context = context.with_file_values(file.into_values());
    }

    match registry.run(args, &context) {
        Ok(RunOutcome::Completed) => Ok(()),
        Ok(RunOutcome::SubcommandRequired { command, path }) => {
            let path = format!("{PROGRAM} {}", path.join(" "));
            print!("{}", subcommand_overview(command, &path));
            Ok(())
        }
        Err(Error::Resolve(ResolveError::UnknownCommand(name))) => {
            Err(unknown_command_message(&registry, &name))
        }
        Err(err) => Err(err.to_string()),
    }
}

fn build_registry() -> Result<Registry, RegistryError> {
    let builder = RegistryBuilder::new();
    builder.register(
        Command::new("add")
            .with_alias("a")
            .with_description("Add a note")
            .with_handler(run_add),
    )?;
    builder.register(
        Command::new("list")
            .with_alias("ls")
            .with_description("List notes")
            .with_handler(run_list),
    )?;
    builder.register(
        Command::new("show")
            .with_description("Show one note")
            .with_handler(run_show),
    )?;
    builder.register(
        Command::new("tag")
            .with_description("Manage note tags")
            .with_subcommand(
                Command::new("add")
                    .with_description("Attach a tag to a note")
                    .with_handler(run_tag_add),
            )
            .with_subcommand(
                Command::new("rm")
                    .with_alias("remove")
                    .with_description("Remove tags from a note")
                    .with_handler(run_tag_rm),
            )
            .with_subcommand(
                Command::new("list")
                    .with_description("List known tags")
                    .with_handler(run_tag_list),
            ),
    )?;
    Ok(builder.build())
}

// ---------------------------------------------------------------------------
// Help output
// ---------------------------------------------------------------------------

fn run_help(registry: &Registry, args: &[String]) -> Result<(), String> {
    let path: Vec<String> = args
        .iter()
        .filter(|arg| !arg.starts_with('-'))
        .cloned()
        .collect();

    if path.is_empty() {
        print!("{}", root_help(registry));
        return Ok(());
    }

    match registry.resolve(&path) {
        Ok(resolution) => {
            if let Some(extra) = resolution.residual.first() {
                return Err(format!(
                    "unknown subcommand '{extra}' for '{}'",
                    resolution.display_path()
                ));
            }
            let full = format!("{PROGRAM} {}", resolution.display_path());
            print!("{}", command_help(resolution.command, &full));
            Ok(())
        }
        Err(ResolveError::UnknownCommand(name)) => Err(unknown_command_message(registry, &name)),
        Err(err) => Err(err.to_string()),
    }
}

fn root_help(registry: &Registry) -> String {
    let rows: Vec<(String, String)> = registry
        .commands()
        .iter()
        .map(|command| {
            let left = if command.aliases().is_empty() {
                command.name().to_string()
            } else {
                format!("{}, {}", command.name(), command.aliases().join(", "))
            };
            (left, command.description().to_string())
        })
        .collect();
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);

    let mut out = String::from("Take notes from the command line.\n");
    out.push_str(&format!("\nUsage: {PROGRAM} <command>\n\nCommands:\n"));
    for (left, description) in &rows {
        out.push_str(&format!("  {left:<width$}  {description}\n"));
    }
    out.push_str(&format!(
        "\nRun '{PROGRAM} help <command>' for details on a command.\n"
    ));
    out.push_str("Set NOTECTL_CONFIG to a JSON or YAML file of flag values.\n");
    out
}

fn unknown_command_message(registry: &Registry, name: &str) -> String {
    let mut message = format!("unknown command: {name}");
    if let Some(candidate) = suggest(name, command_tokens(registry)) {
        message.push_str(&format!("\ndid you mean '{candidate}'?"));
    }
    message
}

fn command_tokens(registry: &Registry) -> impl Iterator<Item = &str> {
    registry.commands().iter().flat_map(|command| {
        std::iter::once(command.name()).chain(command.aliases().iter().map(String::as_str))
    })
}

fn config_path() -> Option<String> {
    std::env::var("NOTECTL_CONFIG")
        .ok()
        .filter(|path| !path.is_empty())
}

fn is_help_token(arg: &str) -> bool {
    arg == "--help" || arg == "-h"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_builds_the_full_tree() {
        let registry = build_registry().unwrap();
        assert!(registry.find("add").is_some());
        assert!(registry.find("ls").is_some());
        let tag = registry.find("tag").expect("tag registered");
        assert_eq!(tag.subcommands().len(), 3);
        assert!(!tag.is_runnable());
    }

    #[test]
    fn test_root_help_lists_commands_and_aliases() {
        let registry = build_registry().unwrap();
        let help = root_help(&registry);
        assert!(help.contains("Usage: notectl <command>"));
        assert!(help.contains("add, a"));
        assert!(help.contains("list, ls"));
        assert!(help.contains("Manage note tags"));
    }

    #[test]
    fn test_unknown_command_message_suggests_close_names() {
        let registry = build_registry().unwrap();
        let message = unknown_command_message(&registry, "lst");
        assert!(message.contains("unknown command: lst"));
        assert!(message.contains("did you mean 'list'?"));
    }

    #[test]
    fn test_unknown_command_message_without_close_names() {
        let registry = build_registry().unwrap();
        let message = unknown_command_message(&registry, "synchronize");
        assert_eq!(message, "unknown command: synchronize");
    }

    #[test]
    fn test_is_help_token() {
        assert!(is_help_token("--help"));
        assert!(is_help_token("-h"));
        assert!(!is_help_token("help"));
        assert!(!is_help_token("--helper"));
    }
}
