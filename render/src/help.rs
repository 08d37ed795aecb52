//! Help-text generation from analyzed command schemas.
//!
//! Rendering is a pure function of a [`Command`] and the invocation path
//! that reached it, so the same node renders identically wherever it sits
//! in the tree. Hidden fields never appear in any section.

use command_bind_core::{Command, FieldSpec, ValueKind};

/// Renders the full help page for one command.
///
/// Sections appear in a fixed order: description, usage line, positional
/// `Arguments`, flag `Options`, and `Subcommands`. Sections with nothing
/// to show are omitted.
///
/// # Examples
///
/// ```
/// use command_bind_core::Command;
/// use command_bind_render::command_help;
///
/// let command = Command::new("list")
///     .with_description("List stored notes")
///     .with_subcommand(Command::new("archived").with_description("Only archived notes"));
///
/// let help = command_help(&command, "notectl list");
/// assert!(help.contains("Usage: notectl list <command>"));
/// assert!(help.contains("archived"));
/// ```
pub fn command_help(command: &Command, path: &str) -> String {
    let mut out = String::new();

    if !command.description().is_empty() {
        out.push_str(command.description());
        out.push_str("\n\n");
    }

    out.push_str(&format!("Usage: {}\n", usage_line(command, path)));

    if let Some(schema) = command.schema() {
        let arguments: Vec<(String, String)> = schema
            .positional_fields()
            .filter(|spec| !spec.hidden)
            .map(|spec| (spec.long.clone(), field_detail(spec)))
            .collect();
        if !arguments.is_empty() {
            out.push_str("\nArguments:\n");
            push_rows(&mut out, &arguments);
        }

        let options: Vec<(String, String)> = schema
            .flag_fields()
            .filter(|spec| !spec.hidden)
            .map(|spec| (option_left(spec), field_detail(spec)))
            .collect();
        if !options.is_empty() {
            out.push_str("\nOptions:\n");
            push_rows(&mut out, &options);
        }
    }

    let subcommands = subcommand_rows(command);
    if !subcommands.is_empty() {
        out.push_str("\nSubcommands:\n");
        push_rows(&mut out, &subcommands);
    }

    out
}

/// Renders the guidance shown when a parent command is invoked without a
/// subcommand.
pub fn subcommand_overview(command: &Command, path: &str) -> String {
    let mut out = String::new();

    if !command.description().is_empty() {
        out.push_str(command.description());
        out.push_str("\n\n");
    }

    out.push_str(&format!("Usage: {path} <command>\n"));

    let rows = subcommand_rows(command);
    if !rows.is_empty() {
        out.push_str("\nSubcommands:\n");
        push_rows(&mut out, &rows);
    }

    out
}

fn usage_line(command: &Command, path: &str) -> String {
    let mut usage = path.to_string();

    if let Some(schema) = command.schema() {
        if schema.flag_fields().any(|spec| !spec.hidden) {
            usage.push_str(" [flags]");
        }
        for spec in schema.positional_fields() {
            if spec.hidden {
                continue;
            }
            usage.push(' ');
            usage.push_str(&positional_token(spec));
        }
    }

    if command.has_children() && !command.is_runnable() {
        usage.push_str(" <command>");
    }

    usage
}

fn positional_token(spec: &FieldSpec) -> String {
    let name = if spec.kind == ValueKind::TextSeq {
        format!("{}...", spec.long)
    } else {
        spec.long.clone()
    };
    if spec.required {
        format!("<{name}>")
    } else {
        format!("[{name}]")
    }
}

fn option_left(spec: &FieldSpec) -> String {
    let mut left = match spec.short {
        Some(short) => format!("-{short}, --{}", spec.long),
        None => format!("    --{}", spec.long),
    };
    if spec.kind != ValueKind::Bool {
        left.push_str(&format!(" <{}>", spec.kind.name()));
    }
    left
}

fn field_detail(spec: &FieldSpec) -> String {
    let mut detail = spec.description.clone();
    if let Some(default) = &spec.default {
        append_note(&mut detail, &format!("[default: {default}]"));
    }
    if let Some(var) = &spec.env {
        append_note(&mut detail, &format!("[env: {var}]"));
    }
    if !spec.choices.is_empty() {
        append_note(&mut detail, &format!("[choices: {}]", spec.choices.join(", ")));
    }
    detail
}

fn append_note(detail: &mut String, note: &str) {
    if !detail.is_empty() {
        detail.push(' ');
    }
    detail.push_str(note);
}

fn subcommand_rows(command: &Command) -> Vec<(String, String)> {
    command
        .subcommands()
        .iter()
        .map(|child| {
            let left = if child.aliases().is_empty() {
                child.name().to_string()
            } else {
                format!("{}, {}", child.name(), child.aliases().join(", "))
            };
            (left, child.description().to_string())
        })
        .collect()
}

fn push_rows(out: &mut String, rows: &[(String, String)]) {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    for (left, detail) in rows {
        if detail.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:<width$}  {detail}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use command_bind_core::{Bindable, Registry, RegistryBuilder};

    use super::*;

    #[derive(Debug, Default, Bindable)]
    struct AddArgs {
        #[bind("t,text,Note body,required")]
        text: String,

        #[bind("p,priority,Priority level,default=3|choices=1;2;3|env=NOTECTL_PRIORITY")]
        priority: i64,

        #[bind(",pin,Pin the note,")]
        pin: bool,

        #[bind(",,Internal marker,hidden")]
        marker: String,

        #[bind(",tags,Labels to attach,positional")]
        tags: Vec<String>,
    }

    fn add_registry() -> Registry {
        let builder = RegistryBuilder::new();
        builder
            .register(
                Command::new("add")
                    .with_description("Add a note to the store")
                    .with_handler(|_: AddArgs| Ok::<(), std::convert::Infallible>(())),
            )
            .unwrap();
        builder.build()
    }

    fn add_help() -> String {
        let registry = add_registry();
        let command = registry.find("add").expect("registered");
        command_help(command, "notectl add")
    }

    #[test]
    fn test_help_renders_usage_with_flags_and_positionals() {
        let help = add_help();
        assert!(help.starts_with("Add a note to the store\n\nUsage: notectl add [flags] [tags...]\n"));
    }

    #[test]
    fn test_help_lists_options_with_annotations() {
        let help = add_help();
        assert!(help.contains("-t, --text <text>"));
        assert!(help.contains("Note body"));
        assert!(help.contains("[default: 3]"));
        assert!(help.contains("[env: NOTECTL_PRIORITY]"));
        assert!(help.contains("[choices: 1, 2, 3]"));
    }

    #[test]
    fn test_boolean_option_has_no_value_placeholder() {
        let help = add_help();
        assert!(help.contains("    --pin  "));
        assert!(!help.contains("--pin <"));
    }

    #[test]
    fn test_hidden_fields_are_omitted() {
        let help = add_help();
        assert!(!help.contains("marker"));
        assert!(!help.contains("Internal marker"));
    }

    #[test]
    fn test_positionals_render_in_arguments_section() {
        let help = add_help();
        assert!(help.contains("\nArguments:\n  tags  Labels to attach\n"));
    }

    #[test]
    fn test_required_positional_renders_angle_brackets() {
        #[derive(Debug, Default, Bindable)]
        struct ShowArgs {
            #[bind(",id,Note identifier,required|positional")]
            id: String,
        }

        let builder = RegistryBuilder::new();
        builder
            .register(
                Command::new("show")
                    .with_handler(|_: ShowArgs| Ok::<(), std::convert::Infallible>(())),
            )
            .unwrap();
        let registry = builder.build();
        let help = command_help(registry.find("show").expect("registered"), "notectl show");
        assert!(help.contains("Usage: notectl show <id>\n"));
    }

    #[test]
    fn test_parent_without_handler_points_at_subcommands() {
        let parent = Command::new("tag")
            .with_description("Manage tags")
            .with_subcommand(Command::new("rm").with_description("Remove a tag").with_alias("remove"));

        let help = command_help(&parent, "notectl tag");
        assert!(help.contains("Usage: notectl tag <command>"));
        assert!(help.contains("rm, remove"));

        let overview = subcommand_overview(&parent, "notectl tag");
        assert!(overview.contains("Usage: notectl tag <command>"));
        assert!(overview.contains("Remove a tag"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(add_help(), add_help());
    }
}
