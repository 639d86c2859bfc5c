//! Usage and help text for a node of the tree.
//!
//! Pure string building: nothing here prints or exits.

use crate::cli::Cli;
use crate::node::{Command, HelpRequest, NodeRef, Opt};

impl Cli {
    /// Render help for the node a [`HelpRequest`] points at.
    pub fn help(&self, request: &HelpRequest<'_>) -> String {
        render(self, request.node(), request.path())
    }

    /// Render help for the whole program.
    pub fn root_help(&self) -> String {
        render(self, NodeRef::Root(self), "")
    }

    /// `<name> <version>` (or just the name when no version is set).
    pub fn version_text(&self) -> String {
        match self.version().map(str::trim).filter(|v| !v.is_empty()) {
            Some(version) => format!("{} {}\n", self.display_name(), version),
            None => format!("{}\n", self.display_name()),
        }
    }
}

fn render(cli: &Cli, node: NodeRef<'_>, path: &str) -> String {
    let name = cli.display_name();
    let branch = node.branch();

    let mut out = String::new();
    if let Some(banner) = cli.banner() {
        out.push_str(banner.trim_end());
        out.push_str("\n\n");
    }
    if let Some(version) = cli.version() {
        out.push_str(&format!("{name} {}\n\n", version.trim()));
    }
    if let Some(description) = node.description() {
        out.push_str(description.trim_end());
        out.push_str("\n\n");
    }

    let mut usage = format!("Usage: {name}{path}");
    if let Some(arg) = branch.argument() {
        usage.push_str(&format!(" <{}>", arg.name()));
    } else if !branch.commands().is_empty() {
        usage.push_str(" <command>");
    }
    if !branch.options().is_empty() {
        usage.push_str(" [options...]");
    }
    out.push_str(&usage);
    out.push('\n');

    if let Some(arg) = branch.argument()
        && let Some(description) = arg.description()
    {
        out.push_str("\nArguments:\n");
        out.push_str(&format!("  <{}>  {}\n", arg.name(), description.trim()));
    }

    if !branch.commands().is_empty() {
        out.push_str("\nCommands:\n");
        push_rows(&mut out, branch.commands().iter().map(command_row).collect());
    }

    if !branch.options().is_empty() {
        out.push_str("\nOptions:\n");
        push_rows(&mut out, branch.options().iter().map(option_row).collect());
    }

    if let Some(example) = node.example() {
        out.push_str("\nExample:\n");
        out.push_str(&format!("  {}\n", example.trim_end()));
    }

    if !branch.commands().is_empty() {
        out.push_str(&format!(
            "\nUse \"{name}{path} <command> --help\" for more information about a command.\n"
        ));
    }

    out
}

fn command_row(cmd: &Command) -> (String, String) {
    let mut help = cmd.description().unwrap_or_default().trim().to_string();
    if let Some(example) = cmd.example() {
        if !help.is_empty() {
            help.push(' ');
        }
        help.push_str(&format!("(example: {})", example.trim()));
    }
    (cmd.name().to_string(), help)
}

fn option_row(opt: &Opt) -> (String, String) {
    let mut left = format!("--{}", opt.long());
    if let Some(short) = opt.short_flag() {
        left.push_str(&format!(", -{short}"));
    }

    let mut help = opt.about().unwrap_or_default().trim().to_string();
    if opt.is_required() {
        if help.is_empty() {
            help.push_str("required");
        } else {
            help.push_str(" (required)");
        }
    }
    if let Some(default_value) = opt.default() {
        if help.is_empty() {
            help.push_str(&format!("[default: {default_value}]"));
        } else {
            help.push_str(&format!(" [default: {default_value}]"));
        }
    }
    (left, help)
}

fn push_rows(out: &mut String, rows: Vec<(String, String)>) {
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}
