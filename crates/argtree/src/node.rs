//! Grammar tree: commands, arguments and options.
//!
//! Nodes are immutable once built. Children are attached already built, and
//! each `build()` checks the rules for its own level, so a built [`Cli`] is a
//! valid tree and needs no further checks at match time.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::cli::Cli;
use crate::error::{BuildError, Violation};
use crate::matches::Matches;

pub(crate) const HELP_LONG: &str = "--help";
pub(crate) const HELP_SHORT: &str = "-h";

type HandlerFn = dyn Fn(&Matches) -> anyhow::Result<()> + Send + Sync;
type PredicateFn = dyn Fn(&str) -> bool + Send + Sync;

/// Callback run when matching ends on the node that owns it.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Matches) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, matches: &Matches) -> anyhow::Result<()> {
        (self.0)(matches)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// Predicate over a raw token value.
#[derive(Clone)]
pub struct Validator {
    check: Arc<PredicateFn>,
    pattern: Option<String>,
}

impl Validator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(f),
            pattern: None,
        }
    }

    /// Accept values the regex matches anywhere (anchor it for whole-value checks).
    pub fn regex(re: Regex) -> Self {
        let pattern = re.as_str().to_string();
        Self {
            check: Arc::new(move |value| re.is_match(value)),
            pattern: Some(pattern),
        }
    }

    pub fn is_valid(&self, value: &str) -> bool {
        (self.check)(value)
    }

    /// Source pattern when built from a regex.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
}

impl From<Regex> for Validator {
    fn from(re: Regex) -> Self {
        Self::regex(re)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Some(p) => write!(f, "Validator({p:?})"),
            None => f.write_str("Validator(..)"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) enum Children {
    #[default]
    Leaf,
    Argument(Box<Argument>),
    Commands(Vec<Command>),
}

/// Child shape shared by the root, commands and arguments.
///
/// Holds either a single argument or a command set (never both), the options
/// scanned when this node is a leaf, and the optional handler.
#[derive(Debug, Clone, Default)]
pub struct Branch {
    pub(crate) children: Children,
    options: Vec<Opt>,
    handler: Option<Handler>,
}

impl Branch {
    pub fn argument(&self) -> Option<&Argument> {
        match &self.children {
            Children::Argument(arg) => Some(arg),
            _ => None,
        }
    }

    pub fn commands(&self) -> &[Command] {
        match &self.children {
            Children::Commands(cmds) => cmds.as_slice(),
            _ => &[],
        }
    }

    pub fn options(&self) -> &[Opt] {
        self.options.as_slice()
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.children, Children::Leaf)
    }
}

/// A literal subcommand token.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    description: Option<String>,
    example: Option<String>,
    branch: Branch,
}

impl Command {
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            description: None,
            example: None,
            branch: BranchBuilder::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    pub fn branch(&self) -> &Branch {
        &self.branch
    }
}

/// A positional value stored under `name`.
#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    description: Option<String>,
    example: Option<String>,
    validator: Option<Validator>,
    branch: Branch,
}

impl Argument {
    pub fn builder(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder {
            name: name.into(),
            description: None,
            example: None,
            validator: None,
            branch: BranchBuilder::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    pub fn branch(&self) -> &Branch {
        &self.branch
    }
}

/// A flag written as `--long [value]` or `-c [value]`.
///
/// `required` and `default_value` are help metadata; the matcher neither
/// enforces the one nor back-fills the other.
#[derive(Debug, Clone)]
pub struct Opt {
    long: String,
    short: Option<char>,
    default_value: Option<String>,
    required: bool,
    description: Option<String>,
    validator: Option<Validator>,
}

impl Opt {
    /// Leading dashes in `long` are dropped, so `"verbose"` and `"--verbose"` are the same option.
    pub fn new(long: impl Into<String>) -> Self {
        let long: String = long.into();
        Self {
            long: normalize_long(&long),
            short: None,
            default_value: None,
            required: false,
            description: None,
            validator: None,
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validator(mut self, validator: impl Into<Validator>) -> Self {
        self.validator = Some(validator.into());
        self
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn short_flag(&self) -> Option<char> {
        self.short
    }

    pub fn default(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn about(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value_validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Whether `token` is this option's `--long` or `-c` form.
    pub fn matches_flag(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            return long == self.long;
        }
        let Some(short) = self.short else {
            return false;
        };
        let mut chars = token.chars();
        chars.next() == Some('-') && chars.next() == Some(short) && chars.next().is_none()
    }
}

fn normalize_long(raw: &str) -> String {
    raw.trim().trim_start_matches('-').to_string()
}

/// A borrowed node a help request can point at.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'t> {
    Root(&'t Cli),
    Command(&'t Command),
    Argument(&'t Argument),
}

impl<'t> NodeRef<'t> {
    /// Token name of the node; the root has none.
    pub fn name(&self) -> Option<&'t str> {
        match self {
            Self::Root(_) => None,
            Self::Command(c) => Some(c.name()),
            Self::Argument(a) => Some(a.name()),
        }
    }

    pub fn description(&self) -> Option<&'t str> {
        match self {
            Self::Root(cli) => cli.description(),
            Self::Command(c) => c.description(),
            Self::Argument(a) => a.description(),
        }
    }

    pub fn example(&self) -> Option<&'t str> {
        match self {
            Self::Root(cli) => cli.example(),
            Self::Command(c) => c.example(),
            Self::Argument(a) => a.example(),
        }
    }

    pub fn branch(&self) -> &'t Branch {
        match self {
            Self::Root(cli) => cli.branch(),
            Self::Command(c) => c.branch(),
            Self::Argument(a) => a.branch(),
        }
    }
}

/// Signal that the user asked for help at some depth.
///
/// `path` is the space-prefixed invocation up to and including `node`,
/// e.g. `" foo bar"`; it is empty when help was asked for at the root.
#[derive(Debug, Clone)]
pub struct HelpRequest<'t> {
    node: NodeRef<'t>,
    path: String,
}

impl<'t> HelpRequest<'t> {
    pub(crate) fn at(node: NodeRef<'t>) -> Self {
        let path = match node.name() {
            Some(name) => format!(" {name}"),
            None => String::new(),
        };
        Self { node, path }
    }

    /// Prepend an enclosing node's name while unwinding.
    pub(crate) fn prefixed(mut self, name: &str) -> Self {
        self.path.insert_str(0, name);
        self.path.insert(0, ' ');
        self
    }

    pub fn node(&self) -> NodeRef<'t> {
        self.node
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Node names along the path, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split_whitespace()
    }
}

#[derive(Debug)]
enum Child {
    Command(Command),
    Argument(Argument),
}

/// Children, options and handler collected before validation.
#[derive(Debug, Default)]
pub(crate) struct BranchBuilder {
    children: Vec<Child>,
    options: Vec<Opt>,
    handler: Option<Handler>,
}

impl BranchBuilder {
    pub(crate) fn command(&mut self, command: Command) {
        self.children.push(Child::Command(command));
    }

    pub(crate) fn argument(&mut self, argument: Argument) {
        self.children.push(Child::Argument(argument));
    }

    pub(crate) fn option(&mut self, option: Opt) {
        self.options.push(option);
    }

    pub(crate) fn handler(&mut self, handler: Handler) {
        self.handler = Some(handler);
    }

    /// Check children in attachment order, then options.
    pub(crate) fn finish(self, violations: &mut Vec<Violation>) -> Branch {
        let mut commands: Vec<Command> = Vec::new();
        let mut argument: Option<Argument> = None;

        for child in self.children {
            match child {
                Child::Command(cmd) => {
                    if argument.is_some() {
                        violations.push(Violation::MixedArgumentAndCommands(cmd.name.clone()));
                        continue;
                    }
                    if commands.iter().any(|c| c.name == cmd.name) {
                        violations.push(Violation::DuplicateCommand(cmd.name.clone()));
                        continue;
                    }
                    commands.push(cmd);
                }
                Child::Argument(arg) => {
                    if !commands.is_empty() {
                        violations.push(Violation::MixedArgumentAndCommands(arg.name.clone()));
                        continue;
                    }
                    if argument.is_some() {
                        violations.push(Violation::MultipleArguments(arg.name.clone()));
                        continue;
                    }
                    argument = Some(arg);
                }
            }
        }

        check_options(&self.options, violations);

        let children = match (argument, commands.is_empty()) {
            (Some(arg), _) => Children::Argument(Box::new(arg)),
            (None, false) => Children::Commands(commands),
            (None, true) => Children::Leaf,
        };

        Branch {
            children,
            options: self.options,
            handler: self.handler,
        }
    }
}

fn check_options(options: &[Opt], violations: &mut Vec<Violation>) {
    let mut longs: HashSet<&str> = HashSet::new();
    let mut shorts: HashSet<char> = HashSet::new();

    for opt in options {
        if opt.long.is_empty() {
            violations.push(Violation::EmptyName("option"));
            continue;
        }
        if opt.matches_flag(HELP_LONG) || opt.matches_flag(HELP_SHORT) {
            violations.push(Violation::ReservedHelp(opt.long.clone()));
        }
        if !longs.insert(opt.long.as_str()) {
            violations.push(Violation::DuplicateOption(opt.long.clone()));
        }
        if let Some(short) = opt.short
            && !shorts.insert(short)
        {
            violations.push(Violation::DuplicateShort(short));
        }
    }
}

fn check_name(name: &str, kind: &'static str, violations: &mut Vec<Violation>) {
    if name.trim().is_empty() {
        violations.push(Violation::EmptyName(kind));
    }
}

pub struct CommandBuilder {
    name: String,
    description: Option<String>,
    example: Option<String>,
    branch: BranchBuilder,
}

impl CommandBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&Matches) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.branch.handler(Handler::new(f));
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.branch.command(command);
        self
    }

    pub fn argument(mut self, argument: Argument) -> Self {
        self.branch.argument(argument);
        self
    }

    pub fn option(mut self, option: Opt) -> Self {
        self.branch.option(option);
        self
    }

    pub fn build(self) -> Result<Command, BuildError> {
        let mut violations = Vec::new();
        check_name(&self.name, "command", &mut violations);
        let branch = self.branch.finish(&mut violations);
        if !violations.is_empty() {
            return Err(BuildError::new(format!("command '{}'", self.name), violations));
        }
        Ok(Command {
            name: self.name,
            description: self.description,
            example: self.example,
            branch,
        })
    }
}

pub struct ArgumentBuilder {
    name: String,
    description: Option<String>,
    example: Option<String>,
    validator: Option<Validator>,
    branch: BranchBuilder,
}

impl ArgumentBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn validator(mut self, validator: impl Into<Validator>) -> Self {
        self.validator = Some(validator.into());
        self
    }

    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&Matches) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.branch.handler(Handler::new(f));
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.branch.command(command);
        self
    }

    pub fn argument(mut self, argument: Argument) -> Self {
        self.branch.argument(argument);
        self
    }

    pub fn option(mut self, option: Opt) -> Self {
        self.branch.option(option);
        self
    }

    pub fn build(self) -> Result<Argument, BuildError> {
        let mut violations = Vec::new();
        check_name(&self.name, "argument", &mut violations);
        let branch = self.branch.finish(&mut violations);
        if !violations.is_empty() {
            return Err(BuildError::new(format!("argument '{}'", self.name), violations));
        }
        Ok(Argument {
            name: self.name,
            description: self.description,
            example: self.example,
            validator: self.validator,
            branch,
        })
    }
}
