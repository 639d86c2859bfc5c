//! Root node and invocation entry points.

use tracing::debug;

use crate::cursor::Cursor;
use crate::error::{BuildError, Error, Result};
use crate::matcher::{self, Interrupt, Step};
use crate::matches::Matches;
use crate::node::{
    Argument, Branch, BranchBuilder, Command, HELP_LONG, HELP_SHORT, HelpRequest, NodeRef, Opt,
};

pub(crate) const DEFAULT_NAME: &str = "cli";

/// Result of a completed invocation.
#[derive(Debug)]
pub enum Outcome<'t> {
    /// The grammar matched and the leaf handler (if any) ran.
    Matched(Matches),
    /// The user asked for help; render it with [`Cli::help`].
    Help(HelpRequest<'t>),
}

impl<'t> Outcome<'t> {
    pub fn matches(&self) -> Option<&Matches> {
        match self {
            Self::Matched(m) => Some(m),
            Self::Help(_) => None,
        }
    }

    pub fn into_matches(self) -> Option<Matches> {
        match self {
            Self::Matched(m) => Some(m),
            Self::Help(_) => None,
        }
    }

    pub fn help(&self) -> Option<&HelpRequest<'t>> {
        match self {
            Self::Help(req) => Some(req),
            Self::Matched(_) => None,
        }
    }
}

/// The root of a grammar tree, plus program metadata used for help output.
///
/// A built `Cli` is immutable and can be shared across threads; every call to
/// [`Cli::run_with`] uses its own cursor and result context.
#[derive(Debug, Clone)]
pub struct Cli {
    name: Option<String>,
    version: Option<String>,
    banner: Option<String>,
    description: Option<String>,
    example: Option<String>,
    branch: Branch,
}

impl Cli {
    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Program name used in usage lines.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
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

    /// Match the process arguments, skipping the program name.
    pub fn run(&self) -> Result<Outcome<'_>> {
        self.run_with(std::env::args().skip(1))
    }

    /// Match `args` (without the program name) against the tree.
    pub fn run_with<I, S>(&self, args: I) -> Result<Outcome<'_>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
        debug!(program = self.display_name(), tokens = tokens.len(), "matching invocation");

        let mut cursor = Cursor::new(&tokens);
        if cursor
            .peek()
            .is_some_and(|t| t == HELP_LONG || t == HELP_SHORT)
        {
            return Ok(Outcome::Help(HelpRequest::at(NodeRef::Root(self))));
        }

        let mut matches = Matches::new();
        let step = matcher::descend(NodeRef::Root(self), &mut cursor, &mut matches);
        settle(step, matches)
    }
}

fn settle<'t>(step: Step<'t>, matches: Matches) -> Result<Outcome<'t>> {
    match step {
        Ok(()) => Ok(Outcome::Matched(matches)),
        Err(Interrupt::Help(req)) => {
            debug!(path = req.path(), "help requested");
            Ok(Outcome::Help(req))
        }
        Err(Interrupt::Failed(err)) => Err(err),
        // Sibling loops consume command misses; one reaching the root means input ran out.
        Err(Interrupt::NotMatched) => Err(Error::UnexpectedEndOfInput),
    }
}

#[derive(Debug, Default)]
pub struct CliBuilder {
    name: Option<String>,
    version: Option<String>,
    banner: Option<String>,
    description: Option<String>,
    example: Option<String>,
    branch: BranchBuilder,
}

impl CliBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

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
        self.branch.handler(crate::node::Handler::new(f));
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

    pub fn build(self) -> std::result::Result<Cli, BuildError> {
        let mut violations = Vec::new();
        let branch = self.branch.finish(&mut violations);
        if !violations.is_empty() {
            let node = match &self.name {
                Some(name) => format!("cli '{name}'"),
                None => "cli".to_string(),
            };
            return Err(BuildError::new(node, violations));
        }
        Ok(Cli {
            name: self.name,
            version: self.version,
            banner: self.banner,
            description: self.description,
            example: self.example,
            branch,
        })
    }
}
