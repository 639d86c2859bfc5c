//! Build-time violations and match-time failures.

use thiserror::Error;

/// A terminal matching failure, returned verbatim to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The input ended where a command, argument or value was required.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A value failed the validator of the argument or option named `on`.
    #[error("invalid value for {on}: {value}")]
    InvalidValue { on: String, value: String },

    /// The matched node's handler returned an error.
    #[error(transparent)]
    Handler(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A structural rule broken while building a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),

    /// An argument and a command set were attached to the same node.
    /// Carries the name of the child whose attachment caused the mix.
    #[error("mix of argument and command: {0}")]
    MixedArgumentAndCommands(String),

    #[error("more than one argument: {0}")]
    MultipleArguments(String),

    #[error("duplicate option: --{0}")]
    DuplicateOption(String),

    #[error("duplicate short option: -{0}")]
    DuplicateShort(char),

    /// `--help`/`-h` are intercepted before any option is tried.
    #[error("option shadows the built-in help flag: {0}")]
    ReservedHelp(String),

    #[error("empty {0} name")]
    EmptyName(&'static str),

    #[error("invalid pattern for {on}: {message}")]
    InvalidPattern { on: String, message: String },
}

/// Every violation found while building one node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {node}: {}", join_violations(.violations))]
pub struct BuildError {
    node: String,
    violations: Vec<Violation>,
}

impl BuildError {
    pub(crate) fn new(node: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            node: node.into(),
            violations,
        }
    }

    /// Display name of the node that failed to build.
    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn violations(&self) -> &[Violation] {
        self.violations.as_slice()
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
