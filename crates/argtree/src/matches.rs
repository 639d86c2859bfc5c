//! Result context populated while matching.

use indexmap::IndexMap;
use serde::Serialize;

/// Matched commands, argument values and option values.
///
/// Created empty for every invocation and only ever grows while the matcher
/// runs. An option that appeared without a value is present with `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matches {
    commands: Vec<String>,
    arguments: IndexMap<String, String>,
    options: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rest: Vec<String>,
}

impl Matches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visited command names, outermost first.
    pub fn commands(&self) -> &[String] {
        self.commands.as_slice()
    }

    pub fn visited_command(&self, name: &str) -> bool {
        self.commands.iter().any(|c| c == name)
    }

    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).map(|s| s.as_str())
    }

    pub fn visited_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    /// Value of an option by its long name.
    pub fn option(&self, long: &str) -> Option<&str> {
        self.options.get(long).map(|s| s.as_str())
    }

    pub fn used_option(&self, long: &str) -> bool {
        self.options.contains_key(long)
    }

    pub fn arguments(&self) -> &IndexMap<String, String> {
        &self.arguments
    }

    pub fn options(&self) -> &IndexMap<String, String> {
        &self.options
    }

    /// Tokens left over after the leaf's option pass.
    pub fn rest(&self) -> &[String] {
        self.rest.as_slice()
    }
}

impl Matches {
    pub(crate) fn push_command(&mut self, name: &str) {
        self.commands.push(name.to_string());
    }

    pub(crate) fn insert_argument(&mut self, name: &str, value: &str) {
        self.arguments.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn insert_option(&mut self, long: &str, value: &str) {
        self.options.insert(long.to_string(), value.to_string());
    }

    pub(crate) fn extend_rest(&mut self, tokens: &[String]) {
        self.rest.extend(tokens.iter().cloned());
    }
}
