//! JSON description of a grammar.
//!
//! A schema builds a handler-less [`Cli`]: callers inspect the returned
//! [`Matches`](crate::Matches) instead of registering callbacks. Value
//! validators are written as regex patterns.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::error::{BuildError, Violation};
use crate::node::{Argument, Command, Opt, Validator};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse grammar JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GrammarSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<Box<ArgumentSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<Box<ArgumentSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgumentSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<Box<ArgumentSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionSchema {
    pub long: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl GrammarSchema {
    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Build the tree; children are built first so the first broken node wins.
    pub fn build(&self) -> Result<Cli, SchemaError> {
        let mut builder = Cli::builder();
        if let Some(name) = &self.name {
            builder = builder.name(name);
        }
        if let Some(version) = &self.version {
            builder = builder.version(version);
        }
        if let Some(banner) = &self.banner {
            builder = builder.banner(banner);
        }
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        if let Some(example) = &self.example {
            builder = builder.example(example);
        }
        if let Some(arg) = &self.argument {
            builder = builder.argument(arg.build()?);
        }
        for cmd in &self.commands {
            builder = builder.command(cmd.build()?);
        }
        for opt in &self.options {
            builder = builder.option(opt.build()?);
        }
        Ok(builder.build()?)
    }
}

impl CommandSchema {
    pub fn build(&self) -> Result<Command, SchemaError> {
        let mut builder = Command::builder(&self.name);
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        if let Some(example) = &self.example {
            builder = builder.example(example);
        }
        if let Some(arg) = &self.argument {
            builder = builder.argument(arg.build()?);
        }
        for cmd in &self.commands {
            builder = builder.command(cmd.build()?);
        }
        for opt in &self.options {
            builder = builder.option(opt.build()?);
        }
        Ok(builder.build()?)
    }
}

impl ArgumentSchema {
    pub fn build(&self) -> Result<Argument, SchemaError> {
        let mut builder = Argument::builder(&self.name);
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        if let Some(example) = &self.example {
            builder = builder.example(example);
        }
        if let Some(pattern) = &self.pattern {
            let node = format!("argument '{}'", self.name);
            builder = builder.validator(compile(&node, &self.name, pattern)?);
        }
        if let Some(arg) = &self.argument {
            builder = builder.argument(arg.build()?);
        }
        for cmd in &self.commands {
            builder = builder.command(cmd.build()?);
        }
        for opt in &self.options {
            builder = builder.option(opt.build()?);
        }
        Ok(builder.build()?)
    }
}

impl OptionSchema {
    pub fn build(&self) -> Result<Opt, SchemaError> {
        let mut opt = Opt::new(&self.long);
        if let Some(short) = self.short {
            opt = opt.short(short);
        }
        if let Some(default_value) = &self.default_value {
            opt = opt.default_value(default_value);
        }
        if self.required {
            opt = opt.required();
        }
        if let Some(description) = &self.description {
            opt = opt.description(description);
        }
        if let Some(pattern) = &self.pattern {
            let node = format!("option '{}'", self.long);
            opt = opt.validator(compile(&node, &self.long, pattern)?);
        }
        Ok(opt)
    }
}

fn compile(node: &str, on: &str, pattern: &str) -> Result<Validator, BuildError> {
    Regex::new(pattern).map(Validator::regex).map_err(|err| {
        BuildError::new(
            node,
            vec![Violation::InvalidPattern {
                on: on.to_string(),
                message: err.to_string(),
            }],
        )
    })
}
