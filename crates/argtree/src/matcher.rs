//! Recursive descent of the token cursor against the node tree.
//!
//! Every step returns `Ok(())` or an [`Interrupt`]. `NotMatched` is the soft
//! failure used to try the next sibling command and is consumed here; help
//! requests grow their path as they unwind through commands and arguments.

use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::error::Error;
use crate::matches::Matches;
use crate::node::{
    Argument, Branch, Children, Command, HELP_LONG, HELP_SHORT, HelpRequest, NodeRef, Opt,
};

#[derive(Debug)]
pub(crate) enum Interrupt<'t> {
    NotMatched,
    Help(HelpRequest<'t>),
    Failed(Error),
}

impl<'t> Interrupt<'t> {
    fn prefixed(self, name: Option<&str>) -> Self {
        match (self, name) {
            (Self::Help(req), Some(name)) => Self::Help(req.prefixed(name)),
            (other, _) => other,
        }
    }
}

impl From<Error> for Interrupt<'_> {
    fn from(err: Error) -> Self {
        Self::Failed(err)
    }
}

pub(crate) type Step<'t> = Result<(), Interrupt<'t>>;

fn is_help(token: &str) -> bool {
    token == HELP_LONG || token == HELP_SHORT
}

/// Match `node`'s children (or, at a leaf, its options and handler).
///
/// Help raised below is prefixed with `node`'s own name; the root has none.
pub(crate) fn descend<'t>(
    node: NodeRef<'t>,
    cursor: &mut Cursor<'_>,
    matches: &mut Matches,
) -> Step<'t> {
    let branch = node.branch();
    match &branch.children {
        Children::Argument(arg) => {
            match_argument(arg, cursor, matches).map_err(|i| i.prefixed(node.name()))
        }
        Children::Commands(commands) => {
            match_commands(commands, cursor, matches).map_err(|i| i.prefixed(node.name()))
        }
        Children::Leaf => finish_leaf(node, branch, cursor, matches),
    }
}

pub(crate) fn match_command<'t>(
    command: &'t Command,
    cursor: &mut Cursor<'_>,
    matches: &mut Matches,
) -> Step<'t> {
    let Some(token) = cursor.advance() else {
        return Err(Interrupt::NotMatched);
    };
    if token != command.name() {
        trace!(command = command.name(), token, "command not matched");
        cursor.rewind();
        return Err(Interrupt::NotMatched);
    }

    if cursor.peek().is_some_and(is_help) {
        return Err(Interrupt::Help(HelpRequest::at(NodeRef::Command(command))));
    }

    debug!(command = command.name(), "matched command");
    matches.push_command(command.name());
    descend(NodeRef::Command(command), cursor, matches)
}

pub(crate) fn match_argument<'t>(
    argument: &'t Argument,
    cursor: &mut Cursor<'_>,
    matches: &mut Matches,
) -> Step<'t> {
    let Some(token) = cursor.advance() else {
        return Err(Error::UnexpectedEndOfInput.into());
    };

    // Checked before validation so a validator can never reject `--help`.
    if is_help(token) {
        return Err(Interrupt::Help(HelpRequest::at(NodeRef::Argument(argument))));
    }

    if let Some(validator) = argument.validator()
        && !validator.is_valid(token)
    {
        return Err(Error::InvalidValue {
            on: argument.name().to_string(),
            value: token.to_string(),
        }
        .into());
    }

    debug!(argument = argument.name(), value = token, "matched argument");
    matches.insert_argument(argument.name(), token);
    descend(NodeRef::Argument(argument), cursor, matches)
}

/// First sibling in declaration order to match wins.
fn match_commands<'t>(
    commands: &'t [Command],
    cursor: &mut Cursor<'_>,
    matches: &mut Matches,
) -> Step<'t> {
    for command in commands {
        match match_command(command, cursor, matches) {
            Err(Interrupt::NotMatched) => continue,
            other => return other,
        }
    }

    match cursor.advance() {
        Some(token) => Err(Error::UnknownCommand(token.to_string()).into()),
        None => Err(Error::UnexpectedEndOfInput.into()),
    }
}

fn finish_leaf<'t>(
    node: NodeRef<'t>,
    branch: &'t Branch,
    cursor: &mut Cursor<'_>,
    matches: &mut Matches,
) -> Step<'t> {
    scan_options(node, branch.options(), cursor, matches)?;

    let rest = cursor.remaining();
    if !rest.is_empty() {
        debug!(count = rest.len(), "tokens left after option pass");
        matches.extend_rest(rest);
    }

    if let Some(handler) = branch.handler() {
        handler.call(matches).map_err(Error::Handler)?;
    }
    Ok(())
}

/// One left-to-right pass over the declared options.
///
/// Each option gets a single trial at the current position, so a flag that
/// appears before an earlier-declared option's flag is not revisited.
fn scan_options<'t>(
    node: NodeRef<'t>,
    options: &'t [Opt],
    cursor: &mut Cursor<'_>,
    matches: &mut Matches,
) -> Step<'t> {
    for option in options {
        match match_option(node, option, cursor, matches) {
            Ok(()) | Err(Interrupt::NotMatched) => {}
            Err(other) => return Err(other),
        }
    }
    Ok(())
}

fn match_option<'t>(
    node: NodeRef<'t>,
    option: &Opt,
    cursor: &mut Cursor<'_>,
    matches: &mut Matches,
) -> Step<'t> {
    let Some(token) = cursor.advance() else {
        return Err(Interrupt::NotMatched);
    };
    if is_help(token) {
        return Err(Interrupt::Help(HelpRequest::at(node)));
    }
    if !option.matches_flag(token) {
        trace!(option = option.long(), token, "option not matched");
        cursor.rewind();
        return Err(Interrupt::NotMatched);
    }

    // A bare flag has no value token and skips validation.
    let value = match cursor.advance() {
        Some(value) if !value.starts_with('-') => Some(value),
        Some(_) => {
            cursor.rewind();
            None
        }
        None => None,
    };

    if let Some(value) = value
        && let Some(validator) = option.value_validator()
        && !validator.is_valid(value)
    {
        return Err(Error::InvalidValue {
            on: option.long().to_string(),
            value: value.to_string(),
        }
        .into());
    }

    let value = value.unwrap_or_default();
    debug!(option = option.long(), value, "matched option");
    matches.insert_option(option.long(), value);
    Ok(())
}
