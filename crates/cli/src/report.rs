use anyhow::{Context, Result};
use argtree::Matches;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Text,
}

impl Format {
    /// An option given without a value falls back to JSON.
    pub fn from_option(raw: Option<&str>) -> Self {
        match raw {
            Some("text") => Self::Text,
            _ => Self::Json,
        }
    }
}

pub fn render_matches(m: &Matches, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut out =
                serde_json::to_string_pretty(m).context("failed to serialize matches")?;
            out.push('\n');
            Ok(out)
        }
        Format::Text => Ok(render_text(m)),
    }
}

fn render_text(m: &Matches) -> String {
    let mut out = String::new();
    if !m.commands().is_empty() {
        out.push_str(&format!("commands: {}\n", m.commands().join(" ")));
    }
    for (name, value) in m.arguments() {
        out.push_str(&format!("argument {name} = {value}\n"));
    }
    for (name, value) in m.options() {
        if value.is_empty() {
            out.push_str(&format!("option --{name}\n"));
        } else {
            out.push_str(&format!("option --{name} = {value}\n"));
        }
    }
    if !m.rest().is_empty() {
        out.push_str(&format!("rest: {}\n", m.rest().join(" ")));
    }
    out
}
