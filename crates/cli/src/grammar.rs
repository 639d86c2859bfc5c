use anyhow::{Context, Result};
use argtree::{Cli, GrammarSchema};
use std::fs;
use std::path::Path;

pub fn load_grammar(path: &Path) -> Result<Cli> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read grammar: {}", path.display()))?;
    let schema = GrammarSchema::from_json(&contents)
        .with_context(|| format!("failed to parse grammar: {}", path.display()))?;
    let cli = schema
        .build()
        .with_context(|| format!("invalid grammar: {}", path.display()))?;

    tracing::debug!(grammar = %path.display(), program = cli.display_name(), "loaded grammar");
    Ok(cli)
}

/// Split argv at the first `--`: the probe's own tokens, then the grammar input.
pub fn split_input(argv: &[String]) -> (&[String], &[String]) {
    match argv.iter().position(|a| a == "--") {
        Some(idx) => (&argv[..idx], &argv[idx + 1..]),
        None => (argv, &argv[argv.len()..]),
    }
}

#[cfg(test)]
mod tests {
    use super::split_input;

    fn argv(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_at_first_separator() {
        let a = argv(&["match", "g.json", "--", "get", "--", "x"]);
        let (own, input) = split_input(&a);
        assert_eq!(own, &a[..2]);
        assert_eq!(input, &a[3..]);
    }

    #[test]
    fn no_separator_means_no_input() {
        let a = argv(&["check", "g.json"]);
        let (own, input) = split_input(&a);
        assert_eq!(own, a.as_slice());
        assert!(input.is_empty());
    }
}
