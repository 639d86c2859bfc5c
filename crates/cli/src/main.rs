mod grammar;
mod report;

use anyhow::Result;
use argtree::{Argument, ArgumentBuilder, Cli, Command, Opt, Outcome};
use regex::Regex;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

use crate::grammar::{load_grammar, split_input};
use crate::report::{Format, render_matches};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let (own, input) = split_input(&argv);
    let probe = probe_cli()?;

    let m = match probe.run_with(own.iter().cloned()) {
        Ok(Outcome::Matched(m)) => m,
        Ok(Outcome::Help(req)) => {
            print!("{}", probe.help(&req));
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            eprintln!("error: {err}\n");
            eprint!("{}", probe.root_help());
            return Ok(ExitCode::from(1));
        }
    };

    // `version` prints from its handler.
    let Some(grammar_path) = m.argument("grammar") else {
        return Ok(ExitCode::SUCCESS);
    };
    let cli = load_grammar(Path::new(grammar_path))?;

    if m.visited_command("check") {
        println!(
            "ok: {} ({} commands, {} options at root)",
            cli.display_name(),
            cli.branch().commands().len(),
            cli.branch().options().len()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let format = Format::from_option(m.option("format"));
    tracing::debug!(tokens = input.len(), ?format, "matching grammar input");
    match cli.run_with(input.iter().cloned()) {
        Ok(Outcome::Matched(found)) => {
            print!("{}", render_matches(&found, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::Help(req)) => {
            print!("{}", cli.help(&req));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("error: {err}\n");
            eprint!("{}", cli.root_help());
            Ok(ExitCode::from(1))
        }
    }
}

fn grammar_argument() -> Result<ArgumentBuilder> {
    Ok(Argument::builder("grammar")
        .description("Path to a JSON grammar")
        .validator(Regex::new(r"\.json$")?))
}

/// The probe's own grammar, matched by the same engine it exposes.
fn probe_cli() -> Result<Cli> {
    let check = Command::builder("check")
        .description("Build a grammar and report structural violations")
        .example("argtree check gurl.json")
        .argument(grammar_argument()?.build()?)
        .build()?;

    let matched = Command::builder("match")
        .description("Match tokens after `--` against a grammar")
        .example("argtree match gurl.json --format text -- get http://example.com")
        .argument(
            grammar_argument()?
                .option(
                    Opt::new("format")
                        .short('f')
                        .default_value("json")
                        .description("Output format: json or text")
                        .validator(Regex::new("^(json|text)$")?),
                )
                .build()?,
        )
        .build()?;

    let version = Command::builder("version")
        .description("Print the version")
        .handler(|_| {
            println!("argtree {VERSION}");
            Ok(())
        })
        .build()?;

    Ok(Cli::builder()
        .name("argtree")
        .version(VERSION)
        .description("Probe JSON grammars with the argtree matcher")
        .command(check)
        .command(matched)
        .command(version)
        .build()?)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
