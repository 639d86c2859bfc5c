use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use argtree::{Argument, Cli, Command, Error, Matches, NodeRef, Opt, Outcome, Violation};
use regex::Regex;

type CountingHandler = Box<dyn Fn(&Matches) -> anyhow::Result<()> + Send + Sync>;

fn counter() -> (Arc<AtomicUsize>, CountingHandler) {
    let calls = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&calls);
    let handler: CountingHandler = Box::new(move |_: &Matches| {
        inner.fetch_add(1, Ordering::SeqCst);
        Ok::<(), anyhow::Error>(())
    });
    (calls, handler)
}

fn gurl() -> Cli {
    Cli::builder()
        .name("gurl")
        .command(
            Command::builder("get")
                .argument(Argument::builder("url").build().unwrap())
                .build()
                .unwrap(),
        )
        .command(Command::builder("version").build().unwrap())
        .build()
        .unwrap()
}

#[test]
fn mixing_argument_and_commands_fails_at_build_time() {
    let err = Command::builder("test")
        .command(Command::builder("sub").build().unwrap())
        .argument(Argument::builder("arg").build().unwrap())
        .build()
        .unwrap_err();
    assert_eq!(
        err.violations(),
        [Violation::MixedArgumentAndCommands("arg".to_string())]
    );

    let err = Cli::builder()
        .command(Command::builder("sub").build().unwrap())
        .command(Command::builder("sub").build().unwrap())
        .build()
        .unwrap_err();
    assert_eq!(err.violations(), [Violation::DuplicateCommand("sub".to_string())]);
}

#[test]
fn first_literal_match_wins() {
    let (a_calls, a_handler) = counter();
    let (b_calls, b_handler) = counter();
    let cli = Cli::builder()
        .command(Command::builder("a").handler(a_handler).build().unwrap())
        .command(Command::builder("b").handler(b_handler).build().unwrap())
        .build()
        .unwrap();

    let m = cli.run_with(["b"]).unwrap().into_matches().unwrap();
    assert_eq!(m.commands(), ["b".to_string()]);
    assert_eq!(a_calls.load(Ordering::SeqCst), 0);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn help_path_is_rebuilt_through_nested_commands() {
    let (calls, handler) = counter();
    let cli = Cli::builder()
        .command(
            Command::builder("foo")
                .command(Command::builder("bar").handler(handler).build().unwrap())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let outcome = cli.run_with(["foo", "bar", "--help"]).unwrap();
    let Outcome::Help(req) = outcome else {
        panic!("expected help");
    };
    assert_eq!(req.path(), " foo bar");
    match req.node() {
        NodeRef::Command(cmd) => assert_eq!(cmd.name(), "bar"),
        other => panic!("expected command node, got: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn validator_gates_argument_values() {
    let cli = Cli::builder()
        .argument(
            Argument::builder("version")
                .validator(Regex::new(r"^v[0-9]+$").unwrap())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let m = cli.run_with(["v1"]).unwrap().into_matches().unwrap();
    assert_eq!(m.argument("version"), Some("v1"));

    match cli.run_with(["invalid"]) {
        Err(Error::InvalidValue { on, value }) => {
            assert_eq!(on, "version");
            assert_eq!(value, "invalid");
        }
        other => panic!("expected InvalidValue, got: {other:?}"),
    }
}

#[test]
fn help_wins_over_validation() {
    let cmd = Command::builder("release")
        .argument(
            Argument::builder("version")
                .validator(Regex::new(r"^v[0-9]+$").unwrap())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let cli = Cli::builder().command(cmd).build().unwrap();

    // Peeked by the command before its argument is tried.
    let outcome = cli.run_with(["release", "--help"]).unwrap();
    assert_eq!(outcome.help().unwrap().path(), " release");

    let nested = Cli::builder()
        .argument(
            Argument::builder("channel")
                .argument(
                    Argument::builder("version")
                        .validator(Regex::new(r"^v[0-9]+$").unwrap())
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let outcome = nested.run_with(["stable", "--help"]).unwrap();
    let req = outcome.help().unwrap();
    assert_eq!(req.path(), " channel version");
    assert_eq!(req.node().name(), Some("version"));
}

#[test]
fn end_to_end_get_and_version() {
    let cli = gurl();

    let m = cli
        .run_with(["get", "http://x.test"])
        .unwrap()
        .into_matches()
        .unwrap();
    assert_eq!(m.commands(), ["get".to_string()]);
    assert_eq!(m.argument("url"), Some("http://x.test"));
    assert_eq!(m.arguments().len(), 1);

    match cli.run_with(["nope"]) {
        Err(Error::UnknownCommand(token)) => assert_eq!(token, "nope"),
        other => panic!("expected UnknownCommand, got: {other:?}"),
    }

    assert!(matches!(
        cli.run_with(Vec::<String>::new()),
        Err(Error::UnexpectedEndOfInput)
    ));

    assert!(matches!(
        cli.run_with(["get"]),
        Err(Error::UnexpectedEndOfInput)
    ));
}

fn options_cli() -> Cli {
    Cli::builder()
        .command(
            Command::builder("cmd")
                .option(Opt::new("aa"))
                .option(Opt::new("opt"))
                .option(Opt::new("bb").short('b'))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[test]
fn options_match_in_declaration_order() {
    let m = options_cli()
        .run_with(["cmd", "--opt", "v", "-b", "v2"])
        .unwrap()
        .into_matches()
        .unwrap();
    let options: Vec<(&str, &str)> = m
        .options()
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(options, [("opt", "v"), ("bb", "v2")]);
    assert!(m.rest().is_empty());
}

#[test]
fn option_pass_does_not_revisit_earlier_declarations() {
    let m = options_cli()
        .run_with(["cmd", "-b", "v2", "--opt", "v"])
        .unwrap()
        .into_matches()
        .unwrap();
    assert_eq!(m.option("bb"), Some("v2"));
    assert!(!m.used_option("opt"));
    assert_eq!(m.rest(), ["--opt".to_string(), "v".to_string()]);
}

#[test]
fn repeated_flag_matches_first_occurrence_only() {
    let m = options_cli()
        .run_with(["cmd", "--opt", "a", "--opt", "b"])
        .unwrap()
        .into_matches()
        .unwrap();
    assert_eq!(m.option("opt"), Some("a"));
    assert_eq!(m.rest(), ["--opt".to_string(), "b".to_string()]);
}

#[test]
fn dash_prefixed_token_is_not_a_value() {
    let m = options_cli()
        .run_with(["cmd", "--opt", "-b", "x"])
        .unwrap()
        .into_matches()
        .unwrap();
    assert_eq!(m.option("opt"), Some(""));
    assert_eq!(m.option("bb"), Some("x"));
}

#[test]
fn required_and_default_are_not_enforced() {
    let cli = Cli::builder()
        .option(Opt::new("token").required())
        .option(Opt::new("level").default_value("info"))
        .build()
        .unwrap();
    let m = cli.run_with(Vec::<String>::new()).unwrap().into_matches().unwrap();
    assert!(!m.used_option("token"));
    assert_eq!(m.option("level"), None);
}

#[test]
fn handler_sees_populated_context() {
    let seen: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let cli = Cli::builder()
        .command(
            Command::builder("get")
                .argument(
                    Argument::builder("url")
                        .option(Opt::new("verbose").short('v'))
                        .handler(move |m| {
                            let url = m.argument("url").unwrap_or_default();
                            let line = format!("{url} {}", m.used_option("verbose"));
                            *sink.lock().unwrap() = Some(line);
                            Ok(())
                        })
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    cli.run_with(["get", "http://x.test", "-v"]).unwrap();
    assert_eq!(seen.lock().unwrap().as_deref(), Some("http://x.test true"));
}

#[test]
fn one_tree_serves_concurrent_invocations() {
    let cli = Arc::new(gurl());
    let workers: Vec<_> = (0..4)
        .map(|i| {
            let cli = Arc::clone(&cli);
            thread::spawn(move || {
                let url = format!("http://host{i}.test");
                let m = cli
                    .run_with(["get", url.as_str()])
                    .unwrap()
                    .into_matches()
                    .unwrap();
                assert_eq!(m.argument("url"), Some(url.as_str()));
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
}
