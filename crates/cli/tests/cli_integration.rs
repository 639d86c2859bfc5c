use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn argtree() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argtree"))
}

fn run(args: &[&str]) -> Output {
    argtree()
        .args(args)
        .output()
        .expect("failed to run argtree")
}

fn run_match(tokens: &[&str], extra: &[&str]) -> Output {
    let grammar = fixture("gurl.json");
    argtree()
        .arg("match")
        .arg(&grammar)
        .args(extra)
        .arg("--")
        .args(tokens)
        .output()
        .expect("failed to run argtree match")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn help_works() {
    let out = run(&["--help"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    let text = stdout(&out);
    assert!(
        text.contains("Usage: argtree <command>") && text.contains("check") && text.contains("match"),
        "unexpected help output:\n{text}"
    );
}

#[test]
fn match_prints_json_context() {
    let out = run_match(&["get", "http://example.com", "-v"], &[]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&out)).expect("stdout is not JSON");
    assert_eq!(value["commands"], serde_json::json!(["get"]));
    assert_eq!(value["arguments"]["url"], "http://example.com");
    assert_eq!(value["options"]["verbose"], "");
}

#[test]
fn match_prints_text_context() {
    let out = run_match(
        &["post", "http://example.com", "-b", "body.json"],
        &["--format", "text"],
    );
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "commands: post\nargument url = http://example.com\noption --body_file = body.json\n"
    );
}

#[test]
fn contextual_help_for_grammar() {
    let out = run_match(&["post", "--help"], &[]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Post a resource"), "unexpected help:\n{text}");
    assert!(text.contains("Usage: gurl post <url>"), "unexpected help:\n{text}");
}

#[test]
fn unknown_command_fails_with_root_help() {
    let out = run_match(&["delete"], &[]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("error: unknown command: delete"), "stderr:\n{err}");
    assert!(err.contains("Usage: gurl <command>"), "stderr:\n{err}");
}

#[test]
fn invalid_url_is_rejected() {
    let out = run_match(&["get", "not-a-url"], &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(
        stderr(&out).contains("invalid value for url: not-a-url"),
        "stderr:\n{}",
        stderr(&out)
    );
}

#[test]
fn check_reports_valid_grammar() {
    let grammar = fixture("gurl.json");
    let out = argtree()
        .arg("check")
        .arg(&grammar)
        .output()
        .expect("failed to run argtree check");
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert_eq!(stdout(&out), "ok: gurl (3 commands, 0 options at root)\n");
}

#[test]
fn check_reports_structural_violations() {
    let grammar = fixture("duplicate.json");
    let out = argtree()
        .arg("check")
        .arg(&grammar)
        .output()
        .expect("failed to run argtree check");
    assert_eq!(out.status.code(), Some(2));
    assert!(
        stderr(&out).contains("duplicate command: get"),
        "stderr:\n{}",
        stderr(&out)
    );
}

#[test]
fn version_command_runs_handler() {
    let out = run(&["version"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert_eq!(stdout(&out), format!("argtree {}\n", env!("CARGO_PKG_VERSION")));
}
