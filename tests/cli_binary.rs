use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn run(args: &[&str], stdin: &str, cwd: &Path) -> (i32, String) {
    run_with_env(args, &[], stdin, cwd)
}

fn run_with_env(
    args: &[&str],
    envs: &[(&str, &str)],
    stdin: &str,
    cwd: &Path,
) -> (i32, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_context_statusline"));
    command
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR")
        .env_remove("STATUSLINE_CURRENCY_PREFIX")
        .env_remove("STATUSLINE_BRANCH_SOURCE")
        .env_remove("STATUSLINE_COLOR")
        .env_remove("STATUSLINE_DEBUG")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn().unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8(output.stdout).unwrap(),
    )
}

#[test]
fn end_to_end_scenario() {
    let tmp = TempDir::new().unwrap();
    let input = r#"{"model": {"display_name": "Opus"},
        "context_window": {"current_usage": {"input_tokens": 50000, "cache_creation_input_tokens": 0, "cache_read_input_tokens": 0}, "context_window_size": 100000},
        "cost": {"total_cost_usd": 0.0123},
        "workspace": {"current_dir": "/work/app"}}"#;
    let (code, out) = run(&[], input, tmp.path());
    assert_eq!(code, 0);
    assert_eq!(out, "[Opus] Context: 50% | Cost: $0.0123 | [app]\n");
}

#[test]
fn empty_and_malformed_stdin_still_print_one_line() {
    let tmp = TempDir::new().unwrap();
    for input in ["", "{oops", "42", r#"{"model": 17, "cost": "a lot"}"#] {
        let (code, out) = run(&[], input, tmp.path());
        assert_eq!(code, 0, "input {input:?}");
        assert_eq!(out, "[] Context: 0% | Cost: $0.0000 | []\n", "input {input:?}");
    }
}

#[test]
fn branch_from_workspace_dir() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("svc");
    fs::create_dir_all(repo.join(".git")).unwrap();
    fs::write(repo.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
    let input = serde_json::json!({
        "model": {"display_name": "Sonnet"},
        "workspace": {"current_dir": repo.to_string_lossy()},
    })
    .to_string();

    let (_, out) = run(&[], &input, tmp.path());
    assert_eq!(out, "[Sonnet] Context: 0% | Cost: $0.0000 | [svc] | main\n");

    let (_, out) = run(&["--branch-source", "off"], &input, tmp.path());
    assert_eq!(out, "[Sonnet] Context: 0% | Cost: $0.0000 | [svc]\n");
}

#[test]
fn currency_prefix_flag() {
    let tmp = TempDir::new().unwrap();
    let (_, out) = run(
        &["--currency-prefix", "€"],
        r#"{"cost": {"total_cost_usd": 1.5}}"#,
        tmp.path(),
    );
    assert!(out.contains("| Cost: €1.5000 |"), "got: {out}");
}

#[test]
fn json_mode_is_single_line() {
    let tmp = TempDir::new().unwrap();
    let (code, out) = run(
        &["--json"],
        r#"{"model": "Opus", "cost": {"total_cost_usd": 0}, "workspace": {"current_dir": "/w/x"}}"#,
        tmp.path(),
    );
    assert_eq!(code, 0);
    assert_eq!(out.lines().count(), 1);
    let json: Value = serde_json::from_str(out.trim_end()).unwrap();
    assert_eq!(json["cost"]["is_reported"], true);
    assert_eq!(json["cost"]["formatted"], "0.0000");
    assert_eq!(json["workspace"]["label"], "x");
    assert_eq!(json["line"], "[Opus] Context: 0% | Cost: $0.0000 | [x]");
}

#[test]
fn debug_output_stays_off_stdout() {
    let tmp = TempDir::new().unwrap();
    let (_, out) = run(&["--debug"], "{not json", tmp.path());
    assert_eq!(out, "[] Context: 0% | Cost: $0.0000 | []\n");
}

#[test]
fn numeric_env_switches_do_not_abort() {
    let tmp = TempDir::new().unwrap();
    let input = r#"{"model": "Opus", "workspace": {"current_dir": "/w/app"}}"#;
    for (key, value) in [
        ("STATUSLINE_DEBUG", "1"),
        ("STATUSLINE_DEBUG", "0"),
        ("STATUSLINE_DEBUG", "yes"),
        ("STATUSLINE_COLOR", "1"),
        ("STATUSLINE_COLOR", "off"),
    ] {
        let (code, out) = run_with_env(&[], &[(key, value)], input, tmp.path());
        assert_eq!(code, 0, "{key}={value}");
        assert_eq!(out.lines().count(), 1, "{key}={value}: {out:?}");
        assert!(out.starts_with("[Opus] Context: "), "{key}={value}: {out:?}");
    }
}

#[test]
fn zero_or_off_color_env_keeps_plain_text() {
    let tmp = TempDir::new().unwrap();
    for value in ["0", "false", "off"] {
        let (_, out) = run_with_env(&[], &[("STATUSLINE_COLOR", value)], "{}", tmp.path());
        assert_eq!(out, "[] Context: 0% | Cost: $0.0000 | []\n", "STATUSLINE_COLOR={value}");
    }
}

#[test]
fn unknown_branch_source_env_reads_head_file() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("svc");
    fs::create_dir_all(repo.join(".git")).unwrap();
    fs::write(repo.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
    let input = serde_json::json!({"workspace": {"current_dir": repo.to_string_lossy()}})
        .to_string();

    let (code, out) =
        run_with_env(&[], &[("STATUSLINE_BRANCH_SOURCE", "svn")], &input, tmp.path());
    assert_eq!(code, 0);
    assert_eq!(out, "[] Context: 0% | Cost: $0.0000 | [svc] | main\n");
}

#[test]
fn unknown_flag_still_renders_defaults() {
    let tmp = TempDir::new().unwrap();
    let (code, out) = run(
        &["--no-such-flag"],
        r#"{"model": "Opus", "cost": {"total_cost_usd": 1.5}}"#,
        tmp.path(),
    );
    assert_eq!(code, 0);
    assert_eq!(out, "[Opus] Context: 0% | Cost: $1.5000 | []\n");
}
