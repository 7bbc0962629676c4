//! Binary-level tests for the JSON response boundary
//!
//! Runs the real executable and checks the document written to stdout:
//! empty queries produce an empty item list, and failures surface as a
//! single error item instead of a non-zero exit.

use std::process::Command;

use serde_json::Value;

/// Runs the CLI with a scrubbed environment and captures its output
fn run_cli(args: &[&str], envs: &[(&str, &str)]) -> std::process::Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lexifetch"));
    command
        .args(args)
        .env_remove("cachedir")
        .env_remove("cache_timeout")
        .env_remove("cache_eviction")
        .env_remove("proxy")
        .env_remove("mw_api_key");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("Failed to execute lexifetch")
}

fn stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|err| panic!("stdout is not JSON ({err}): {stdout}"))
}

#[test]
fn test_help_mentions_subcommands() {
    let output = run_cli(&["--help"], &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("define"));
    assert!(stdout.contains("translate"));
    assert!(stdout.contains("slang"));
    assert!(stdout.contains("play"));
}

#[test]
fn test_empty_define_query_yields_empty_items() {
    let output = run_cli(&["define"], &[]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        r#"{"items":[]}"#,
        "Empty query should produce an empty item list with no trailing newline"
    );
}

#[test]
fn test_empty_slang_query_yields_empty_items() {
    let output = run_cli(&["slang"], &[]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!({"items": []}));
}

#[test]
fn test_empty_translate_query_yields_empty_items() {
    let output = run_cli(&["translate", "en"], &[]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!({"items": []}));
}

#[test]
fn test_missing_api_key_renders_error_item() {
    let output = run_cli(&["define", "hello"], &[]);
    assert!(output.status.success(), "Errors render as items, not exits");

    let json = stdout_json(&output);
    let item = &json["items"][0];
    assert_eq!(item["title"], "Error occurs: MissingCredential");
    assert!(item["subtitle"]
        .as_str()
        .expect("Subtitle expected")
        .starts_with("Message: "));
    assert_eq!(item["valid"], false);
    assert_eq!(item["icon"]["path"], "error-icon.png");
}

#[test]
fn test_unsupported_language_renders_config_error_item() {
    let output = run_cli(&["translate", "fr", "bonjour"], &[]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["items"][0]["title"], "Error occurs: ConfigError");
}

#[test]
fn test_malformed_timeout_env_renders_config_error_item() {
    let output = run_cli(&["slang", "yeet"], &[("cache_timeout", "10 parsecs")]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let item = &json["items"][0];
    assert_eq!(item["title"], "Error occurs: ConfigError");
    assert!(item["subtitle"]
        .as_str()
        .expect("Subtitle expected")
        .contains("10 parsecs"));
}
