//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_teamroom"))
        .args(args)
        .env("TEAMROOM_DATA_DIR", data_dir)
        .env_remove("TEAMROOM_ENV")
        .env_remove("TEAMROOM_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_vote_requires_user_name() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["poker", "vote", "5"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("poker user set"), "stderr: {stderr}");
}

#[test]
fn test_poker_round() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_cli(dir.path(), &["poker", "user", "set", "alice"]).0, 0);
    assert_eq!(run_cli(dir.path(), &["poker", "vote", "5"]).0, 0);

    let results = run_json(dir.path(), &["poker", "results", "--json"]);
    assert_eq!(results["success"], true);
    assert_eq!(results["data"]["view"], "results");
    assert_eq!(results["data"]["votes"][0]["userName"], "alice");
    assert_eq!(results["data"]["votes"][0]["value"], 5);
    assert_eq!(results["data"]["summary"]["stats"]["median"], 5.0);

    let (code, stdout, _) = run_cli(dir.path(), &["poker", "reset"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("cleared 1 vote"));

    let status = run_json(dir.path(), &["poker", "status", "--json"]);
    assert_eq!(status["data"]["votes"].as_array().unwrap().len(), 0);
    assert_eq!(status["data"]["users"][0]["userName"], "alice");
    assert!(status["data"]["summary"].get("stats").map_or(true, |s| s.is_null()));
}

#[test]
fn test_unsure_vote_shown_but_not_counted() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["poker", "user", "set", "bob"]);
    assert_eq!(run_cli(dir.path(), &["poker", "vote", "?"]).0, 0);

    let results = run_json(dir.path(), &["poker", "results", "--json"]);
    assert_eq!(results["data"]["votes"][0]["value"], "?");
    assert_eq!(results["data"]["summary"]["unsureCount"], 1);
    assert!(results["data"]["summary"]["stats"].is_null());
}

#[test]
fn test_card_outside_deck_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["poker", "user", "set", "carol"]);
    let (code, _, stderr) = run_cli(dir.path(), &["poker", "vote", "4"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_join_by_link_marks_room_invited() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["poker", "room", "join", "https://tools.example/poker/?room=team7"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("team7"));

    let (_, stdout, _) = run_cli(dir.path(), &["poker", "room", "show"]);
    assert!(stdout.contains("room: team7 (invited)"));

    let (code, _, _) = run_cli(dir.path(), &["poker", "room", "new"]);
    assert_eq!(code, 1);
}

#[test]
fn test_new_room_changes_share_link() {
    let dir = tempfile::tempdir().unwrap();
    let (_, first, _) = run_cli(dir.path(), &["poker", "room", "link"]);
    assert!(first.starts_with("http://localhost:5173/planning-poker/?room="));

    assert_eq!(run_cli(dir.path(), &["poker", "room", "new"]).0, 0);
    let (_, second, _) = run_cli(dir.path(), &["poker", "room", "link"]);
    assert_ne!(first, second);
}

#[test]
fn test_watch_stops_after_ticks() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["poker", "user", "set", "dave"]);
    let (code, stdout, _) = run_cli(dir.path(), &["poker", "watch", "--ticks", "1"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[ ] dave (you)"));
}

#[test]
fn test_deck() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["poker", "deck"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "0 1 2 3 5 8 13 21 34 55 89 ?");
}

#[test]
fn test_retro_methods() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["retro", "methods"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().count(), 7);
}

#[test]
fn test_retro_recommend_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(
        dir.path(),
        &[
            "retro",
            "recommend",
            "--feeling",
            "frustrated",
            "--purpose",
            "solve-problems",
            "--time",
            "15-30",
            "--json",
        ],
    );
    let recs = out["data"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["method"]["key"], "kpt");
    assert_eq!(recs[0]["score"], 100);
}

#[test]
fn test_retro_recommend_rejects_unknown_feeling() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        dir.path(),
        &["retro", "recommend", "--feeling", "sleepy", "--purpose", "keep-simple"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_retro_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["retro", "sheet", "kpt"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("[KPT Retrospective Sheet]"));

    let (code, _, _) = run_cli(dir.path(), &["retro", "sheet", "starfish"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "poker.stale_after_secs"]);
    assert_eq!(stdout.trim(), "30");

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "poker.stale_after_secs", "3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("poker.stale_after_secs"), "stderr: {stderr}");

    let (code, stdout, _) = run_cli(dir.path(), &["config", "set", "retro.top_n", "2"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "retro.top_n: 3 -> 2");
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "retro.top_n"]);
    assert_eq!(stdout.trim(), "2");

    let got = run_json(dir.path(), &["config", "get", "share.base_url", "--json"]);
    assert_eq!(got["data"]["key"], "share.base_url");
    assert_eq!(got["data"]["value"], "http://localhost:5173/planning-poker/");

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "poker.nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_list() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.lines().any(|l| l == "poker.heartbeat_interval_secs = 5"));
    assert!(stdout.lines().any(|l| l == "retro.top_n = 3"));

    let listed = run_json(dir.path(), &["config", "list", "--json"]);
    assert_eq!(listed["success"], true);
    assert_eq!(listed["data"]["poker"]["stale_after_secs"], 30);

    let (code, stdout, _) = run_cli(dir.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
}

#[test]
fn test_rename_leaves_no_ghost_participant() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["poker", "user", "set", "alice"]);
    run_cli(dir.path(), &["poker", "user", "set", "bob"]);
    let status = run_json(dir.path(), &["poker", "status", "--json"]);
    let users = status["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["userName"], "bob");
}

#[test]
fn test_configured_deck_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["config", "set", "poker.deck", r#"["1","2","4","?"]"#],
    );
    assert_eq!(code, 0, "{stderr}");
    run_cli(dir.path(), &["poker", "user", "set", "erin"]);
    assert_eq!(run_cli(dir.path(), &["poker", "vote", "4"]).0, 0);
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("teamroom"));
}
