//! Integration tests for the fittrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Input validation before any network traffic
//! - Logging records and rendering the refreshed dashboard
//! - Keeping drafts when the service is unreachable, and retrying them
//! - Advice fallback

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create an isolated home for one test
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// The binary with config, data and environment pointed into `home`
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fittrack"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("FITTRACK_BASE_URL")
        .env_remove("FITTRACK_TOKEN")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(home.join("data"));
    cmd
}

fn stash_path(home: &Path) -> std::path::PathBuf {
    home.join("data").join("pending_drafts.jsonl")
}

fn stash_lines(home: &Path) -> usize {
    fs::read_to_string(stash_path(home))
        .map(|s| s.lines().filter(|l| !l.trim().is_empty()).count())
        .unwrap_or(0)
}

fn dashboard_body() -> serde_json::Value {
    serde_json::json!({
        "recent_exercises": [],
        "recent_nutrition": [{
            "food_name": "Oats",
            "serving_size": 80,
            "serving_unit": "g",
            "meal_type": "breakfast",
            "macros": {"calories": 300, "protein": 10, "carbohydrates": 54, "fat": 5},
            "date": chrono::Utc::now().to_rfc3339()
        }],
        "active_goals": [{
            "type": "strength",
            "current_value": 60,
            "target_value": 100,
            "unit": "kg",
            "target_date": null,
            "created_at": "2024-01-01T00:00:00"
        }],
        "recent_progress": []
    })
}

async fn mount_dashboard(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dashboard_body()))
        .mount(server)
        .await;
}

#[test]
fn test_cli_help() {
    let home = setup_test_dir();
    cli(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Log workouts"));
}

#[test]
fn test_invalid_goal_rejected_offline() {
    let home = setup_test_dir();

    // No token configured: validation must fail before credentials matter
    cli(home.path())
        .args(["log", "goal", "--kind", "weight_loss", "--current", "90", "--target", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target_value"));

    assert!(!stash_path(home.path()).exists());
}

#[test]
fn test_exercise_without_name_rejected() {
    let home = setup_test_dir();
    cli(home.path())
        .args(["log", "exercise", "--kind", "cardio", "--duration", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("`name`"));
}

#[test]
fn test_non_numeric_sets_rejected() {
    let home = setup_test_dir();
    cli(home.path())
        .args(["log", "exercise", "--name", "Squat", "--kind", "strength", "--sets", "three"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sets"));
}

#[test]
fn test_missing_token_is_reported() {
    let home = setup_test_dir();
    cli(home.path())
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("FITTRACK_TOKEN"));
}

#[test]
fn test_unknown_insight_category() {
    let home = setup_test_dir();
    cli(home.path())
        .args(["--token", "t", "insights", "--category", "sleep"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("category"));
}

#[test]
fn test_unreachable_service_keeps_draft() {
    let home = setup_test_dir();

    cli(home.path())
        .args(["--base-url", "http://127.0.0.1:9/api", "--token", "t"])
        .args(["log", "meal", "--food", "Rice", "--serving-size", "150", "--meal", "lunch"])
        .args(["--calories", "200"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fittrack retry"));

    assert_eq!(stash_lines(home.path()), 1);

    cli(home.path())
        .args(["retry", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nutrition entry"));
}

#[test]
fn test_retry_with_empty_stash() {
    let home = setup_test_dir();
    cli(home.path())
        .arg("retry")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved drafts."));
}

#[test]
fn test_corrupted_stash_lines_tolerated() {
    let home = setup_test_dir();
    let stash = stash_path(home.path());
    fs::create_dir_all(stash.parent().unwrap()).unwrap();
    fs::write(&stash, "{ this is not json\n\n").unwrap();

    cli(home.path())
        .args(["retry", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved drafts."));
}

#[test]
fn test_init_config_refuses_to_overwrite() {
    let home = setup_test_dir();
    let config_path = home.path().join("fittrack.toml");

    cli(home.path())
        .arg("init-config")
        .arg("--path")
        .arg(&config_path)
        .assert()
        .success();

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("base_url"));
    assert!(contents.contains("recent_exercises = 5"));

    cli(home.path())
        .arg("init-config")
        .arg("--path")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_log_progress_then_dashboard_json() {
    let server = MockServer::start().await;
    mount_dashboard(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/progress"))
        .and(body_partial_json(serde_json::json!({
            "metric_type": "weight",
            "value": 81.2,
            "unit": "kg"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let home = setup_test_dir();
    let output = cli(home.path())
        .arg("--base-url")
        .arg(format!("{}/api", server.uri()))
        .args(["--token", "test-token", "--json"])
        .args(["log", "progress", "--metric", "weight", "--value", "81.2"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["daily_macros"]["calories"], 300.0);
    assert_eq!(snapshot["daily_macros"]["carbs"], 54.0);
    assert_eq!(snapshot["active_goals"][0]["progress_ratio"], 0.6);
    assert_eq!(stash_lines(home.path()), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_retry_submits_stashed_drafts() {
    let home = setup_test_dir();

    // Stash a draft against a dead endpoint first
    cli(home.path())
        .args(["--base-url", "http://127.0.0.1:9/api", "--token", "t"])
        .args(["log", "exercise", "--name", "Run", "--kind", "cardio", "--duration", "30"])
        .assert()
        .failure();
    assert_eq!(stash_lines(home.path()), 1);

    let server = MockServer::start().await;
    mount_dashboard(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/exercises"))
        .and(body_partial_json(serde_json::json!({
            "name": "Run",
            "type": "cardio",
            "duration": 30
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    cli(home.path())
        .arg("--base-url")
        .arg(format!("{}/api", server.uri()))
        .args(["--token", "test-token", "retry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Submitted exercise"));

    assert_eq!(stash_lines(home.path()), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_insights_fall_back_when_service_fails() {
    let server = MockServer::start().await;
    mount_dashboard(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/ai/insights"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model offline"))
        .mount(&server)
        .await;

    let home = setup_test_dir();
    cli(home.path())
        .arg("--base-url")
        .arg(format!("{}/api", server.uri()))
        .args(["--token", "test-token", "insights", "--category", "nutrition"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unable to generate insights at this time"));
}

async fn mount_failing_dashboard(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(ResponseTemplate::new(503).set_body_string("refresh down"))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_refresh_after_write_does_not_keep_draft() {
    let server = MockServer::start().await;
    mount_failing_dashboard(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let home = setup_test_dir();
    cli(home.path())
        .arg("--base-url")
        .arg(format!("{}/api", server.uri()))
        .args(["--token", "test-token"])
        .args(["log", "progress", "--metric", "weight", "--value", "81.2"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Progress sample logged"))
        .stderr(predicate::str::contains("Record saved"))
        .stderr(predicate::str::contains("fittrack retry").not());

    assert_eq!(stash_lines(home.path()), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_retry_clears_draft_when_only_refresh_fails() {
    let home = setup_test_dir();

    cli(home.path())
        .args(["--base-url", "http://127.0.0.1:9/api", "--token", "t"])
        .args(["log", "progress", "--metric", "body_fat", "--value", "18"])
        .assert()
        .failure();
    assert_eq!(stash_lines(home.path()), 1);

    let server = MockServer::start().await;
    mount_failing_dashboard(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    cli(home.path())
        .arg("--base-url")
        .arg(format!("{}/api", server.uri()))
        .args(["--token", "test-token", "retry"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Submitted progress sample"))
        .stderr(predicate::str::contains("Record saved"));

    assert_eq!(stash_lines(home.path()), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_day_totals_are_positive_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let home = setup_test_dir();
    let output = cli(home.path())
        .arg("--base-url")
        .arg(format!("{}/api", server.uri()))
        .args(["--token", "test-token", "--json", "dashboard"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("-0"), "{stdout}");
    assert!(stdout.contains(r#""calories": 0.0"#), "{stdout}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_text_dashboard_shows_daily_targets() {
    let server = MockServer::start().await;
    mount_dashboard(&server).await;

    let home = setup_test_dir();
    cli(home.path())
        .arg("--base-url")
        .arg(format!("{}/api", server.uri()))
        .args(["--token", "test-token", "dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("300 / 2000"))
        .stdout(predicate::str::contains(" 15%"))
        .stdout(predicate::str::contains("-0").not());
}
