//! End-to-end runs of the command-line driver.

use core::time::Duration;
use git_recap::Host;
use serde_json::{Value, json};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            exit_code: None,
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        Cursor::new(&mut self.output_buf)
    }

    fn error(&mut self) -> impl std::io::Write {
        Cursor::new(&mut self.error_buf)
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

async fn run(args: &[&str]) -> TestHost {
    let mut host = TestHost::new();
    git_recap::run(&mut host, std::iter::once("git-recap").chain(args.iter().copied())).await;
    host
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn write_config(dir: &TempDir, server: &MockServer, report_timeout_secs: u64) -> PathBuf {
    let config_path = dir.path().join("git-recap.yaml");
    let text = format!(
        "api_url: {uri}\ngraphql_url: {uri}/graphql\npacing_delay_ms: 0\nreport_timeout_secs: {report_timeout_secs}\nretry:\n  max_attempts: 1\n  base_delay_ms: 0\n  max_delay_ms: 0\n",
        uri = server.uri()
    );
    fs::write(&config_path, text).unwrap();
    config_path
}

async fn mount_account(server: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "login": "octocat",
                    "html_url": "https://github.com/octocat",
                    "name": null,
                    "avatar_url": "https://avatars.githubusercontent.com/u/583231",
                    "bio": "hello",
                    "followers": 7,
                    "following": 1,
                    "created_at": "2011-01-25T18:44:36Z",
                }))
                .set_delay(delay),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", "author:octocat type:issue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "html_url": "https://github.com/octocat/hello/issues/1",
                "title": "Crash",
                "body": null,
                "state": "open",
                "created_at": "2024-04-01T00:00:00Z",
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", "author:octocat type:pr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "hello",
            "html_url": "https://github.com/octocat/hello",
            "description": "Hello world",
            "created_at": "2024-02-01T00:00:00Z",
            "stargazers_count": 9,
            "forks_count": 0,
            "languages_url": format!("{}/repos/octocat/hello/languages", server.uri()),
            "commits_url": format!("{}/repos/octocat/hello/commits{{/sha}}", server.uri()),
            "owner": { "login": "octocat" },
        }])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Rust": 900, "Python": 100 })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "commit": { "message": "feat: hello", "committer": { "name": "The Octocat", "date": "2024-03-05T14:00:00Z" } }, "committer": { "login": "octocat" } },
            { "commit": { "message": "Merge branch 'main'", "committer": { "name": "The Octocat", "date": "2024-03-04T14:30:00Z" } }, "committer": { "login": "octocat" } },
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/starred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_report_writes_context_to_file() {
    let server = MockServer::start().await;
    mount_account(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &server, 60);
    let output_path = dir.path().join("recap.json");

    let host = run(&[
        "report",
        "--user",
        "octocat",
        "--year",
        "2024",
        "--timezone",
        "+8",
        "--token",
        "t0ken",
        "--no-progress",
        "--config",
        path_arg(&config_path),
        "--output",
        path_arg(&output_path),
    ])
    .await;

    assert_eq!(host.exit_code, None, "stderr: {}", host.error_str());

    let context: Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(context["username"], "octocat");
    assert_eq!(context["name"], "octocat");
    assert_eq!(context["year"], 2024);
    assert_eq!(context["commits_num"], 2);
    assert_eq!(context["issues_num"], 1);
    assert_eq!(context["prs_num"], 0);
    assert_eq!(context["stars_num"], 9);
    assert_eq!(context["most_active_month"], "Mar");
    assert_eq!(context["most_active_hour"], "22:00");
    assert_eq!(context["conventional_commits_num"], 1);
    assert_eq!(context["top_3_conventional_commit_types"], json!([{ "name": "feat", "num": 1 }]));
    assert_eq!(context["top_3_most_committed_repos"], json!([{ "name": "hello", "num": 2 }]));
    assert_eq!(context["languages_num"], 2);
    assert_eq!(context["top_3_languages_used_in_new_repos"][0], json!({ "name": "Rust", "num": 900 }));
    assert_eq!(context["commits_per_day"].as_array().unwrap().len(), 366);
}

#[tokio::test]
async fn test_report_to_stdout_with_aggregates() {
    let server = MockServer::start().await;
    mount_account(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &server, 60);

    let host = run(&[
        "report",
        "-u",
        "octocat",
        "-y",
        "2024",
        "--no-progress",
        "--with-aggregates",
        "--config",
        path_arg(&config_path),
    ])
    .await;

    assert_eq!(host.exit_code, None, "stderr: {}", host.error_str());

    let report: Value = serde_json::from_str(&host.output_str()).unwrap();
    assert_eq!(report["full"]["repos_details"], json!([{ "name": "hello", "commits_num": 2 }]));
    assert_eq!(report["new_repos"]["languages_num"], json!({ "Rust": 900, "Python": 100 }));
    assert_eq!(report["context"]["commits_num"], 2);
}

#[tokio::test]
async fn test_saved_snapshot_rebuilds_the_same_report() {
    let server = MockServer::start().await;
    mount_account(&server, Duration::ZERO).await;

    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &server, 60);
    let snapshot_path = dir.path().join("snapshot.json");

    let fetched = run(&[
        "report",
        "--user",
        "octocat",
        "--year",
        "2024",
        "--timezone",
        "+8",
        "--no-progress",
        "--config",
        path_arg(&config_path),
        "--save-snapshot",
        path_arg(&snapshot_path),
    ])
    .await;
    assert_eq!(fetched.exit_code, None, "stderr: {}", fetched.error_str());
    assert!(snapshot_path.exists());

    let requests = server.received_requests().await.unwrap().len();

    // no user, config or token: everything comes from the file
    let rebuilt = run(&["report", "--year", "2024", "--from-snapshot", path_arg(&snapshot_path)]).await;
    assert_eq!(rebuilt.exit_code, None, "stderr: {}", rebuilt.error_str());
    assert_eq!(server.received_requests().await.unwrap().len(), requests);

    let fetched: Value = serde_json::from_str(&fetched.output_str()).unwrap();
    let rebuilt: Value = serde_json::from_str(&rebuilt.output_str()).unwrap();
    assert_eq!(rebuilt, fetched);
    assert_eq!(rebuilt["most_active_hour"], "22:00");
}

#[tokio::test]
async fn test_report_from_missing_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");

    let host = run(&["report", "--year", "2024", "--from-snapshot", path_arg(&missing)]).await;

    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("missing.json"), "got: {}", host.error_str());
}

#[tokio::test]
async fn test_report_requires_user_or_snapshot() {
    let host = run(&["report", "--year", "2024"]).await;

    assert_eq!(host.exit_code, Some(2));
    assert!(host.error_str().contains("--user"), "got: {}", host.error_str());
}

#[tokio::test]
async fn test_report_times_out() {
    let server = MockServer::start().await;
    mount_account(&server, Duration::from_secs(5)).await;

    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &server, 1);

    let host = run(&["report", "--user", "octocat", "--year", "2024", "--no-progress", "--config", path_arg(&config_path)]).await;

    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("timed out"), "got: {}", host.error_str());
    assert!(host.output_str().is_empty());
}

#[tokio::test]
async fn test_report_rejects_bad_timezone() {
    let host = run(&["report", "--user", "octocat", "--timezone", "Mars/Olympus"]).await;

    assert_eq!(host.exit_code, Some(2));
    assert!(host.error_str().contains("Mars/Olympus"), "got: {}", host.error_str());
}

#[tokio::test]
async fn test_init_then_validate() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("git-recap.yaml");

    let host = run(&["init", path_arg(&config_path)]).await;
    assert_eq!(host.exit_code, None, "stderr: {}", host.error_str());
    assert!(config_path.exists());

    let host = run(&["init", path_arg(&config_path)]).await;
    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("--force"));

    let host = run(&["init", "--force", path_arg(&config_path)]).await;
    assert_eq!(host.exit_code, None);

    let host = run(&["validate", path_arg(&config_path)]).await;
    assert_eq!(host.exit_code, None, "stderr: {}", host.error_str());
    assert!(host.output_str().contains("is valid"));
}

#[tokio::test]
async fn test_validate_reports_bad_values() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("bad.yaml");
    fs::write(&config_path, "api_url: https://api.github.com\ngraphql_url: https://api.github.com/graphql\nper_page: 500\n").unwrap();

    let host = run(&["validate", path_arg(&config_path)]).await;
    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("per_page"), "got: {}", host.error_str());
}

#[tokio::test]
async fn test_help_goes_to_output() {
    let host = run(&["--help"]).await;

    assert_eq!(host.exit_code, Some(0));
    assert!(host.output_str().contains("report"));
    assert!(host.error_str().is_empty());
}
