//! End-to-end tests running the `lopdns` binary against a mock API.

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZONE: &str = "example.se";

fn record(name: &str, record_type: &str, content: &str) -> Value {
    json!({
        "name": name,
        "type": record_type,
        "content": content,
        "ttl": 3600,
        "priority": 0
    })
}

/// Token, validate and invalidate endpoints for client id `client-1`
async fn mount_auth(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/auth/token"))
        .and(header("x-clientid", "client-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-abc",
            "expires": "2099-12-31 23:59:59",
            "epochExpires": 4_102_444_799_i64,
            "tz": "Europe/Stockholm"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/auth/validate"))
        .and(header("x-token", "tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "valid": true })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/auth/invalidate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(server)
        .await;
}

async fn mount_zones(server: &MockServer, zones: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/v2/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zones))
        .mount(server)
        .await;
}

async fn mount_records(server: &MockServer, records: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/records/{ZONE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(records))
        .mount(server)
        .await;
}

/// A mock API with one zone holding `records`
async fn api_with(records: Value) -> MockServer {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_zones(&server, &[ZONE, "example.com"]).await;
    mount_records(&server, records).await;
    server
}

/// Writes to the zone's record endpoint, counted by method
async fn expect_writes(server: &MockServer, verb: &str, times: u64) {
    Mock::given(method(verb))
        .and(path(format!("/v2/records/{ZONE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("www", "A", "0.0.0.0")))
        .expect(times)
        .mount(server)
        .await;
}

fn requests_with_method(requests: &[wiremock::Request], verb: &str) -> usize {
    requests.iter().filter(|r| r.method.as_str() == verb).count()
}

/// Run the binary with a clean environment and no user config file
async fn lopdns(server: &MockServer, args: &[&str]) -> Assert {
    let home = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("lopdns").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("RUST_LOG")
        .env_remove("LOPDNS_CLIENT_ID")
        .env_remove("LOPDNS_BASE_URL")
        .env_remove("LOPDNS_TIMEOUT")
        .env_remove("LOPDNS_TOKEN_DURATION_SEC")
        .env_remove("LOPDNS_LOG_LEVEL")
        .env_remove("LOPDNS_CONFIG")
        .arg("--no-color")
        .arg("--base-url")
        .arg(server.uri())
        .args(args);

    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    drop(home);
    assert
}

fn stdout_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_zones_lists_every_zone() {
    let server = api_with(json!([])).await;

    let assert = lopdns(&server, &["-a", "get-zones", "-c", "client-1", "-o", "json"])
        .await
        .success();

    assert_eq!(stdout_json(&assert), json!([ZONE, "example.com"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_records_of_one_zone() {
    let server = api_with(json!([record("www", "A", "1.2.3.4")])).await;

    let assert = lopdns(
        &server,
        &["-a", "get-records", "-c", "client-1", "-z", ZONE, "-o", "json"],
    )
    .await
    .success();

    let listing = stdout_json(&assert);
    assert_eq!(listing[0]["zone"], ZONE);
    assert_eq!(listing[0]["records"][0]["content"], "1.2.3.4");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_touches_only_first_match() {
    let server = api_with(json!([
        record("www", "A", "1.2.3.4"),
        record("www", "A", "1.2.3.5"),
    ]))
    .await;

    Mock::given(method("PUT"))
        .and(path(format!("/v2/records/{ZONE}")))
        .and(body_json(json!({
            "oldName": "www",
            "matchingType": "A",
            "oldValue": "1.2.3.4",
            "newValue": "9.9.9.9"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("www", "A", "9.9.9.9")))
        .expect(1)
        .mount(&server)
        .await;

    lopdns(
        &server,
        &[
            "-a", "update-record", "-c", "client-1", "-z", ZONE, "-n", "www", "-w", "9.9.9.9",
        ],
    )
    .await
    .success()
    .stdout(predicate::str::contains("1 updated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_rewrites_every_match() {
    let server = api_with(json!([
        record("www", "A", "10.0.0.1"),
        record("www", "A", "10.0.0.2"),
        record("www", "A", "192.168.1.1"),
    ]))
    .await;

    for (old, new) in [("10.0.0.1", "172.16.0.1"), ("10.0.0.2", "172.16.0.2")] {
        Mock::given(method("PUT"))
            .and(path(format!("/v2/records/{ZONE}")))
            .and(body_partial_json(json!({ "oldValue": old, "newValue": new })))
            .respond_with(ResponseTemplate::new(200).set_body_json(record("www", "A", new)))
            .expect(1)
            .mount(&server)
            .await;
    }

    lopdns(
        &server,
        &[
            "-a", "update-record", "-c", "client-1", "-z", ZONE, "-n", "www",
            "-u", r"^10\.", "-x", r"^10\.0", "-w", "172.16", "-A",
        ],
    )
    .await
    .success()
    .stdout(predicate::str::contains("2 updated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_without_match_fails() {
    let server = api_with(json!([record("mail", "MX", "mx.example.se")])).await;
    expect_writes(&server, "PUT", 0).await;

    lopdns(
        &server,
        &[
            "-a", "update-record", "-c", "client-1", "-z", ZONE, "-n", "www", "-w", "9.9.9.9",
        ],
    )
    .await
    .code(7)
    .stderr(predicate::str::contains("no records updated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_with_current_content_sends_nothing() {
    let server = api_with(json!([record("www", "A", "1.2.3.4")])).await;
    expect_writes(&server, "PUT", 0).await;

    lopdns(
        &server,
        &[
            "-a", "update-record", "-c", "client-1", "-z", ZONE, "-n", "www",
            "-u", r"^1\.2\.3\.4$", "-w", "1.2.3.4",
        ],
    )
    .await
    .code(7)
    .stdout(predicate::str::contains("1 skipped"))
    .stderr(predicate::str::contains("no records updated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_moves_past_up_to_date_match() {
    let server = api_with(json!([
        record("www", "A", "1.2.3.4"),
        record("www", "A", "1.2.3.5"),
        record("www", "A", "1.2.3.6"),
    ]))
    .await;

    Mock::given(method("PUT"))
        .and(path(format!("/v2/records/{ZONE}")))
        .and(body_partial_json(json!({ "oldValue": "1.2.3.5", "newValue": "1.2.3.4" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("www", "A", "1.2.3.4")))
        .expect(1)
        .mount(&server)
        .await;

    lopdns(
        &server,
        &[
            "-a", "update-record", "-c", "client-1", "-z", ZONE, "-n", "www",
            "-u", r"^1\.2\.3\.", "-w", "1.2.3.4",
        ],
    )
    .await
    .success()
    .stdout(predicate::str::contains("1 updated, 1 skipped"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests_with_method(&requests, "PUT"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_or_update_with_up_to_date_record_succeeds() {
    let server = api_with(json!([record("www", "A", "9.9.9.9")])).await;
    expect_writes(&server, "PUT", 0).await;
    expect_writes(&server, "POST", 0).await;

    lopdns(
        &server,
        &[
            "-a", "createorupdate-record", "-c", "client-1", "-z", ZONE, "-n", "www",
            "-w", "9.9.9.9",
        ],
    )
    .await
    .success()
    .stdout(predicate::str::contains("1 skipped"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_or_update_creates_when_missing() {
    let server = api_with(json!([record("mail", "MX", "mx.example.se")])).await;
    expect_writes(&server, "PUT", 0).await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/records/{ZONE}")))
        .and(body_json(json!({
            "name": "www",
            "type": "A",
            "value": "9.9.9.9",
            "ttl": 3600,
            "priority": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("www", "A", "9.9.9.9")))
        .expect(1)
        .mount(&server)
        .await;

    lopdns(
        &server,
        &[
            "-a", "createorupdate-record", "-c", "client-1", "-z", ZONE, "-n", "www",
            "-w", "9.9.9.9",
        ],
    )
    .await
    .success()
    .stdout(predicate::str::contains("1 created"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_record_with_ttl() {
    let server = api_with(json!([])).await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/records/{ZONE}")))
        .and(body_partial_json(json!({ "name": "txt", "type": "TXT", "ttl": 300 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("txt", "TXT", "hello")))
        .expect(1)
        .mount(&server)
        .await;

    lopdns(
        &server,
        &[
            "-a", "create-record", "-c", "client-1", "-z", ZONE, "-n", "txt", "-r", "TXT",
            "-w", "hello", "--new-record-ttl", "300",
        ],
    )
    .await
    .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_sends_no_writes() {
    let server = api_with(json!([
        record("www", "A", "1.2.3.4"),
        record("www", "A", "1.2.3.5"),
    ]))
    .await;

    for action in ["update-record", "delete-record", "create-record"] {
        lopdns(
            &server,
            &[
                "-a", action, "-c", "client-1", "-z", ZONE, "-n", "www", "-w", "9.9.9.9",
                "-A", "--dry-run",
            ],
        )
        .await
        .success()
        .stdout(predicate::str::contains("dry run"));
    }

    let requests = server.received_requests().await.unwrap();
    for verb in ["POST", "PUT", "DELETE"] {
        assert_eq!(requests_with_method(&requests, verb), 0, "{verb} sent in dry run");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_or_update_dry_run_reports_update() {
    let server = api_with(json!([record("www", "A", "1.2.3.4")])).await;

    let assert = lopdns(
        &server,
        &[
            "-a", "createorupdate-record", "-c", "client-1", "-z", ZONE, "-n", "www",
            "-w", "5.6.7.8", "--new-record-ttl", "60", "--dry-run", "-o", "json",
        ],
    )
    .await
    .success();

    let changes = stdout_json(&assert);
    assert_eq!(changes[0]["action"], "updated");
    assert_eq!(changes[0]["dry_run"], true);
    assert_eq!(changes[0]["before"]["content"], "1.2.3.4");
    assert_eq!(changes[0]["after"]["content"], "5.6.7.8");
    assert_eq!(changes[0]["after"]["ttl"], 60);

    let requests = server.received_requests().await.unwrap();
    for verb in ["POST", "PUT", "DELETE"] {
        assert_eq!(requests_with_method(&requests, verb), 0, "{verb} sent in dry run");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_or_update_dry_run_reports_would_be_record() {
    let server = api_with(json!([record("mail", "MX", "mx.example.se")])).await;

    let assert = lopdns(
        &server,
        &[
            "-a", "createorupdate-record", "-c", "client-1", "-z", ZONE, "-n", "home",
            "-w", "9.9.9.9", "--dry-run", "-o", "json",
        ],
    )
    .await
    .success();

    let changes = stdout_json(&assert);
    assert_eq!(changes[0]["action"], "created");
    assert_eq!(changes[0]["dry_run"], true);
    assert!(changes[0]["before"].is_null());
    assert_eq!(
        changes[0]["after"],
        json!({ "name": "home", "type": "A", "content": "9.9.9.9", "ttl": 3600, "priority": 0 })
    );

    let requests = server.received_requests().await.unwrap();
    for verb in ["POST", "PUT", "DELETE"] {
        assert_eq!(requests_with_method(&requests, verb), 0, "{verb} sent in dry run");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_all_matches_in_order() {
    let server = api_with(json!([
        record("www", "A", "1.1.1.1"),
        record("mail", "A", "2.2.2.2"),
        record("www", "A", "3.3.3.3"),
        record("www", "A", "4.4.4.4"),
    ]))
    .await;
    expect_writes(&server, "DELETE", 3).await;

    lopdns(
        &server,
        &["-a", "delete-record", "-c", "client-1", "-z", ZONE, "-n", "www", "-A"],
    )
    .await
    .success()
    .stdout(predicate::str::contains("3 deleted"));

    let requests = server.received_requests().await.unwrap();
    let deleted: Vec<String> = requests
        .iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .map(|r| serde_json::from_slice::<Value>(&r.body).unwrap()["value"].to_string())
        .collect();
    assert_eq!(deleted, vec!["\"1.1.1.1\"", "\"3.3.3.3\"", "\"4.4.4.4\""]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_match_fails() {
    let server = api_with(json!([])).await;
    expect_writes(&server, "DELETE", 0).await;

    lopdns(
        &server,
        &["-a", "delete-record", "-c", "client-1", "-z", ZONE, "-n", "www"],
    )
    .await
    .code(9);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_client_id_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/auth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad client id"))
        .mount(&server)
        .await;

    lopdns(&server, &["-a", "get-zones", "-c", "wrong"])
        .await
        .code(2)
        .stderr(predicate::str::contains("authentication failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_zone() {
    let server = api_with(json!([])).await;

    lopdns(
        &server,
        &["-a", "get-records", "-c", "client-1", "-z", "missing.se"],
    )
    .await
    .code(3);

    // the token is given back on failure
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().any(|r| r.url.path() == "/v2/auth/invalidate"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_account_without_zones() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_zones(&server, &[]).await;

    lopdns(&server, &["-a", "get-records", "-c", "client-1"])
        .await
        .code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_action() {
    let server = MockServer::start().await;

    lopdns(&server, &["-a", "transfer-zone", "-c", "client-1"])
        .await
        .code(10)
        .stderr(predicate::str::contains("get-zones"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_client_id() {
    let server = MockServer::start().await;

    lopdns(&server, &["-a", "get-zones"]).await.code(1);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_regex_sends_nothing() {
    let server = MockServer::start().await;

    lopdns(
        &server,
        &[
            "-a", "update-record", "-c", "client-1", "-z", ZONE, "-n", "www",
            "-x", "([", "-w", "x",
        ],
    )
    .await
    .code(99);

    lopdns(
        &server,
        &["-a", "delete-record", "-c", "client-1", "-z", ZONE, "-n", "www", "-u", "("],
    )
    .await
    .code(99);

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_id_from_config_file() {
    let server = api_with(json!([])).await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "client_id = \"client-1\"\noutput_format = \"json\"").unwrap();
    let config = file.path().to_str().unwrap().to_string();

    let assert = lopdns(&server, &["-a", "get-zones", "--config", &config])
        .await
        .success();

    assert_eq!(stdout_json(&assert), json!([ZONE, "example.com"]));
}

/// Config file with one task copying `home A` into the SPF record
fn task_config(extra: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"client_id = "client-1"

[[task]]
zone = "example.se"
{extra}
source = {{ name = "home" }}

[task.target]
name = "@"
type = "TXT"
content_match = {{ pattern = "^v=spf1" }}
data_extract = {{ pattern = "ip4:([0-9.]+)", group = 1 }}
content_replace = {{ pattern = '\d+\.\d+\.\d+\.\d+' }}
"#
    )
    .unwrap();
    file
}

fn spf_zone(home: &str) -> Value {
    json!([
        record("@", "TXT", "v=spf1 ip4:1.2.3.4 -all"),
        record("home", "A", home),
    ])
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_tasks_copies_source_into_target() {
    let server = api_with(spf_zone("5.6.7.8")).await;

    Mock::given(method("PUT"))
        .and(path(format!("/v2/records/{ZONE}")))
        .and(body_json(json!({
            "oldName": "@",
            "matchingType": "TXT",
            "oldValue": "v=spf1 ip4:1.2.3.4 -all",
            "newValue": "v=spf1 ip4:5.6.7.8 -all"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(record("@", "TXT", "v=spf1 ip4:5.6.7.8 -all")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = task_config("");
    lopdns(
        &server,
        &["-a", "run-tasks", "--config", file_arg(&config)],
    )
    .await
    .success()
    .stdout(predicate::str::contains("1 updated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_tasks_up_to_date_and_dry_run() {
    let server = api_with(spf_zone("1.2.3.4")).await;
    expect_writes(&server, "PUT", 0).await;

    let config = task_config("");
    lopdns(&server, &["-a", "run-tasks", "--config", file_arg(&config)])
        .await
        .success()
        .stdout(predicate::str::contains("1 skipped"));

    let server = api_with(spf_zone("5.6.7.8")).await;
    expect_writes(&server, "PUT", 0).await;

    let config = task_config("dry_run = true");
    let assert = lopdns(
        &server,
        &["-a", "run-tasks", "--config", file_arg(&config), "-o", "json"],
    )
    .await
    .success();

    let changes = stdout_json(&assert);
    assert_eq!(changes[0]["dry_run"], true);
    assert_eq!(changes[0]["after"]["content"], "v=spf1 ip4:5.6.7.8 -all");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_tasks_reports_failed_task() {
    let server = api_with(json!([record("home", "A", "5.6.7.8")])).await;
    expect_writes(&server, "PUT", 0).await;

    let config = task_config("");
    lopdns(&server, &["-a", "run-tasks", "--config", file_arg(&config)])
        .await
        .code(11)
        .stderr(predicate::str::contains("1 of 1 tasks failed"));
}

fn file_arg(file: &tempfile::NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}
