//! End-to-end tests against a mock Attio API

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// `attio` pointed at the mock server with an isolated config directory
fn attio(server: &MockServer, config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("attio"));
    cmd.env("ATTIO_BASE_URL", server.base_url())
        .env("ATTIO_API_KEY", "test-key")
        .env("ATTIO_CONFIG_DIR", config_dir.path())
        .env_remove("ATTIO_OUTPUT_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn company(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": { "workspace_id": "w1", "object_id": "o1", "record_id": id },
        "values": {
            "name": [{ "value": name, "attribute_type": "text" }],
            "domains": [{ "domain": "acme.com", "attribute_type": "domain" }]
        }
    })
}

#[test]
fn records_list_sends_combined_filter() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2/objects/companies/records/query")
            .header("authorization", "Bearer test-key")
            .json_body(json!({
                "filter": { "$and": [
                    { "name": { "$contains": "Acme" } },
                    { "employee_count": { "$gte": 50 } }
                ] },
                "sorts": [{ "attribute": "name", "direction": "desc" }],
                "limit": 25,
                "offset": 0
            }));
        then.status(200)
            .json_body(json!({ "data": [company("r1", "Acme")] }));
    });

    attio(&server, &config_dir)
        .args(["--json", "records", "list", "companies"])
        .args(["--filter", "name~Acme", "--filter", "employee_count>=50"])
        .args(["--sort", "name:desc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"record_id\": \"r1\""));

    mock.assert();
}

#[test]
fn records_list_quiet_prints_ids() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    server.mock(|when, then| {
        when.method(POST).path("/v2/objects/companies/records/query");
        then.status(200).json_body(json!({
            "data": [company("r1", "Acme"), company("r2", "Globex")]
        }));
    });

    attio(&server, &config_dir)
        .args(["records", "list", "companies", "-q"])
        .assert()
        .success()
        .stdout("r1\nr2\n");
}

#[test]
fn records_list_csv_flattens_values() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    server.mock(|when, then| {
        when.method(POST).path("/v2/objects/companies/records/query");
        then.status(200)
            .json_body(json!({ "data": [company("r1", "Acme")] }));
    });

    attio(&server, &config_dir)
        .args(["records", "list", "companies", "--format", "csv"])
        .assert()
        .success()
        .stdout("id,name,domains\nr1,Acme,acme.com\n");
}

#[test]
fn records_create_sends_set_values() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2/objects/companies/records")
            .json_body(json!({
                "data": { "values": {
                    "name": "Acme",
                    "employee_count": 120,
                    "domains": ["acme.com", "acme.io"]
                } }
            }));
        then.status(200)
            .json_body(json!({ "data": company("r9", "Acme") }));
    });

    attio(&server, &config_dir)
        .args(["records", "create", "companies", "-q"])
        .args(["--set", "name=Acme"])
        .args(["--set", "employee_count=120"])
        .args(["--set", "domains=[acme.com, acme.io]"])
        .assert()
        .success()
        .stdout("r9\n");

    mock.assert();
}

#[test]
fn records_assert_passes_matching_attribute() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/v2/objects/companies/records")
            .query_param("matching_attribute", "domains");
        then.status(200)
            .json_body(json!({ "data": company("r1", "Acme") }));
    });

    attio(&server, &config_dir)
        .args(["records", "assert", "companies", "--match", "domains"])
        .args(["--values", r#"{"domains":["acme.com"]}"#])
        .assert()
        .success();

    mock.assert();
}

#[test]
fn delete_without_yes_does_not_call_api() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/v2/objects/companies/records/r1");
        then.status(204);
    });

    attio(&server, &config_dir)
        .args(["records", "delete", "companies", "r1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("-y"));

    mock.assert_calls(0);
}

#[test]
fn missing_api_key_exits_with_auth_code() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();

    attio(&server, &config_dir)
        .env_remove("ATTIO_API_KEY")
        .args(["records", "list", "companies"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn bad_filter_exits_with_validation_code() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();

    attio(&server, &config_dir)
        .args(["records", "list", "companies", "--filter", "name"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("invalid filter 'name'"));
}

#[test]
fn not_found_exits_with_code_3() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    server.mock(|when, then| {
        when.method(GET).path("/v2/objects/companies/records/missing");
        then.status(404).json_body(json!({
            "status_code": 404,
            "type": "invalid_request_error",
            "code": "not_found",
            "message": "Record with ID \"missing\" not found."
        }));
    });

    attio(&server, &config_dir)
        .args(["records", "get", "companies", "missing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn config_set_key_is_used_by_later_commands() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/self")
            .header("authorization", "Bearer saved-key-1234");
        then.status(200)
            .json_body(json!({ "active": true, "workspace_name": "Acme Inc" }));
    });

    attio(&server, &config_dir)
        .env_remove("ATTIO_API_KEY")
        .args(["config", "set-key", "saved-key-1234"])
        .assert()
        .success();
    assert!(config_dir.path().join("config.json").exists());

    attio(&server, &config_dir)
        .env_remove("ATTIO_API_KEY")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1234").and(predicate::str::contains("saved-key").not()));

    attio(&server, &config_dir)
        .env_remove("ATTIO_API_KEY")
        .args(["--json", "self"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Inc"));

    mock.assert();
}

#[test]
fn bad_filter_json_exits_with_validation_code() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();

    attio(&server, &config_dir)
        .args(["records", "list", "companies", "--filter-json", "{oops"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--filter-json is not valid JSON"));
}

#[test]
fn broken_config_file_does_not_block_set_key() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    let path = config_dir.path().join("config.json");
    std::fs::write(&path, r#"{"api_key":"k","output_format":"yaml"}"#).unwrap();

    attio(&server, &config_dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));

    attio(&server, &config_dir)
        .args(["config", "set-key", "fresh-key"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("fresh-key"));
    assert!(!saved.contains("yaml"));
}

#[test]
fn notes_all_pages_until_short_page() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    let note = |i: usize| json!({ "id": { "note_id": format!("n{i}") }, "title": "t" });

    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/notes")
            .query_param("limit", "50")
            .query_param("offset", "0");
        then.status(200)
            .json_body(json!({ "data": (0..50).map(note).collect::<Vec<_>>() }));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/notes")
            .query_param("limit", "50")
            .query_param("offset", "50");
        then.status(200)
            .json_body(json!({ "data": (50..53).map(note).collect::<Vec<_>>() }));
    });

    let assert = attio(&server, &config_dir)
        .args(["notes", "list", "--all", "-q"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(stdout.lines().count(), 53);
    assert_eq!(stdout.lines().last(), Some("n52"));
    first.assert();
    second.assert();
}

#[test]
fn meetings_list_reports_next_cursor() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/meetings")
            .query_param("limit", "1");
        then.status(200).json_body(json!({
            "data": [{
                "id": { "meeting_id": "m1" },
                "title": "Sync",
                "start": { "datetime": "2024-01-01T10:00:00Z" },
                "end": { "datetime": "2024-01-01T11:00:00Z" }
            }],
            "pagination": { "next_cursor": "cur-2" }
        }));
    });

    attio(&server, &config_dir)
        .args(["meetings", "list", "--limit", "1", "--format", "csv"])
        .assert()
        .success()
        .stdout(
            "meeting_id,title,start_datetime,end_datetime\n\
             m1,Sync,2024-01-01T10:00:00Z,2024-01-01T11:00:00Z\n",
        )
        .stderr(predicate::str::contains("--cursor cur-2"));

    mock.assert();
}

#[test]
fn meetings_all_follows_cursors() {
    let server = MockServer::start();
    let config_dir = TempDir::new().unwrap();
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/meetings")
            .query_param("cursor", "cur-2");
        then.status(200).json_body(json!({
            "data": [{ "id": { "meeting_id": "m2" } }],
            "pagination": { "next_cursor": null }
        }));
    });
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/meetings")
            .query_param("limit", "200")
            .query_param_missing("cursor");
        then.status(200).json_body(json!({
            "data": [{ "id": { "meeting_id": "m1" } }],
            "pagination": { "next_cursor": "cur-2" }
        }));
    });

    attio(&server, &config_dir)
        .args(["meetings", "list", "--all", "-q"])
        .assert()
        .success()
        .stdout("m1\nm2\n")
        .stderr(predicate::str::contains("--cursor").not());

    first.assert();
    second.assert();
}
