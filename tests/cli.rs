//! End-to-end tests for the `places` command line.

mod fixtures;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use places_route::cli::{EXIT_FAILURE, EXIT_OK, EXIT_USAGE, run};
use places_route::client::ROUTES_PATH;

use fixtures::{REFERENCE_POLYLINE, TEST_API_KEY, place, routes_response, search_response};

struct Output {
    code: u8,
    stdout: String,
    stderr: String,
}

fn places(args: &[&str]) -> Output {
    let mut argv = vec!["places".to_string()];
    argv.extend(args.iter().map(|a| a.to_string()));

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run(argv, &mut stdout, &mut stderr);
    Output {
        code,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

/// Runs the CLI on a blocking thread against `server`.
async fn places_against(server: &MockServer, args: &[&str]) -> Output {
    let mut argv: Vec<String> = vec![
        "--api-key".to_string(),
        TEST_API_KEY.to_string(),
        "--base-url".to_string(),
        server.uri(),
        "--routes-base-url".to_string(),
        server.uri(),
        "--no-color".to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));

    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = argv.iter().map(String::as_str).collect();
        places(&args)
    })
    .await
    .unwrap()
}

#[test]
fn help_goes_to_stdout() {
    let out = places(&["--help"]);
    assert_eq!(out.code, EXIT_OK);
    assert!(out.stdout.contains("Usage: places"));
    assert!(out.stdout.contains("search"));
    assert!(out.stdout.contains("route"));
    assert!(out.stderr.is_empty());
}

#[test]
fn version_flag() {
    let out = places(&["--version"]);
    assert_eq!(out.code, EXIT_OK);
    assert!(out.stdout.starts_with("places "));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let out = places(&["teleport"]);
    assert_eq!(out.code, EXIT_USAGE);
    assert!(out.stdout.is_empty());
    assert!(!out.stderr.is_empty());
}

#[test]
fn missing_api_key_exits_with_usage() {
    let out = places(&["--api-key", "", "search", "coffee"]);
    assert_eq!(out.code, EXIT_USAGE);
    assert!(out.stderr.contains("missing API key"));
}

#[test]
fn invalid_limit_exits_with_usage() {
    let out = places(&["--api-key", TEST_API_KEY, "search", "coffee", "--limit", "50"]);
    assert_eq!(out.code, EXIT_USAGE);
    assert!(out.stderr.contains("invalid limit"));
}

#[test]
fn partial_circle_exits_with_usage() {
    let out = places(&["--api-key", TEST_API_KEY, "nearby", "--lat", "47.6"]);
    assert_eq!(out.code, EXIT_USAGE);
    assert!(out.stderr.contains("invalid location_restriction"));
}

#[test]
fn unknown_travel_mode_exits_with_usage() {
    let out = places(&[
        "--api-key", TEST_API_KEY, "route", "coffee", "--from", "A", "--to", "B", "--mode", "FLY",
    ]);
    assert_eq!(out.code, EXIT_USAGE);
    assert!(out.stderr.contains("invalid mode"));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_prints_human_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(
            vec![place("a", "Cafe A", 47.61, -122.31)],
            Some("next-1"),
        )))
        .mount(&server)
        .await;

    let out = places_against(&server, &["search", "coffee"]).await;

    assert_eq!(out.code, EXIT_OK, "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Results (1)"));
    assert!(out.stdout.contains("1. Cafe A — a Main St"));
    assert!(out.stdout.contains("Rating: 4.5 · $2"));
    assert!(out.stdout.contains("Next page token: next-1"));
    assert!(!out.stdout.contains('\x1b'));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_prints_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(
            vec![place("a", "Cafe A", 47.61, -122.31)],
            None,
        )))
        .mount(&server)
        .await;

    let out = places_against(&server, &["search", "coffee", "--json"]).await;

    assert_eq!(out.code, EXIT_OK, "stderr: {}", out.stderr);
    let value: Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(value["results"][0]["place_id"], "a");
    assert_eq!(value["results"][0]["price_level"], 2);
    assert!(value.get("next_page_token").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn route_prints_waypoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTES_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(routes_response(&[REFERENCE_POLYLINE])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(
            vec![place("w", "Waypoint Cafe", 40.0, -121.0)],
            None,
        )))
        .expect(2)
        .mount(&server)
        .await;

    let out = places_against(
        &server,
        &["route", "coffee", "--from", "A", "--to", "B", "--max-waypoints", "2"],
    )
    .await;

    assert_eq!(out.code, EXIT_OK, "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Route waypoints (2)"));
    assert!(out.stdout.contains("Waypoint 1: 38.500000, -120.200000"));
    assert!(out.stdout.contains("Waypoint 2: 43.252000, -126.453000"));
    assert!(out.stdout.contains("1. Waypoint Cafe"));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_results_print_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/places:searchText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let out = places_against(&server, &["resolve", "Atlantis"]).await;

    assert_eq!(out.code, EXIT_OK, "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "No results.\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn api_failure_exits_with_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let out = places_against(&server, &["search", "coffee"]).await;

    assert_eq!(out.code, EXIT_FAILURE);
    assert!(out.stderr.contains("api error (500): internal"));
    assert!(out.stdout.is_empty());
}
