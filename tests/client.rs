use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use nba_compare::api::client::NbaStatsClient;
use nba_compare::cache::DatasetCache;
use nba_compare::config::Config;
use nba_compare::error::AppError;
use nba_compare::repository::StatsRepository;
use nba_compare::table::{AggregationMode, EntityKind};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

/// Answers one connection per canned response, in order, and hands back
/// the request lines it saw.
fn serve_sequence(
    responses: Vec<(&'static str, String)>,
) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");

    let handle = thread::spawn(move || {
        let mut request_lines = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).expect("write response");
            let request = String::from_utf8_lossy(&request).to_string();
            request_lines.push(request.lines().next().unwrap_or_default().to_string());
        }
        request_lines
    });

    (format!("http://{}/stats", addr), handle)
}

fn serve_once(status: &'static str, body: String) -> (String, thread::JoinHandle<Vec<String>>) {
    serve_sequence(vec![(status, body)])
}

const TOO_MANY_REQUESTS: &str = "429 Too Many Requests";

fn config_for(base_url: String) -> Config {
    Config {
        base_url,
        timeout_secs: 5,
        requests_per_second: 100,
        retry_base_ms: 1,
        ..Config::default()
    }
}

#[test]
fn fetches_and_parses_team_stats() {
    let (base_url, server) = serve_once("200 OK", read_fixture("leaguedashteamstats.json"));
    let client = NbaStatsClient::new(&config_for(base_url));

    let table = client
        .get_league_stats(EntityKind::Team, "2024-25", "Regular Season", AggregationMode::Totals)
        .unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.entity_key(), "TEAM_NAME");

    let request_line = server.join().unwrap().remove(0);
    assert!(request_line.starts_with("GET /stats/leaguedashteamstats?"));
    assert!(request_line.contains("PerMode=Totals"));
    assert!(request_line.contains("Season=2024-25"));
}

#[test]
fn server_error_surfaces_as_data_unavailable() {
    let (base_url, server) = serve_once("500 Internal Server Error", "{}".to_string());
    let client = NbaStatsClient::new(&config_for(base_url));
    let mut repo = StatsRepository::new(client, DatasetCache::new());

    let err = repo.fetch(EntityKind::Player, AggregationMode::PerGame).unwrap_err();
    assert!(matches!(
        err,
        AppError::DataUnavailable { kind: EntityKind::Player, .. }
    ));
    assert!(repo.cache().is_empty());
    server.join().unwrap();
}

#[test]
fn rate_limit_exhausts_retries() {
    let responses = (0..4).map(|_| (TOO_MANY_REQUESTS, "{}".to_string())).collect();
    let (base_url, server) = serve_sequence(responses);
    let client = NbaStatsClient::new(&config_for(base_url));
    let mut repo = StatsRepository::new(client, DatasetCache::new());

    let err = repo.fetch(EntityKind::Team, AggregationMode::PerGame).unwrap_err();
    match err {
        AppError::DataUnavailable { reason, .. } => {
            assert!(reason.contains("Rate limit exceeded"), "reason was {reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.join().unwrap().len(), 4);
}

#[test]
fn rate_limit_then_success_recovers() {
    let (base_url, server) = serve_sequence(vec![
        (TOO_MANY_REQUESTS, "{}".to_string()),
        ("200 OK", read_fixture("leaguedashplayerstats.json")),
    ]);
    let client = NbaStatsClient::new(&config_for(base_url));

    let table = client
        .get_league_stats(EntityKind::Player, "2024-25", "Regular Season", AggregationMode::PerGame)
        .unwrap();
    assert_eq!(table.len(), 3);

    let request_lines = server.join().unwrap();
    assert_eq!(request_lines.len(), 2);
    assert_eq!(request_lines[0], request_lines[1]);
}
