//! End-to-end tests: config file -> metadata load -> MCP dispatch -> mock Meilisearch.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use meilimcp_core::config::{Config, ConfigOverrides, EngineConfig};
use meilimcp_mcp::ServerContext;
use meilimcp_mcp::server::serve_lines;
use meilimcp_search::{MeiliClient, load_index_metadata};
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bind_test_listener() -> Option<TcpListener> {
    match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => Some(listener),
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => None,
        Err(err) => panic!("mock server bind failed: {err}"),
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(split) = text.find("\r\n\r\n") {
            let content_length = text[..split]
                .lines()
                .find_map(|l| {
                    l.to_ascii_lowercase()
                        .strip_prefix("content-length:")
                        .and_then(|v| v.trim().parse::<usize>().ok())
                })
                .unwrap_or(0);
            if buf.len() >= split + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Mock Meilisearch answering `connections` requests, routed on the request path.
/// Returns the base URL and the captured raw requests.
fn spawn_mock_meilisearch(
    listener: TcpListener,
    connections: usize,
    filterable: Value,
    hits: Value,
) -> (String, thread::JoinHandle<()>, Arc<Mutex<Vec<String>>>) {
    let url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    let handle = thread::spawn(move || {
        for _ in 0..connections {
            let (mut stream, _) = listener.accept().expect("mock accept failed");
            stream
                .set_read_timeout(Some(Duration::from_millis(500)))
                .unwrap();
            let request = read_request(&mut stream);
            let body = if request.contains("/settings/filterable-attributes") {
                filterable.to_string()
            } else if request.contains("/search") {
                json!({"hits": hits, "processingTimeMs": 1}).to_string()
            } else {
                json!({"status": "available"}).to_string()
            };
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            log.lock().unwrap().push(request);
        }
    });
    (url, handle, seen)
}

fn load_config(host: &str) -> Config {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[meilisearch]\nhost = \"{host}\"\nindex = \"movies\"\nembedder = \"default\"\ntimeout_ms = 2000\n"
        ),
    )
    .unwrap();
    Config::load_with_env(None, Some(&path), &ConfigOverrides::default(), |_| None).unwrap()
}

fn start_context(host: &str) -> ServerContext {
    let config = load_config(host);
    let engine = EngineConfig::from_config(&config).unwrap();
    let client = MeiliClient::new(&engine).unwrap();
    let metadata = load_index_metadata(&engine, &client).unwrap();
    ServerContext::new(engine, metadata, Arc::new(client))
}

fn run_session(ctx: &ServerContext, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let mut output = Vec::new();
    serve_lines(ctx, input.as_bytes(), &mut output).unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn space_opera_call(id: u64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {
            "name": "hybrid_search",
            "arguments": {
                "keywords": "space opera",
                "filterable_attribute": "genre",
                "filter_word": "Science Fiction"
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn two_hits_are_returned_through_the_tool() {
    let Some(listener) = bind_test_listener() else {
        return;
    };
    let hits = json!([
        {"id": 1, "title": "Dune", "genre": "Science Fiction", "_rankingScore": 0.97},
        {"id": 2, "title": "Hyperion", "genre": "Science Fiction", "_rankingScore": 0.93}
    ]);
    let (url, server, seen) =
        spawn_mock_meilisearch(listener, 2, json!(["genre", "author"]), hits.clone());

    let ctx = start_context(&url);
    let responses = run_session(
        &ctx,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
            space_opera_call(2),
        ],
    );
    server.join().unwrap();

    let description = responses[0]["result"]["tools"][0]["inputSchema"]["properties"]
        ["filterable_attribute"]["description"]
        .as_str()
        .unwrap();
    assert!(description.contains("genre, author"));

    let result = &responses[1]["result"];
    assert_eq!(result["isError"], json!(false));
    let text = result["content"][0]["text"].as_str().unwrap();
    assert_eq!(serde_json::from_str::<Value>(text).unwrap(), hits);

    let requests = seen.lock().unwrap();
    let search_request = requests
        .iter()
        .find(|r| r.starts_with("POST /indexes/movies/search"))
        .expect("search request should reach the mock");
    assert!(search_request.contains(r#""q":"space opera""#));
    assert!(search_request.contains(r#""filter":"genre = 'Science Fiction'""#));
    assert!(search_request.contains(r#""embedder":"default""#));
    assert!(search_request.contains(r#""rankingScoreThreshold":0.9"#));
}

#[test]
fn zero_hits_return_the_no_results_text() {
    let Some(listener) = bind_test_listener() else {
        return;
    };
    let (url, server, _) = spawn_mock_meilisearch(listener, 2, json!(["genre"]), json!([]));

    let ctx = start_context(&url);
    let responses = run_session(&ctx, &[space_opera_call(7)]);
    server.join().unwrap();

    assert_eq!(responses[0]["id"], json!(7));
    assert_eq!(responses[0]["result"]["isError"], json!(false));
    assert_eq!(
        responses[0]["result"]["content"][0]["text"],
        json!("no results found - please try with fewer or different keywords")
    );
}

#[test]
fn missing_host_is_a_startup_error() {
    let home = tempfile::tempdir().unwrap();
    let config = Config::load_with_env(
        Some(home.path()),
        None,
        &ConfigOverrides::default(),
        |_| None,
    )
    .unwrap();
    let err = EngineConfig::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("MEILI_HOST"));
}
