//! HttpProvider against a one-shot local HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use valruns_provider::{DocumentProvider, HttpProvider, ProviderError};

/// Serve exactly one request with the given status line and body.
/// Returns the base URL and a receiver for the raw request text.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut buf = [0u8; 4096];
        let n = stream.read(&mut buf).unwrap_or(0);
        let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
    });

    (format!("http://127.0.0.1:{}", port), rx)
}

#[tokio::test]
async fn fetches_and_parses_json() {
    let (base, _rx) = serve_once("200 OK", r#"{"GameName":"Celeste","AttemptCount":4}"#);
    let provider = HttpProvider::new(format!("{}/splits.json", base), Some("secret".to_string()));

    let value = provider.fetch_document().await.unwrap();
    assert_eq!(value["GameName"], "Celeste");
    assert_eq!(value["AttemptCount"], 4);
}

#[tokio::test]
async fn sends_bearer_token() {
    let (base, rx) = serve_once("200 OK", "{}");
    let provider = HttpProvider::new(format!("{}/splits.json", base), Some("secret".to_string()));

    provider.fetch_document().await.unwrap();
    let request = rx.recv().unwrap();
    assert!(request.starts_with("GET /splits.json"));
    assert!(request
        .lines()
        .any(|l| l.eq_ignore_ascii_case("authorization: Bearer secret")));
}

#[tokio::test]
async fn not_found_status_maps_to_not_found() {
    let (base, _rx) = serve_once("404 Not Found", r#"{"error":"no such file"}"#);
    let provider = HttpProvider::new(format!("{}/splits.json", base), Some("secret".to_string()));

    let err = provider.fetch_document().await.unwrap_err();
    assert!(matches!(err, ProviderError::NotFound { .. }), "got {:?}", err);
}

#[tokio::test]
async fn server_error_maps_to_fetch_error() {
    let (base, _rx) = serve_once("500 Internal Server Error", "{}");
    let provider = HttpProvider::new(format!("{}/splits.json", base), Some("secret".to_string()));

    let err = provider.fetch_document().await.unwrap_err();
    assert!(matches!(err, ProviderError::Fetch { .. }), "got {:?}", err);
}

#[tokio::test]
async fn non_json_body_maps_to_parse_error() {
    let (base, _rx) = serve_once("200 OK", "<html>sign in</html>");
    let provider = HttpProvider::new(format!("{}/splits.json", base), Some("secret".to_string()));

    let err = provider.fetch_document().await.unwrap_err();
    assert!(matches!(err, ProviderError::Parse { .. }), "got {:?}", err);
}
