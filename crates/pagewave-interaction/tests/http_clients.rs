//! Exercises both HTTP clients against a one-shot local HTTP responder.

use image::RgbImage;
use pagewave_core::capture::Frame;
use pagewave_core::document::{DocumentId, PageRequest, SessionService};
use pagewave_core::gesture::{GestureClassifier, GestureLabel};
use pagewave_core::PagewaveError;
use pagewave_interaction::{HttpSessionService, RemoteGestureClassifier};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

struct Captured {
    head: String,
    body: Vec<u8>,
}

impl Captured {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

const DOC_PAGE_3: &str = r#"{"id":7,"filename":"a.pdf","original_name":"a.pdf","topic":null,"path":"/x/a.pdf","num_pages":10,"is_open":true,"current_page":3}"#;

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

async fn read_more(socket: &mut TcpStream, buf: &mut Vec<u8>) -> bool {
    let mut chunk = [0u8; 4096];
    let n = socket.read(&mut chunk).await.unwrap_or(0);
    buf.extend_from_slice(&chunk[..n]);
    n > 0
}

async fn read_request(socket: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if !read_more(socket, &mut buf).await {
            break buf.len();
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let lower = head.to_ascii_lowercase();
    let mut body = buf[header_end..].to_vec();

    let content_length = lower
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok());

    if let Some(length) = content_length {
        while body.len() < length && read_more(socket, &mut body).await {}
    } else if lower.contains("transfer-encoding: chunked") {
        while !body.ends_with(b"0\r\n\r\n") && read_more(socket, &mut body).await {}
    }

    Captured { head, body }
}

/// Accepts one connection, records the request and answers with `status`/`body`.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        captured
    });

    (format!("http://{addr}"), handle)
}

fn service(base_url: &str) -> HttpSessionService {
    HttpSessionService::new(base_url, Duration::from_secs(5)).unwrap()
}

fn frame() -> Frame {
    Frame::new(1, RgbImage::from_pixel(16, 16, image::Rgb([10, 20, 30])))
}

#[tokio::test]
async fn test_change_page_next_posts_mode_and_adopts_response() {
    let (url, server) = serve_once("200 OK", DOC_PAGE_3).await;

    let session = service(&url)
        .change_page(DocumentId(7), PageRequest::Next)
        .await
        .expect("page change should succeed");

    let captured = server.await.unwrap();
    assert!(captured.request_line().starts_with("POST /api/pdfs/7/page "));
    let sent: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
    assert_eq!(sent, serde_json::json!({ "mode": "next" }));
    assert_eq!(session.current_page, 3);
    assert_eq!(session.num_pages, 10);
}

#[tokio::test]
async fn test_change_page_set_sends_value() {
    let (url, server) = serve_once("200 OK", DOC_PAGE_3).await;

    service(&url)
        .change_page(DocumentId(7), PageRequest::Set(3))
        .await
        .unwrap();

    let sent: serde_json::Value = serde_json::from_slice(&server.await.unwrap().body).unwrap();
    assert_eq!(sent, serde_json::json!({ "mode": "set", "page": 3 }));
}

#[tokio::test]
async fn test_open_missing_document_is_not_found() {
    let (url, server) = serve_once("404 Not Found", r#"{"detail":"PDF no encontrado"}"#).await;

    let err = service(&url).open(DocumentId(42), None).await.unwrap_err();

    assert!(server.await.unwrap().request_line().starts_with("POST /api/pdfs/42/open "));
    assert_eq!(
        err,
        PagewaveError::not_found_with_message("document", "42", "PDF no encontrado")
    );
    assert_eq!(err.to_string(), "PDF no encontrado");
}

#[tokio::test]
async fn test_rejected_transition_keeps_server_message() {
    let (url, _server) = serve_once("422 Unprocessable Entity", r#"{"detail":"page out of range"}"#).await;

    let err = service(&url)
        .change_page(DocumentId(7), PageRequest::Set(99))
        .await
        .unwrap_err();

    assert_eq!(err, PagewaveError::invalid_transition("page out of range"));
}

#[tokio::test]
async fn test_server_error_surfaces_status() {
    let (url, _server) = serve_once("503 Service Unavailable", r#"{"detail":"maintenance"}"#).await;

    let err = service(&url).close(DocumentId(7)).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn test_list_passes_query() {
    let body = Box::leak(format!(r#"{{"items":[{DOC_PAGE_3}]}}"#).into_boxed_str());
    let (url, server) = serve_once("200 OK", body).await;

    let items = service(&url).list(Some("fisica")).await.unwrap();

    assert_eq!(items.len(), 1);
    assert!(server.await.unwrap().request_line().starts_with("GET /api/pdfs/?q=fisica "));
}

#[tokio::test]
async fn test_classify_sends_topic() {
    let (url, server) = serve_once("200 OK", DOC_PAGE_3).await;

    service(&url).classify(DocumentId(7), "economía").await.unwrap();

    let sent: serde_json::Value = serde_json::from_slice(&server.await.unwrap().body).unwrap();
    assert_eq!(sent, serde_json::json!({ "topic": "economía" }));
}

#[tokio::test]
async fn test_delete_ignores_body() {
    let (url, server) = serve_once("200 OK", r#"{"ok":true}"#).await;

    service(&url).delete(DocumentId(7)).await.unwrap();

    assert!(server.await.unwrap().request_line().starts_with("DELETE /api/pdfs/7 "));
}

#[tokio::test]
async fn test_remote_classifier_maps_label() {
    let (url, server) = serve_once("200 OK", r#"{"gesture":"next"}"#).await;
    let classifier =
        RemoteGestureClassifier::new(format!("{url}/api/gestures/infer"), Duration::from_secs(5), 70)
            .unwrap();

    let sample = classifier.classify(&frame()).await;

    assert_eq!(sample.label, GestureLabel::Next);
    let captured = server.await.unwrap();
    assert!(captured.request_line().starts_with("POST /api/gestures/infer "));
    assert!(captured.body_text().contains("filename=\"frame.jpg\""));
    assert!(captured.body_text().contains("image/jpeg"));
}

#[tokio::test]
async fn test_remote_classifier_server_error_is_none() {
    let (url, _server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
    let classifier = RemoteGestureClassifier::new(url, Duration::from_secs(5), 70).unwrap();

    let sample = classifier.classify(&frame()).await;

    assert_eq!(sample.label, GestureLabel::None);
}

#[tokio::test]
async fn test_remote_classifier_malformed_body_is_none() {
    let (url, _server) = serve_once("200 OK", r#"{"gesture":"wave"}"#).await;
    let classifier = RemoteGestureClassifier::new(url, Duration::from_secs(5), 70).unwrap();

    assert_eq!(classifier.classify(&frame()).await.label, GestureLabel::None);
}

#[tokio::test]
async fn test_remote_classifier_unreachable_is_none() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let classifier =
        RemoteGestureClassifier::new(format!("http://{addr}"), Duration::from_millis(500), 70).unwrap();

    let frame = frame();
    let sample = classifier.classify(&frame).await;

    assert_eq!(sample.label, GestureLabel::None);
    assert_eq!(sample.timestamp, frame.captured_at);
}
