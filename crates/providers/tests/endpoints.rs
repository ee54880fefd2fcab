//! Wire-level tests for the capability clients against a local mock backend.

use providers::chat::ChatClient;
use providers::document::DocumentClient;
use providers::image::ImageClient;
use providers::search::SearchClient;
use shared::api::ChatMessage;
use shared::error::ApiError;
use std::io::Read;

/// Spin up a local backend that answers every request via `route`.
/// Returns the base URL to point a client at.
fn serve<F>(route: F) -> String
where
    F: Fn(&str, &str) -> (u16, String) + Send + 'static,
{
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock server");
    let port = server
        .server_addr()
        .to_ip()
        .expect("mock server has an IP address")
        .port();
    std::thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let url = request.url().to_string();
            let (status, resp_body) = route(&url, &body);
            let header = tiny_http::Header::from_bytes(
                &b"Content-Type"[..],
                &b"application/json"[..],
            )
            .expect("static header");
            let response = tiny_http::Response::from_string(resp_body)
                .with_status_code(status)
                .with_header(header);
            let _ = request.respond(response);
        }
    });
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn chat_sends_history_and_returns_reply() {
    let base = serve(|url, body| {
        assert_eq!(url, "/chat");
        assert!(body.contains("\"role\":\"user\""));
        assert!(body.contains("hello there"));
        (
            200,
            r#"{"choices":[{"message":{"content":"hi, how can I help?"}}]}"#.to_string(),
        )
    });
    let client = ChatClient::new(&base);
    let reply = client
        .complete(vec![ChatMessage {
            role: "user".into(),
            content: "hello there".into(),
        }])
        .await
        .unwrap();
    assert_eq!(reply, "hi, how can I help?");
}

#[tokio::test]
async fn chat_honors_error_field_on_2xx() {
    let base = serve(|_, _| (200, r#"{"error":"model overloaded"}"#.to_string()));
    let client = ChatClient::new(&base);
    match client.complete(Vec::new()).await {
        Err(ApiError::Service(msg)) => assert_eq!(msg, "model overloaded"),
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn chat_reports_bare_non_2xx() {
    let base = serve(|_, _| (502, String::new()));
    let client = ChatClient::new(&base);
    match client.complete(Vec::new()).await {
        Err(ApiError::Service(msg)) => assert!(msg.contains("502")),
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn image_returns_data_uri() {
    let base = serve(|url, body| {
        assert_eq!(url, "/generate-image");
        assert!(body.contains("\"prompt\":\"a sunset\""));
        (200, r#"{"image":"data:image/png;base64,QUJD"}"#.to_string())
    });
    let client = ImageClient::new(&base);
    let uri = client.generate("a sunset").await.unwrap();
    assert_eq!(uri, "data:image/png;base64,QUJD");
}

#[tokio::test]
async fn image_error_field_wins_over_status() {
    // A 500 whose body still carries the error field must surface the
    // field text, not the status line.
    let base = serve(|_, _| (500, r#"{"error":"safety filter"}"#.to_string()));
    let client = ImageClient::new(&base);
    match client.generate("anything").await {
        Err(ApiError::Service(msg)) => assert_eq!(msg, "safety filter"),
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn search_returns_summary_and_sources() {
    let base = serve(|url, body| {
        assert_eq!(url, "/search");
        assert!(body.contains("weather in Paris"));
        (
            200,
            r#"{"choices":[{"message":{"content":"Mild and rainy."}}],
                "sources":[{"title":"Meteo","url":"https://meteo.example"}]}"#
                .to_string(),
        )
    });
    let client = SearchClient::new(&base);
    let answer = client.search("weather in Paris").await.unwrap();
    assert_eq!(answer.text, "Mild and rainy.");
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].title, "Meteo");
}

#[tokio::test]
async fn document_upload_round_trip() {
    let base = serve(|url, body| {
        assert_eq!(url, "/upload-pdf");
        // multipart body: the file part carries the filename, the text
        // part carries the uid
        assert!(body.contains("report.pdf"));
        assert!(body.contains("user-1"));
        (200, r#"{"success":true,"chunks":12}"#.to_string())
    });
    let client = DocumentClient::new(&base);
    let chunks = client
        .upload(b"%PDF-1.4 fake".to_vec(), "report.pdf", "user-1")
        .await
        .unwrap();
    assert_eq!(chunks, 12);
}

#[tokio::test]
async fn document_upload_failure_is_service_error() {
    let base = serve(|_, _| (200, r#"{"success":false}"#.to_string()));
    let client = DocumentClient::new(&base);
    match client.upload(Vec::new(), "x.pdf", "user-1").await {
        Err(ApiError::Service(msg)) => assert_eq!(msg, "upload rejected"),
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn document_query_sends_identity_and_filename() {
    let base = serve(|url, body| {
        assert_eq!(url, "/ask-pdf");
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(parsed["question"], "summarize section 2");
        assert_eq!(parsed["uid"], "user-1");
        assert_eq!(parsed["filename"], "report.pdf");
        (
            200,
            r#"{"choices":[{"message":{"content":"Section 2 covers revenue."}}]}"#.to_string(),
        )
    });
    let client = DocumentClient::new(&base);
    let answer = client
        .ask("summarize section 2", "user-1", "report.pdf")
        .await
        .unwrap();
    assert_eq!(answer, "Section 2 covers revenue.");
}
