//! End-to-end turns through the host against a local mock backend.

use chat_host::{ChatHost, HostError, SessionMode};
use shared::chat::MessageKind;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn serve<F>(route: F) -> String
where
    F: Fn(&str, &str) -> (u16, String) + Send + 'static,
{
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock backend");
    let port = server
        .server_addr()
        .to_ip()
        .expect("mock backend has an IP address")
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
async fn image_turn_appends_image_message() {
    let base = serve(|url, body| {
        assert_eq!(url, "/generate-image");
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(parsed["prompt"], "generate image of a sunset");
        (200, r#"{"image":"data:image/png;base64,QUJD"}"#.to_string())
    });
    let mut host = ChatHost::new(&base, "user-1");

    let reply = host.send("generate image of a sunset").await.unwrap();
    assert_eq!(reply.kind, MessageKind::Image);
    assert_eq!(
        reply.text,
        "Here's your image for: \"generate image of a sunset\""
    );
    assert_eq!(reply.image.as_deref(), Some("data:image/png;base64,QUJD"));

    let log = host.session().messages();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].text, "generate image of a sunset");
}

#[tokio::test]
async fn search_failure_degrades_to_inline_message() {
    let base = serve(|url, _| {
        assert_eq!(url, "/search");
        (200, r#"{"error":"timeout"}"#.to_string())
    });
    let mut host = ChatHost::new(&base, "user-1");

    let reply = host.send("what's the weather in Paris").await.unwrap();
    assert_eq!(reply.text, "Search error: timeout");
    assert_eq!(reply.kind, MessageKind::Text);
    // The session stays usable after a failure.
    assert!(!host.busy_flag().is_busy());
    assert_eq!(host.session().messages().len(), 2);
}

#[tokio::test]
async fn document_mode_routes_every_turn_to_the_document() {
    let base = serve(|url, body| match url {
        "/upload-pdf" => (200, r#"{"success":true,"chunks":12}"#.to_string()),
        "/ask-pdf" => {
            let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
            assert_eq!(parsed["question"], "summarize section 2");
            assert_eq!(parsed["uid"], "user-1");
            assert_eq!(parsed["filename"], "report.pdf");
            (
                200,
                r#"{"choices":[{"message":{"content":"Section 2 covers revenue."}}]}"#
                    .to_string(),
            )
        }
        other => panic!("unexpected route {}", other),
    });
    let mut host = ChatHost::new(&base, "user-1");
    host.session_mut().append_user("earlier unrelated chat");

    let chunks = host
        .upload_document(b"%PDF-1.4 fake".to_vec(), "report.pdf")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chunks, 12);
    assert_eq!(host.session().mode(), SessionMode::DocumentQuery);
    // fresh document session: only the upload confirmation remains
    assert_eq!(host.session().messages().len(), 1);

    // even an image-keyword utterance stays a document query in this mode
    let reply = host.send("summarize section 2").await.unwrap();
    assert_eq!(reply.text, "Section 2 covers revenue.");
    assert_eq!(host.session().messages().len(), 3);
}

#[tokio::test]
async fn send_rejected_while_dispatch_outstanding() {
    let base = serve(|_, _| (200, r#"{"choices":[]}"#.to_string()));
    let mut host = ChatHost::new(&base, "user-1");

    let _outstanding = host.busy_flag().try_acquire().unwrap();
    match host.send("hello").await {
        Err(HostError::Busy) => {}
        other => panic!("expected busy rejection, got {:?}", other),
    }
    // the rejected turn must not touch the log
    assert!(host.session().is_empty());
}

#[tokio::test]
async fn chat_history_grows_by_two_per_turn() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let base = serve(move |url, body| {
        assert_eq!(url, "/chat");
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
        let n = parsed["messages"].as_array().unwrap().len();
        match seen.fetch_add(1, Ordering::SeqCst) {
            0 => assert_eq!(n, 1), // just the new utterance
            _ => assert_eq!(n, 3), // prior user + assistant + new utterance
        }
        (
            200,
            r#"{"choices":[{"message":{"content":"ok"}}]}"#.to_string(),
        )
    });
    let mut host = ChatHost::new(&base, "user-1");

    host.send("explain quantum computing").await.unwrap();
    host.send("shorter please").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(host.session().messages().len(), 4);
}
