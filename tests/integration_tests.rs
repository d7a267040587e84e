//! Integration tests for the geminichat library.
//! These tests run the client against a throwaway HTTP server on localhost.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use geminichat::chat::{ChatSession, ImageUpload};
    use geminichat::{
        Blob, ClientLogger, ContentPart, Credential, Error, Gemini, GenerateContentRequest,
        GenerateContentResponse, KnownModel, Model, Renderer, Role, Turn,
    };

    /// A request as the server saw it.
    struct Captured {
        request_line: String,
        body: Value,
    }

    /// Serve exactly one request with the given status and body.
    async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1beta/", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let (head, request_body) = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status} Status\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            Captured {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: serde_json::from_slice(&request_body).unwrap(),
            }
        });
        (base_url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> (String, Vec<u8>) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body");
            buf.extend_from_slice(&chunk[..n]);
        }
        (head, buf[header_end..header_end + content_length].to_vec())
    }

    fn client(base_url: String) -> Gemini {
        Gemini::with_options(
            Some(base_url),
            Model::Known(KnownModel::Gemini25FlashPreview0520),
            Some(Duration::from_secs(5)),
        )
        .unwrap()
    }

    fn key() -> Credential {
        Credential::new("test-key").unwrap()
    }

    fn hello() -> GenerateContentRequest {
        GenerateContentRequest::new(vec![Turn::user(vec![ContentPart::text("Hello")])])
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<String>>,
    }

    impl ClientLogger for RecordingLogger {
        fn log_request(&self, request: &GenerateContentRequest) {
            self.events
                .lock()
                .unwrap()
                .push(format!("request:{}", request.contents.len()));
        }

        fn log_response(&self, response: &GenerateContentResponse) {
            self.events
                .lock()
                .unwrap()
                .push(format!("response:{}", response.candidates.len()));
        }

        fn log_error(&self, error: &Error) {
            self.events.lock().unwrap().push(format!("error:{error}"));
        }
    }

    struct QuietRenderer;

    impl Renderer for QuietRenderer {
        fn start_turn(&mut self, _: Role) {}
        fn print_text(&mut self, _: &str) {}
        fn print_image(&mut self, _: &Blob) {}
        fn finish_turn(&mut self) {}
        fn start_waiting(&mut self) {}
        fn finish_waiting(&mut self) {}
        fn print_error(&mut self, _: &str) {}
        fn print_warning(&mut self, _: &str) {}
        fn print_info(&mut self, _: &str) {}
        fn print_response_body(&mut self, _: &str) {}
    }

    #[tokio::test]
    async fn reply_text_is_concatenated() {
        let (base_url, server) = serve_once(
            200,
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi "},{"text":"there!"}]},"finishReason":"STOP"}]}"#,
        )
        .await;

        let reply = client(base_url).send(&hello(), &key()).await.unwrap();
        assert_eq!(reply, "Hi there!");

        let captured = server.await.unwrap();
        assert!(captured.request_line.starts_with(
            "POST /v1beta/models/gemini-2.5-flash-preview-05-20:generateContent?key=test-key "
        ));
        assert_eq!(
            captured.body,
            json!({"contents": [{"role": "user", "parts": [{"text": "Hello"}]}]})
        );
    }

    #[tokio::test]
    async fn http_error_keeps_status_and_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let (base_url, server) = serve_once(400, body).await;

        let err = client(base_url).send(&hello(), &key()).await.unwrap_err();
        assert!(err.is_http());
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.response_body(), Some(body));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn no_candidates_is_malformed() {
        let (base_url, server) = serve_once(200, r#"{"candidates":[]}"#).await;

        let err = client(base_url).send(&hello(), &key()).await.unwrap_err();
        assert!(err.is_malformed_response());
        assert_eq!(err.response_body(), Some(r#"{"candidates":[]}"#));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn candidate_without_content_is_malformed() {
        let (base_url, server) =
            serve_once(200, r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).await;

        let err = client(base_url).send(&hello(), &key()).await.unwrap_err();
        assert!(err.is_malformed_response());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn content_without_parts_is_malformed() {
        let body = r#"{"candidates":[{"content":{"role":"model"},"finishReason":"MAX_TOKENS"}]}"#;
        let (base_url, server) = serve_once(200, body).await;

        let err = client(base_url).send(&hello(), &key()).await.unwrap_err();
        assert!(err.is_malformed_response());
        assert_eq!(err.response_body(), Some(body));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn non_json_success_is_unexpected() {
        let (base_url, server) = serve_once(200, "<html>gateway</html>").await;

        let err = client(base_url).send(&hello(), &key()).await.unwrap_err();
        assert!(err.is_unexpected());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1beta/", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = Gemini::with_options(
            Some(base_url),
            Model::default(),
            Some(Duration::from_millis(200)),
        )
        .unwrap();
        let err = client.send(&hello(), &key()).await.unwrap_err();
        assert!(err.is_timeout());
        assert!(!err.to_string().contains("test-key"));
        server.abort();
    }

    #[tokio::test]
    async fn refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1beta/", listener.local_addr().unwrap());
        drop(listener);

        let err = client(base_url).send(&hello(), &key()).await.unwrap_err();
        assert!(err.is_connection());
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn logger_sees_request_and_response() {
        let (base_url, server) = serve_once(
            200,
            r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#,
        )
        .await;
        let logger = Arc::new(RecordingLogger::default());

        let client = client(base_url).with_logger(logger.clone());
        client.send(&hello(), &key()).await.unwrap();
        server.await.unwrap();

        assert_eq!(
            *logger.events.lock().unwrap(),
            vec!["request:1".to_string(), "response:1".to_string()]
        );
    }

    #[tokio::test]
    async fn logger_sees_errors() {
        let (base_url, server) = serve_once(503, r#"{"error":{"code":503}}"#).await;
        let logger = Arc::new(RecordingLogger::default());

        let client = client(base_url).with_logger(logger.clone());
        client.send(&hello(), &key()).await.unwrap_err();
        server.await.unwrap();

        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![
                "request:1".to_string(),
                "error:HTTP error from Gemini API: 503".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn session_sends_image_and_commits_reply() {
        let (base_url, server) = serve_once(
            200,
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"A red dot."}]}}]}"#,
        )
        .await;
        let mut session = ChatSession::new(client(base_url), Some(key()));
        let mut renderer = QuietRenderer;

        session.form_mut().set_text("What is this?");
        session
            .form_mut()
            .attach_image(ImageUpload::new("dot.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff]));
        let reply = session.submit(&mut renderer).await.unwrap();
        assert_eq!(reply, "A red dot.");
        assert_eq!(session.turn_count(), 2);

        let captured = server.await.unwrap();
        assert_eq!(
            captured.body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "What is this?"},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/"}}
                    ]
                }]
            })
        );
    }

    #[tokio::test]
    async fn session_rolls_back_on_server_error() {
        let (base_url, server) = serve_once(500, r#"{"error":{"code":500}}"#).await;
        let mut session = ChatSession::new(client(base_url), Some(key()));
        let mut renderer = QuietRenderer;

        session.form_mut().set_text("Hello");
        let err = session.submit(&mut renderer).await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert!(session.history().is_empty());
        assert!(session.form().is_empty());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn session_rolls_back_when_reply_has_no_parts() {
        let (base_url, server) = serve_once(
            200,
            r#"{"candidates":[{"content":{"role":"model"},"finishReason":"MAX_TOKENS"}]}"#,
        )
        .await;
        let mut session = ChatSession::new(client(base_url), Some(key()));
        let mut renderer = QuietRenderer;

        session.form_mut().set_text("Write a very long story");
        let err = session.submit(&mut renderer).await.unwrap_err();
        assert!(err.is_malformed_response());
        assert!(session.history().is_empty());
        assert_eq!(session.stats().rolled_back_turns, 1);
        server.await.unwrap();
    }
}
