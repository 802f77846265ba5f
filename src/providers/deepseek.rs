use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::ChatError;
use super::http_errors::chat_request_error;
use crate::config::Config;

const REPLY_POINTER: &str = "/choices/0/message/content";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(cfg: &'a Config, prompt: &'a str) -> Self {
        Self {
            model: &cfg.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: cfg.max_output_tokens,
        }
    }
}

/// Pulls `choices[0].message.content` out of a response body.
///
/// Any missing segment yields an empty reply; only a body that is not JSON
/// at all is an error.
fn extract_reply(body: &str) -> Result<String, serde_json::Error> {
    let parsed: Value = serde_json::from_str(body)?;
    Ok(parsed
        .pointer(REPLY_POINTER)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

pub async fn chat(client: &Client, cfg: &Config, prompt: &str) -> Result<String, ChatError> {
    let api_url = cfg.api_url.as_str();
    let body = ChatCompletionRequest::new(cfg, prompt);
    debug!(
        api_url = %api_url,
        model = %cfg.model,
        prompt_chars = prompt.chars().count(),
        max_tokens = cfg.max_output_tokens,
        "sending chat completion request"
    );

    let response = client
        .post(api_url)
        .header(AUTHORIZATION, format!("Bearer {}", cfg.api_key))
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            debug!(api_url = %api_url, error = %err, "chat completion request failed");
            chat_request_error(err, api_url)
        })?;

    let status = response.status();
    if !status.is_success() {
        debug!(
            api_url = %api_url,
            model = %cfg.model,
            status = %status,
            "chat API returned non-success status"
        );
        return Err(ChatError::Status(status));
    }

    let text = response.text().await.map_err(|err| {
        debug!(api_url = %api_url, error = %err, "failed to read chat completion body");
        chat_request_error(err, api_url)
    })?;

    let reply = extract_reply(&text).map_err(|err| {
        debug!(
            api_url = %api_url,
            response_body_len = text.len(),
            error = %err,
            "chat completion body is not valid JSON"
        );
        ChatError::Unknown(format!("failed to parse chat completion response: {err}"))
    })?;

    debug!(
        model = %cfg.model,
        reply_chars = reply.chars().count(),
        "received chat completion"
    );
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use serde_json::{Value, json};
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    use super::{ChatCompletionRequest, chat, extract_reply};
    use crate::config::Config;
    use crate::providers::ChatError;

    fn test_config(api_url: &str) -> Config {
        Config {
            api_key: "sk-test".to_string(),
            max_input_length: 500,
            max_output_tokens: 50,
            model: "deepseek-chat".to_string(),
            api_url: api_url.to_string(),
        }
    }

    fn local_client() -> Client {
        Client::builder()
            .no_proxy()
            .build()
            .expect("client should build")
    }

    fn header_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|window| window == b"\r\n\r\n")
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = stream.read(&mut chunk).expect("read should succeed");
            if read == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..read]);

            if let Some(end) = header_end(&buf) {
                let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        let addr = listener.local_addr().expect("address should be available");
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept should succeed");
            let request = read_request(&mut stream);
            stream
                .write_all(response.as_bytes())
                .expect("write should succeed");
            request
        });
        (format!("http://{addr}/v1/chat/completions"), server)
    }

    fn request_body(request: &str) -> Value {
        let (_, body) = request
            .split_once("\r\n\r\n")
            .expect("request should have a body");
        serde_json::from_str(body).expect("request body should be JSON")
    }

    #[test]
    fn request_serializes_to_expected_wire_format() {
        let cfg = test_config("http://localhost");
        let body = serde_json::to_value(ChatCompletionRequest::new(&cfg, "hi")).expect("serialize");
        assert_eq!(
            body,
            json!({
                "model": "deepseek-chat",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 50
            })
        );
    }

    #[test]
    fn extract_reply_reads_first_choice_content() {
        let reply = extract_reply(r#"{"choices":[{"message":{"content":"**Hi** there!"}}]}"#)
            .expect("valid JSON");
        assert_eq!(reply, "**Hi** there!");
    }

    #[test]
    fn extract_reply_degrades_to_empty_for_missing_segments() {
        for body in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"[]"#,
        ] {
            assert_eq!(extract_reply(body).expect("valid JSON"), "", "body: {body}");
        }
    }

    #[test]
    fn extract_reply_rejects_non_json() {
        assert!(extract_reply("<html>bad gateway</html>").is_err());
    }

    #[tokio::test]
    async fn chat_sends_bearer_token_and_returns_reply() {
        let (api_url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"**Hi** there!"}}]}"#,
        );
        let cfg = test_config(&api_url);

        let reply = chat(&local_client(), &cfg, "hello")
            .await
            .expect("chat should succeed");
        assert_eq!(reply, "**Hi** there!");

        let request = server.join().expect("server thread should join");
        let lowered = request.to_ascii_lowercase();
        assert!(lowered.starts_with("post /v1/chat/completions "), "request: {request}");
        assert!(lowered.contains("authorization: bearer sk-test"), "request: {request}");
        assert!(lowered.contains("content-type: application/json"), "request: {request}");
        assert_eq!(
            request_body(&request),
            json!({
                "model": "deepseek-chat",
                "messages": [{"role": "user", "content": "hello"}],
                "max_tokens": 50
            })
        );
    }

    #[tokio::test]
    async fn chat_returns_empty_reply_when_choices_are_missing() {
        let (api_url, server) = serve_once("200 OK", r#"{"id":"abc"}"#);
        let cfg = test_config(&api_url);

        let reply = chat(&local_client(), &cfg, "hello")
            .await
            .expect("missing choices should not fail");
        assert_eq!(reply, "");
        server.join().expect("server thread should join");
    }

    #[tokio::test]
    async fn chat_reports_non_success_status() {
        let (api_url, server) = serve_once("401 Unauthorized", r#"{"error":"bad key"}"#);
        let cfg = test_config(&api_url);

        let err = chat(&local_client(), &cfg, "hello")
            .await
            .expect_err("401 should fail");
        assert!(
            matches!(err, ChatError::Status(StatusCode::UNAUTHORIZED)),
            "unexpected error: {err:?}"
        );
        server.join().expect("server thread should join");
    }

    #[tokio::test]
    async fn chat_reports_unparseable_body_as_unknown_failure() {
        let (api_url, server) = serve_once("200 OK", "not json");
        let cfg = test_config(&api_url);

        let err = chat(&local_client(), &cfg, "hello")
            .await
            .expect_err("invalid JSON should fail");
        assert!(matches!(err, ChatError::Unknown(_)), "unexpected error: {err:?}");
        server.join().expect("server thread should join");
    }
}
