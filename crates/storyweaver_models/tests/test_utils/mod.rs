//! Test utilities for model client tests.
//!
//! A one-shot HTTP listener that stands in for the OpenAI Images API,
//! records the request it receives and answers with a tiny PNG.

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Base64 of the bytes `[0x89, 'P', 'N', 'G']`.
pub const PNG_B64: &str = "iVBORw==";

/// The bytes an image service stub answers with.
pub const PNG_BYTES: [u8; 4] = [0x89, b'P', b'N', b'G'];

/// One HTTP request as received by the stub.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// e.g. `POST /images/edits HTTP/1.1`
    pub request_line: String,
    /// Header names as sent, values trimmed
    pub headers: Vec<(String, String)>,
    /// Raw request body
    pub body: Vec<u8>,
}

impl CapturedRequest {
    /// Method and path, e.g. `POST /images/generations`.
    pub fn method_and_path(&self) -> String {
        self.request_line
            .split_whitespace()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body decoded lossily as UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Start a stub image service that accepts a single request.
///
/// Returns the base URL to configure and a handle resolving to the
/// captured request once the response has been sent.
pub async fn image_service_stub()
-> anyhow::Result<(String, JoinHandle<anyhow::Result<CapturedRequest>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let handle = tokio::spawn(answer_once(listener));
    Ok((base_url, handle))
}

async fn answer_once(listener: TcpListener) -> anyhow::Result<CapturedRequest> {
    let (mut stream, _) = listener.accept().await?;
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        let read = stream.read(&mut chunk).await?;
        anyhow::ensure!(read > 0, "connection closed before request headers");
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(position) = find(&buffer, b"\r\n\r\n") {
            break position + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok());

    let mut body = buffer[header_end..].to_vec();
    loop {
        let complete = match content_length {
            Some(length) => body.len() >= length,
            // Chunked: the terminating chunk ends the body
            None => body.ends_with(b"0\r\n\r\n"),
        };
        if complete {
            break;
        }
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }

    let payload = format!(r#"{{"created":1,"data":[{{"b64_json":"{}"}}]}}"#, PNG_B64);
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
