//! Canned Stack Exchange API for integration tests
//!
//! Serves fixed JSON bodies over plain HTTP on a random local port and
//! records the request line of every call it receives.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Status and body returned for one endpoint
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A running mock API
pub struct MockApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    /// Starts serving `search` for `/search` and `answers` for
    /// `/questions/{id}/answers`; anything else gets a 404
    pub async fn start(search: Reply, answers: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API");
        let addr = listener.local_addr().expect("Mock API has no address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request_line = read_request_line(&mut socket).await;
                let reply = if request_line.contains("/search") {
                    search.clone()
                } else if request_line.contains("/answers") {
                    answers.clone()
                } else {
                    Reply::status(404, "{}")
                };
                recorded.lock().unwrap().push(request_line);

                let response = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.status,
                    reply.body.len(),
                    reply.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Request lines received so far, e.g. `GET /search?... HTTP/1.1`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls to the answer listing endpoint
    pub fn answer_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|line| line.contains("/answers"))
            .count()
    }
}

async fn read_request_line(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

pub const SEARCH_BODY: &str = r#"{
    "items": [
        {
            "question_id": 111,
            "title": "How do I fix &quot;borrowed value does not live long enough&quot;?",
            "link": "https://stackoverflow.com/questions/111/how-do-i-fix-borrowed-value",
            "score": 250,
            "answer_count": 4,
            "is_answered": true
        },
        {
            "question_id": 222,
            "title": "Why can&#39;t I borrow as mutable twice?",
            "link": "https://stackoverflow.com/questions/222/why-cant-i-borrow-as-mutable-twice",
            "score": 120,
            "answer_count": 2,
            "is_answered": true
        }
    ],
    "has_more": false
}"#;

pub const ANSWERS_BODY: &str = r#"{
    "items": [
        {"score": 90, "is_accepted": false, "body": "<p>Most voted, use <code>clone()</code>.</p>"},
        {"score": 40, "is_accepted": true, "body": "<p>Accepted:</p><pre><code>let x = &amp;y;\n</code></pre>"},
        {"score": -2, "is_accepted": false, "body": "<p>Wrong.</p>"}
    ],
    "has_more": false
}"#;

pub const EMPTY_BODY: &str = r#"{"items": [], "has_more": false}"#;
