//! Canned HTTP responders for transport tests
//!
//! Minimal raw-socket servers bound to an ephemeral local port. Each
//! accepted connection consumes the next scripted response and records the
//! raw request text for assertions.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// One scripted HTTP response
#[derive(Debug, Clone)]
pub(crate) struct CannedResponse {
    pub delay: Duration,
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    /// 200 response with the given body
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    /// Response with an explicit status code
    pub fn status(status: u16, body: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            status,
            body: body.to_string(),
        }
    }

    /// Response held back for `delay` before being written
    pub fn delayed(delay: Duration, status: u16, body: &str) -> Self {
        Self {
            delay,
            status,
            body: body.to_string(),
        }
    }
}

/// Spawn a scripted one-response-per-connection server
///
/// Returns the bound address plus the captured raw requests in accept
/// order. Connections beyond the script get an empty 500.
pub(crate) async fn spawn_server(
    script: Vec<CannedResponse>,
) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener addr");

    let script = Arc::new(Mutex::new(script.into_iter().collect::<VecDeque<_>>()));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = requests.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };

            let response = script
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| CannedResponse::status(500, ""));
            let captured = captured.clone();

            tokio::spawn(async move {
                let mut raw = Vec::new();
                let mut buf = [0u8; 16 * 1024];

                // Read until the client pauses; enough to capture one request
                loop {
                    match tokio::time::timeout(Duration::from_millis(100), stream.read(&mut buf))
                        .await
                    {
                        Ok(Ok(0)) => break,
                        Ok(Ok(n)) => raw.extend_from_slice(&buf[..n]),
                        _ => break,
                    }
                }

                captured
                    .lock()
                    .await
                    .push(String::from_utf8_lossy(&raw).into_owned());

                if !response.delay.is_zero() {
                    tokio::time::sleep(response.delay).await;
                }

                let reply = format!(
                    "HTTP/1.1 {} CANNED\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    response.body.len(),
                    response.body
                );
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (addr, requests)
}
