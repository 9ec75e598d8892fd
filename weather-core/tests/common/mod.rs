//! Minimal HTTP backend for driving providers against canned responses.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A mock backend listening on an ephemeral port.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request lines seen so far, e.g. `GET /v1/current.json?key=K&q=paris HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a backend that answers every request with `status` and `body`,
/// after waiting `delay`.
pub async fn start_mock_backend(status: u16, body: &'static str, delay: Duration) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]);
                        if let Some(line) = head.lines().next() {
                            seen.lock().unwrap().push(line.to_string());
                        }

                        tokio::time::sleep(delay).await;

                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend { addr, requests }
}
