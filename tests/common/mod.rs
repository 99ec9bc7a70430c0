//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use upstream_status_exporter::config::MetricsConfig;
use upstream_status_exporter::StatusCollector;

/// The five-backend document served by the reference upstream.
#[allow(dead_code)]
pub const NGINX_STATUS: &str = "0,us1,10.1.0.1:80,up,8247,0,tcp,0
1,us1,10.1.0.2:80,up,8251,0,tcp,0
2,us2,10.1.0.3:80,up,8251,0,tcp,0
3,us2,10.1.0.4:80,up,8247,0,tcp,0
4,us2,10.1.0.5:80,up,7918,0,tcp,0
";

/// Start a mock upstream that always returns `body` with status 200.
#[allow(dead_code)]
pub async fn start_mock_upstream(body: &'static str) -> SocketAddr {
    start_programmable_upstream(move || async move { (200, body.to_string()) }).await
}

/// Start a programmable mock upstream. Each request calls `f` for its
/// status code and body.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let (status, body) = f().await;
                        let response = format!(
                            "HTTP/1.1 {} Status\r\n\
                             Content-Type: text/plain\r\n\
                             Content-Length: {}\r\n\
                             Connection: close\r\n\r\n{}",
                            status,
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

    addr
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Client with a 2s timeout that bypasses any proxy from the environment.
#[allow(dead_code)]
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .no_proxy()
        .build()
        .unwrap()
}

/// Upstream URI served by a mock at `addr`.
#[allow(dead_code)]
pub fn status_uri(addr: SocketAddr) -> String {
    format!("http://{}/status", addr)
}

/// Collector with default naming scraping [`status_uri`] through
/// [`test_client`].
#[allow(dead_code)]
pub fn collector_for(addr: SocketAddr) -> StatusCollector {
    StatusCollector::with_client(status_uri(addr), test_client(), &MetricsConfig::default())
        .unwrap()
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}
