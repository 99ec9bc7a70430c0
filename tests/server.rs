//! End-to-end tests through the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use upstream_status_exporter::config::TelemetryConfig;
use upstream_status_exporter::{HttpServer, Shutdown};

mod common;

async fn start_exporter(
    upstream: SocketAddr,
    telemetry: &TelemetryConfig,
) -> (SocketAddr, Shutdown) {
    let collector = Arc::new(common::collector_for(upstream));
    let server = HttpServer::new(telemetry, collector);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let upstream = common::start_mock_upstream(common::NGINX_STATUS).await;
    let (addr, shutdown) = start_exporter(upstream, &TelemetryConfig::default()).await;

    let res = client()
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .expect("exporter unreachable");

    assert_eq!(res.status(), 200);
    let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain; version=0.0.4"));

    let body = res.text().await.unwrap();
    assert!(body.contains("# TYPE nginx_up gauge"));
    assert!(body.contains("nginx_up 1"));
    assert!(body.lines().any(|line| line.starts_with("nginx_raise{")
        && line.contains(r#"name="10.1.0.5:80""#)
        && line.contains(r#"upstream="us2""#)
        && line.ends_with(" 7918")));
    assert!(body.contains(r#"nginx_exporter_scrape_errors_total{collector="raise"} 0"#));
    assert!(!body.contains("nginx_fail{"));
    assert_eq!(body.matches("nginx_raise{").count(), 5);

    shutdown.trigger();
}

#[tokio::test]
async fn test_metrics_with_upstream_down() {
    let upstream = common::closed_address().await;
    let (addr, shutdown) = start_exporter(upstream, &TelemetryConfig::default()).await;

    let res = client()
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .expect("exporter unreachable");

    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("nginx_up 0"));
    assert!(!body.contains("nginx_raise{"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_landing_page_uses_configured_path() {
    let upstream = common::closed_address().await;
    let telemetry = TelemetryConfig {
        metrics_path: "/stats".into(),
        ..TelemetryConfig::default()
    };
    let (addr, shutdown) = start_exporter(upstream, &telemetry).await;

    for path in ["/", "/anything/else"] {
        let res = client()
            .get(format!("http://{}{}", addr, path))
            .send()
            .await
            .expect("exporter unreachable");
        assert_eq!(res.status(), 200);
        let body = res.text().await.unwrap();
        assert!(body.contains("<a href=\"/stats\">Metrics</a>"));
    }

    let res = client()
        .get(format!("http://{}/stats", addr))
        .send()
        .await
        .unwrap();
    assert!(res.text().await.unwrap().contains("nginx_up 0"));

    shutdown.trigger();
}
