//! End-to-end: a real server on a local port, driven over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use klotio::endpoints::{self, Group, GroupConfig};
use klotio::log::{Level, RecordingLogger};
use klotio::middleware::intercept;
use klotio::{Context, Fault, Router, Server};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct Running {
    addr: SocketAddr,
    logger: Arc<RecordingLogger>,
    stop: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl Running {
    async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("server did not drain")
            .unwrap();
    }
}

async fn start(routes: impl FnOnce(Router) -> Router) -> Running {
    let logger = Arc::new(RecordingLogger::new());
    let router = routes(Router::new().logger(logger.clone())).get("/bad", intercept(bad));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let signal = async {
            let _ = stopped.await;
        };
        Server::serve_with_shutdown(listener, router, signal).await.unwrap();
    });

    Running { addr, logger, stop: Some(stop), task }
}

async fn bad(_ctx: Context) -> Result<Value, Fault> {
    Err(Fault::msg("whoops"))
}

/// Answers every connection with a fixed JSON body, like the klot-io API.
async fn start_mock_api(body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0_u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

fn standard(router: Router) -> Router {
    endpoints::mount(router, &GroupConfig::default())
}

// No pooling, so connections close and the server can drain on stop.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

#[tokio::test]
async fn health_over_http() {
    let server = start(standard).await;

    let res = client()
        .get(format!("http://{}/health", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"message": "OK"}));

    let records = server.logger.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].extra, Some(json!({"request": {
        "method": "GET",
        "path": "/health",
        "remote_addr": "127.0.0.1",
    }})));

    server.stop().await;
}

#[tokio::test]
async fn query_and_body_reach_the_request_record() {
    let server = start(standard).await;

    let res = client()
        .get(format!("http://{}/health?a=1", server.addr))
        .json(&json!({"b": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    drop(res);

    assert_eq!(server.logger.records()[0].extra, Some(json!({"request": {
        "method": "GET",
        "path": "/health",
        "remote_addr": "127.0.0.1",
        "args": {"a": "1"},
        "json": {"b": 2},
    }})));

    server.stop().await;
}

#[tokio::test]
async fn faults_answer_500_json() {
    let server = start(standard).await;

    let res = client()
        .get(format!("http://{}/bad", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "whoops");
    assert!(!body["traceback"].as_str().unwrap().is_empty());

    let levels: Vec<_> = server.logger.records().iter().map(|r| r.level).collect();
    assert_eq!(levels, vec![Level::Debug, Level::Exception, Level::Debug]);

    server.stop().await;
}

#[tokio::test]
async fn unknown_paths_are_404_and_not_logged() {
    let server = start(standard).await;

    let res = client()
        .get(format!("http://{}/group", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    drop(res);
    assert!(server.logger.records().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn group_proxies_the_member_list() {
    let api = start_mock_api(r#"[{"name":"unit","url":"test"}]"#).await;
    let group = Group::with_client(
        GroupConfig { app: "unittest.klot.io".into(), api: format!("http://{api}") },
        client(),
    );
    let server = start(|router| standard(router).get("/group", group.into_handler())).await;

    let res = client()
        .get(format!("http://{}/group", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"group": [{"name": "unit", "url": "test"}]})
    );

    server.stop().await;
}
