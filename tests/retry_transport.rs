use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use serde_json::json;
use solomon_http::{send, Method, Payload, RequestDescriptor, RetryPolicy, SolomonError};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

const OK_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 7\r\nconnection: close\r\n\r\n{\"a\":1}";

/// Server that closes the first `drops` connections without answering and
/// serves a JSON body on the rest.
struct FlakyServer {
    url: String,
    connections: Arc<AtomicUsize>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for FlakyServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl FlakyServer {
    fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

async fn answer(mut stream: TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
        if request.windows(4).any(|window| window == b"\r\n\r\n") {
            break;
        }
    }
    let _ = stream.write_all(OK_RESPONSE).await;
    let _ = stream.shutdown().await;
}

async fn spawn_flaky_server(drops: usize) -> FlakyServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();

    let task = tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if seen <= drops {
                drop(stream);
                continue;
            }
            tokio::spawn(answer(stream));
        }
    });

    FlakyServer {
        url: format!("http://{address}/data"),
        connections,
        task,
    }
}

fn policy(max_attempts: usize, base_delay_ms: u64) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay_ms,
        ..RetryPolicy::default()
    }
}

fn get(url: &str) -> RequestDescriptor {
    RequestDescriptor::parse(Method::GET, url)
        .expect("must parse url")
        .timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn recovers_after_dropped_connections_with_backoff() {
    let server = spawn_flaky_server(2).await;
    let http = reqwest::Client::new();

    let started = Instant::now();
    let payload = send(&http, &get(&server.url), &policy(3, 40))
        .await
        .expect("third attempt must succeed");

    assert_eq!(payload, Payload::Json(json!({"a": 1})));
    assert_eq!(server.connections(), 3);
    // 40ms after the first failure, 80ms after the second
    assert!(started.elapsed() >= Duration::from_millis(120));
}

#[tokio::test]
async fn gives_up_after_three_attempts() {
    let server = spawn_flaky_server(usize::MAX).await;
    let http = reqwest::Client::new();

    let err = send(&http, &get(&server.url), &RetryPolicy {
        base_delay_ms: 5,
        ..RetryPolicy::default()
    })
    .await
    .expect_err("every attempt must fail");

    assert!(matches!(err, SolomonError::Transport(_)));
    assert_eq!(server.connections(), 3);
}

#[tokio::test]
async fn single_attempt_policy_does_not_retry() {
    let server = spawn_flaky_server(1).await;
    let http = reqwest::Client::new();

    let err = send(&http, &get(&server.url), &RetryPolicy::no_retry())
        .await
        .expect_err("only attempt must fail");

    assert!(matches!(err, SolomonError::Transport(_)));
    assert_eq!(server.connections(), 1);
}

#[tokio::test]
async fn refused_connection_is_retried_then_surfaced() {
    let address = {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("must bind placeholder listener");
        listener.local_addr().expect("must have local addr")
    };
    let http = reqwest::Client::new();

    let started = Instant::now();
    let err = send(&http, &get(&format!("http://{address}/")), &policy(3, 15))
        .await
        .expect_err("nothing listens on the port");

    match err {
        SolomonError::Transport(inner) => assert!(inner.is_connect()),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(started.elapsed() >= Duration::from_millis(45));
}
