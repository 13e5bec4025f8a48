//! Integration tests for the HTTP server over real TCP connections.
//!
//! Each test binds port 0 on localhost, runs `serve` in a background task
//! against a `ConfigStore<DirFs>` in a fresh temporary directory, and talks
//! raw HTTP/1.1 to it the way a browser posting the configuration form would.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use solax_core::{ConfigFs, ConfigStore, DirFs, MemoryFs};
use solax_webui::domain::ServerConfig;
use solax_webui::infrastructure::serve;

// ── Harness ───────────────────────────────────────────────────────────────────

struct TestServer {
    addr: SocketAddr,
    dir: PathBuf,
    running: Arc<AtomicBool>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Starts a server on a fresh data directory, optionally pre-seeded with
    /// a `BaseConfig.json`.
    async fn start(seed: Option<&str>) -> Self {
        let dir = std::env::temp_dir().join(format!("solax_http_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        if let Some(seed) = seed {
            std::fs::write(dir.join("BaseConfig.json"), seed).unwrap();
        }

        let store = ConfigStore::open(DirFs::open(dir.clone()).unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ServerConfig {
            bind_addr: addr,
            data_dir: dir.clone(),
            ..ServerConfig::default()
        };
        let running = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(serve(
            listener,
            config,
            Arc::new(Mutex::new(store)),
            Arc::clone(&running),
        ));

        Self {
            addr,
            dir,
            running,
            task,
        }
    }

    /// Sends `raw` and returns the full response text (the server closes the
    /// connection after every response).
    async fn send(&self, raw: &[u8]) -> String {
        send_raw(self.addr, raw).await
    }

    async fn get(&self, path: &str) -> String {
        self.send(format!("GET {path} HTTP/1.1\r\nHost: device\r\n\r\n").as_bytes())
            .await
    }

    async fn post(&self, path: &str, content_type: &str, body: &str) -> String {
        self.send(
            format!(
                "POST {path} HTTP/1.1\r\nHost: device\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            )
            .as_bytes(),
        )
        .await
    }

    fn stored_file(&self) -> Option<String> {
        std::fs::read_to_string(self.dir.join("BaseConfig.json")).ok()
    }

    async fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        self.task.await.unwrap().unwrap();
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

/// Sends `raw` to `addr` and reads until the server closes the connection.
async fn send_raw(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

/// In-memory filesystem whose writes block the calling thread, like a slow
/// flash erase.
struct SlowFs {
    inner: MemoryFs,
    write_delay: Duration,
}

impl ConfigFs for SlowFs {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        self.inner.read(name)
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        std::thread::sleep(self.write_delay);
        self.inner.write(name, bytes)
    }
}

fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or_default()
}

fn body(response: &str) -> &str {
    response.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or_default()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_first_boot_page_shows_defaults() {
    // Arrange
    let server = TestServer::start(None).await;

    // Act
    let response = server.get("/").await;

    // Assert
    assert_eq!(status_line(&response), "HTTP/1.1 200 OK");
    assert!(response.contains("Content-Type: text/html"));
    assert!(response.contains("name='mqttserver' type='text' value='test.mosquitto.org'"));
    assert!(response.contains("<tr id='SelectLAN' class='hide'>"));
    assert!(server.stored_file().is_none());

    server.stop().await;
}

#[tokio::test]
async fn test_form_post_persists_and_page_reflects_it() {
    // Arrange
    let server = TestServer::start(None).await;
    // json={"mqttroot":"garage","SelectConnectivity":"eth","SelectLAN":"WT32-ETH01","mqttport":"1884"}
    let form = "json=%7B%22mqttroot%22%3A%22garage%22%2C%22SelectConnectivity%22%3A%22eth%22%2C%22SelectLAN%22%3A%22WT32-ETH01%22%2C%22mqttport%22%3A%221884%22%7D";

    // Act
    let stored = server
        .post("/StoreBaseConfig", "application/x-www-form-urlencoded", form)
        .await;
    let page = server.get("/").await;

    // Assert
    assert_eq!(status_line(&stored), "HTTP/1.1 303 See Other");
    assert!(stored.contains("Location: /\r\n"));
    assert_eq!(
        server.stored_file().as_deref(),
        Some(r#"{"mqttroot":"garage","SelectConnectivity":"eth","SelectLAN":"WT32-ETH01","mqttport":"1884"}"#)
    );
    assert!(page.contains("name='mqttroot' type='text' value='garage'"));
    assert!(page.contains("<tr id='SelectLAN' class=''>"));
    assert!(page.contains("value='1884'"));

    server.stop().await;
}

#[tokio::test]
async fn test_config_json_reports_effective_values() {
    let server = TestServer::start(Some(r#"{"mqttbasepath":"home/inverter/","debuglevel":-2}"#)).await;

    let response = server.get("/BaseConfig.json").await;

    assert_eq!(status_line(&response), "HTTP/1.1 200 OK");
    let doc: Value = serde_json::from_str(body(&response)).unwrap();
    assert_eq!(doc["mqttbasepath"], "home/inverter");
    assert_eq!(doc["debuglevel"], 0);
    assert_eq!(doc["mqttserver"], "test.mosquitto.org");

    server.stop().await;
}

#[tokio::test]
async fn test_raw_json_post_is_accepted() {
    let server = TestServer::start(None).await;

    let response = server
        .post("/StoreBaseConfig", "application/json", r#"{"UseRandomClientID":"none"}"#)
        .await;
    let view = server.get("/BaseConfig.json").await;

    assert_eq!(status_line(&response), "HTTP/1.1 303 See Other");
    let doc: Value = serde_json::from_str(body(&view)).unwrap();
    assert_eq!(doc["UseRandomClientID"], "none");

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_post_is_rejected_and_file_untouched() {
    // Arrange
    let seed = r#"{"mqttroot":"keep"}"#;
    let server = TestServer::start(Some(seed)).await;

    // Act
    let response = server
        .post("/StoreBaseConfig", "application/json", "{not json")
        .await;

    // Assert
    assert_eq!(status_line(&response), "HTTP/1.1 400 Bad Request");
    assert_eq!(server.stored_file().as_deref(), Some(seed));

    server.stop().await;
}

#[tokio::test]
async fn test_unknown_path_and_wrong_method() {
    let server = TestServer::start(None).await;

    let missing = server.get("/nope").await;
    let wrong = server.get("/StoreBaseConfig").await;

    assert_eq!(status_line(&missing), "HTTP/1.1 404 Not Found");
    assert_eq!(status_line(&wrong), "HTTP/1.1 405 Method Not Allowed");
    assert!(wrong.contains("Allow: POST\r\n"));

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_body_is_refused() {
    let server = TestServer::start(None).await;

    // Only the head is sent; the server must refuse on Content-Length alone.
    let response = server
        .send(b"POST /StoreBaseConfig HTTP/1.1\r\nContent-Length: 100000\r\n\r\n")
        .await;

    assert_eq!(status_line(&response), "HTTP/1.1 413 Payload Too Large");
    assert!(server.stored_file().is_none());

    server.stop().await;
}

#[tokio::test]
async fn test_garbage_request_line_is_bad_request() {
    let server = TestServer::start(None).await;

    let response = server.send(b"HELLO\r\n\r\n").await;

    assert_eq!(status_line(&response), "HTTP/1.1 400 Bad Request");

    server.stop().await;
}

#[tokio::test]
async fn test_slow_save_does_not_stall_other_connections() {
    // Arrange: `#[tokio::test]` runs a single runtime thread, so a save that
    // blocked it would also hold up every other connection.
    let write_delay = Duration::from_millis(1500);
    let store = ConfigStore::open(SlowFs {
        inner: MemoryFs::new(),
        write_delay,
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let running = Arc::new(AtomicBool::new(true));
    let server = tokio::spawn(serve(
        listener,
        ServerConfig {
            bind_addr: addr,
            ..ServerConfig::default()
        },
        Arc::new(Mutex::new(store)),
        Arc::clone(&running),
    ));

    let body = r#"{"mqttroot":"slow"}"#;
    let save_request = format!(
        "POST /StoreBaseConfig HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    let save = tokio::spawn(async move { send_raw(addr, save_request.as_bytes()).await });
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Act: a request that never needs the store, sent while the save is
    // still writing
    let started = Instant::now();
    let refused = send_raw(
        addr,
        b"POST /StoreBaseConfig HTTP/1.1\r\nContent-Length: 100000\r\n\r\n",
    )
    .await;
    let elapsed = started.elapsed();

    // Assert
    assert_eq!(status_line(&refused), "HTTP/1.1 413 Payload Too Large");
    assert!(
        elapsed < write_delay / 2,
        "request waited {elapsed:?} behind a {write_delay:?} save"
    );
    let saved = save.await.unwrap();
    assert_eq!(status_line(&saved), "HTTP/1.1 303 See Other");

    running.store(false, Ordering::Relaxed);
    server.await.unwrap().unwrap();
}
