//! HTTP server: accept loop, request framing and per-connection tasks.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Reading one request per connection (head up to a blank line, then
//!    exactly `Content-Length` body bytes).
//! 3. Passing the request to [`handle_request`] on the blocking thread pool
//!    while holding the store lock.
//! 4. Writing the response and closing the connection.
//! 5. Stopping when the `running` flag is cleared.
//!
//! # Concurrency
//!
//! Every connection runs in its own Tokio task.  The configuration store is
//! shared as a [`SharedStore`]; a request holds the lock only while the
//! router runs, never while reading from or writing to the socket.  Two
//! concurrent saves are therefore serialized and the later one wins.
//!
//! The router runs under `spawn_blocking`: a save writes, syncs and re-reads
//! the configuration file, and a slow write must not stall the runtime
//! threads serving other connections.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use solax_core::{ConfigFs, ConfigStore};

use crate::application::handle_request;
use crate::domain::config::MAX_HEAD_BYTES;
use crate::domain::{Request, RequestError, RequestHead, ServerConfig};

/// The configuration store as shared between connection tasks.
pub type SharedStore<F> = Arc<Mutex<ConfigStore<F>>>;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";
const READ_CHUNK: usize = 1024;

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds `config.bind_addr` and serves requests until `running` is cleared.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (e.g., the port is
/// already in use or the process lacks permission to bind).
pub async fn run_server<F>(
    config: ServerConfig,
    store: SharedStore<F>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()>
where
    F: ConfigFs + Send + 'static,
{
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", config.bind_addr))?;

    info!("configuration page listening on http://{}", config.bind_addr);

    serve(listener, config, store, running).await
}

/// Runs the accept loop on an already bound listener.
///
/// Split out of [`run_server`] so tests can bind port 0 and learn the actual
/// address before the loop starts.
///
/// # Errors
///
/// Currently never fails; accept errors are logged and the loop continues.
pub async fn serve<F>(
    listener: TcpListener,
    config: ServerConfig,
    store: SharedStore<F>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()>
where
    F: ConfigFs + Send + 'static,
{
    let config = Arc::new(config);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout so the `running` flag is re-checked while idle.
        match timeout(Duration::from_millis(200), listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("connection from {peer_addr}");
                let cfg = Arc::clone(&config);
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    handle_connection(stream, peer_addr, cfg, store).await;
                });
            }
            Ok(Err(e)) => error!("accept error: {e}"),
            Err(_) => {}
        }
    }

    Ok(())
}

/// Reads a single request from `stream`.
///
/// The head is read until the blank line that ends it; at most
/// [`MAX_HEAD_BYTES`] are accepted.  A `Content-Length` above `max_body` is
/// refused before any body byte is read.  Bytes after the declared body are
/// ignored.
///
/// # Errors
///
/// See [`RequestError`] for the individual failure modes.
pub async fn read_request<S>(stream: &mut S, max_body: usize) -> Result<Request, RequestError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    let head_end = loop {
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEAD_BYTES {
            return Err(RequestError::HeadTooLarge {
                limit: MAX_HEAD_BYTES,
            });
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(RequestError::ConnectionClosed);
        }
        buf.extend_from_slice(&chunk[..n]);
    };
    if head_end > MAX_HEAD_BYTES {
        return Err(RequestError::HeadTooLarge {
            limit: MAX_HEAD_BYTES,
        });
    }

    let head = RequestHead::parse(&buf[..head_end])?;
    if head.content_length > max_body {
        return Err(RequestError::BodyTooLarge {
            length: head.content_length,
            limit: max_body,
        });
    }

    let mut body = buf.split_off(head_end + HEAD_TERMINATOR.len());
    while body.len() < head.content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(RequestError::ConnectionClosed);
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(head.content_length);

    Ok(Request { head, body })
}

// ── Per-connection handler ────────────────────────────────────────────────────

/// Wraps [`serve_connection`] and logs the outcome.
async fn handle_connection<F>(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ServerConfig>,
    store: SharedStore<F>,
) where
    F: ConfigFs + Send + 'static,
{
    if let Err(e) = serve_connection(stream, peer_addr, &config, &store).await {
        warn!("connection {peer_addr} failed: {e:#}");
    }
}

async fn serve_connection<F>(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    config: &ServerConfig,
    store: &SharedStore<F>,
) -> anyhow::Result<()>
where
    F: ConfigFs + Send + 'static,
{
    let request = match timeout(
        config.read_timeout,
        read_request(&mut stream, config.max_body_bytes),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(RequestError::Timeout),
    };

    let response = match request {
        Ok(request) => {
            let method = request.head.method.to_string();
            let path = request.head.path.clone();
            let mut store = Arc::clone(store).lock_owned().await;
            let response =
                tokio::task::spawn_blocking(move || handle_request(&request, &mut *store))
                    .await
                    .with_context(|| format!("request handler for {peer_addr} panicked"))?;
            info!("{peer_addr} {method} {path} -> {}", response.status.code());
            response
        }
        Err(e) => match e.response() {
            Some(response) => {
                warn!("{peer_addr} bad request: {e}");
                response
            }
            None => {
                debug!("{peer_addr} dropped: {e}");
                return Ok(());
            }
        },
    };

    stream
        .write_all(&response.to_bytes())
        .await
        .with_context(|| format!("failed to write response to {peer_addr}"))?;
    stream
        .shutdown()
        .await
        .with_context(|| format!("failed to close connection to {peer_addr}"))?;
    Ok(())
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
