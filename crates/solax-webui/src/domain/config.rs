//! Web server settings.
//!
//! [`ServerConfig`] is built once in `main.rs` from CLI arguments and shared
//! read-only with every connection task.  It holds the runtime settings of the
//! server process; the device configuration itself lives in the persisted
//! document managed by `solax_core::ConfigStore`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Largest request body accepted by the server.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4096;

/// Largest request line plus headers accepted by the server.
pub const MAX_HEAD_BYTES: usize = 8192;

/// All runtime settings of the web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address and port the HTTP listener binds to.
    pub bind_addr: SocketAddr,

    /// Directory standing in for the device's flash filesystem.  The
    /// persisted `BaseConfig.json` lives here.
    pub data_dir: PathBuf,

    /// Requests with a larger `Content-Length` are refused with 413.
    pub max_body_bytes: usize,

    /// How long a client may take to deliver a complete request.
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    /// | Field          | Default        |
    /// |----------------|----------------|
    /// | bind_addr      | `0.0.0.0:8080` |
    /// | data_dir       | `./data`       |
    /// | max_body_bytes | 4096           |
    /// | read_timeout   | 5 seconds      |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: PathBuf::from("./data"),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            read_timeout: Duration::from_secs(5),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
