//! Domain layer for solax-webui.
//!
//! Plain types with no I/O: the server settings and the HTTP request and
//! response values the application layer works with.  Anything that reads
//! from a socket lives in `infrastructure`.

pub mod config;
pub mod http;

pub use config::ServerConfig;
pub use http::{Method, Request, RequestError, RequestHead, Response, StatusCode};
