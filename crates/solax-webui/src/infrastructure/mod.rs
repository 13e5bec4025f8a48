//! Infrastructure layer for solax-webui.
//!
//! Everything that touches a socket: binding the listener, framing HTTP
//! requests off TCP streams, spawning per-connection tasks and honouring the
//! shutdown flag.
//!
//! # What does NOT belong here?
//!
//! - Routing and page rendering (that is the application layer)
//! - Request and response types (that is the domain layer)
//! - CLI parsing (that is done in `main.rs`)

pub mod http_server;

pub use http_server::{run_server, serve, SharedStore};
