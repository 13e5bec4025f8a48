//! solax-webui library crate.
//!
//! Serves the device configuration page: a form showing the effective
//! configuration, a JSON view of it, and the endpoint the form posts to.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (HTML form, urlencoded POST)
//!         ↕
//! [solax-webui]
//!   ├── domain/           Pure types: ServerConfig, HTTP request/response
//!   ├── application/      Routing, page rendering, form body decoding
//!   └── infrastructure/
//!         └── http_server/ Accept loop and request framing (tokio)
//!         ↕
//! [solax-core] ConfigStore  →  BaseConfig.json on disk
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `solax-core` only.
//! - `infrastructure` depends on all other layers plus `tokio`.

/// Domain layer: server settings and HTTP message types.
pub mod domain;

/// Application layer: request routing against the configuration store.
pub mod application;

/// Infrastructure layer: TCP listener and per-connection tasks.
pub mod infrastructure;
