//! Application layer for solax-webui.
//!
//! Decides what each request means for the configuration store and builds
//! the response.  No sockets and no async: every function here takes a parsed
//! [`Request`](crate::domain::Request) and returns a
//! [`Response`](crate::domain::Response), so routing is tested without a
//! network.

pub mod form_body;
pub mod page;
pub mod routes;

pub use routes::{handle_request, CONFIG_JSON_PATH, INDEX_PATH, STORE_PATH};
