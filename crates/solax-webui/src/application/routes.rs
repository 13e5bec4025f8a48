//! Request routing for the configuration page.
//!
//! | Method | Path               | Result                                  |
//! |--------|--------------------|-----------------------------------------|
//! | GET    | `/`                | HTML page with the configuration form   |
//! | GET    | `/BaseConfig.json` | Effective configuration as JSON         |
//! | POST   | `/StoreBaseConfig` | Persist a document, redirect to `/`     |
//!
//! The POST body is either the page's `json=<urlencoded document>` form post
//! or a raw JSON document.  Either way it goes to
//! [`ConfigStore::store`] unchanged, so the store's own rules decide what is
//! accepted.

use serde_json::Value;
use tracing::{info, warn};

use solax_core::{ConfigFs, ConfigStore, StoreError};

use crate::application::form_body;
use crate::application::page::render_page;
use crate::domain::{Method, Request, Response, StatusCode};

pub const INDEX_PATH: &str = "/";
pub const CONFIG_JSON_PATH: &str = "/BaseConfig.json";
pub const STORE_PATH: &str = "/StoreBaseConfig";

/// Produces the response for `request`, reading or updating `store`.
pub fn handle_request<F: ConfigFs>(request: &Request, store: &mut ConfigStore<F>) -> Response {
    let head = &request.head;
    match (&head.method, head.path.as_str()) {
        (Method::Get, INDEX_PATH | "/index.html") => Response::html(render_page(store.config())),
        (Method::Get, CONFIG_JSON_PATH) => {
            Response::json(Value::Object(store.config().to_document()).to_string())
        }
        (Method::Post, STORE_PATH) => handle_store(request, store),
        (_, INDEX_PATH | "/index.html" | CONFIG_JSON_PATH) => method_not_allowed("GET"),
        (_, STORE_PATH) => method_not_allowed("POST"),
        _ => Response::text(StatusCode::NotFound, format!("no route for {}", head.path)),
    }
}

fn handle_store<F: ConfigFs>(request: &Request, store: &mut ConfigStore<F>) -> Response {
    let document = if request.is_form_encoded() {
        match form_body::json_field(&request.body) {
            Ok(document) => document,
            Err(e) => return Response::text(StatusCode::BadRequest, e.to_string()),
        }
    } else {
        match String::from_utf8(request.body.clone()) {
            Ok(document) => document,
            Err(_) => return Response::text(StatusCode::BadRequest, "request body is not UTF-8"),
        }
    };

    match store.store(&document) {
        Ok(state) => {
            info!(?state, root = %store.config().mqtt_root, "configuration stored");
            Response::redirect(INDEX_PATH)
        }
        Err(e) => store_error_response(&e),
    }
}

fn store_error_response(error: &StoreError) -> Response {
    if error.is_rejection() {
        warn!("configuration document rejected: {error}");
        Response::text(StatusCode::BadRequest, error.to_string())
    } else {
        Response::text(StatusCode::InternalServerError, error.to_string())
    }
}

fn method_not_allowed(allow: &str) -> Response {
    Response::text(StatusCode::MethodNotAllowed, "method not allowed")
        .with_header("Allow", allow.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
