//! # solax-core
//!
//! Configuration store for the Solax inverter MQTT bridge.  The device keeps a
//! small set of network and MQTT settings in a single JSON document on its
//! flash filesystem, reloads them at boot, and renders an HTML form so the
//! settings can be edited from a browser.
//!
//! The crate has no dependencies on sockets or async runtimes.  The web
//! front end lives in `solax-webui`.
//!
//! # Architecture overview
//!
//! - **`domain`** – The [`BaseConfig`] value type, the selector enums decoded
//!   from radio-button vocabularies, and the declarative [`SCHEMA`] that maps
//!   every recognized JSON key onto a field together with its default.
//!
//! - **`storage`** – The [`ConfigFs`] filesystem seam and the [`ConfigStore`]
//!   that loads, persists and re-syncs the configuration.  The persisted file
//!   is always the source of truth: a successful store re-reads the file it
//!   just wrote.
//!
//! - **`web`** – A pure function that renders the configuration form from a
//!   [`BaseConfig`] snapshot.

pub mod domain;
pub mod storage;
pub mod web;

pub use domain::schema::{normalize_basepath, BaseConfig, FieldKind, FieldSpec, SCHEMA};
pub use domain::selectors::{ClientIdMode, Connectivity, LanBoard};
pub use storage::fs::{ConfigFs, DirFs, MemoryFs};
pub use storage::store::{ConfigState, ConfigStore, StoreError, CONFIG_FILE_NAME, MAX_DOCUMENT_SIZE};
pub use web::form::render_form;
