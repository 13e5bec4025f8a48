//! The configuration store: load at boot, persist on demand, re-sync.
//!
//! # Lifecycle
//!
//! ```text
//!             open()
//!               │
//!               ▼
//!   ┌──────── load() ────────┐
//!   │ file parsed            │ missing / unreadable / malformed
//!   ▼                        ▼
//! Loaded                 Defaulted
//!   │                        │
//!   └──── store(json) ───────┘
//!           │ write ok
//!           ▼
//!         load()
//! ```
//!
//! `load` is the only transition into either state.  `store` never updates
//! the in-memory value from the caller's payload directly: it writes the file
//! and then re-reads it, so field-level defaulting and normalization are
//! applied exactly as they would be at the next boot.
//!
//! # Diagnostics
//!
//! The store's own log output is gated by the `debug_level` it holds, so a
//! device configured with level 0 stays quiet.  Before the first successful
//! load the level is 0.  Write failures are always reported.

use std::io;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::schema::BaseConfig;
use crate::storage::fs::ConfigFs;

/// Name of the persisted configuration file.
pub const CONFIG_FILE_NAME: &str = "/BaseConfig.json";

/// Upper bound on the compact serialization of a configuration document.
///
/// Applies both to documents being stored and to the file on load, so a
/// hand-edited file with indentation is measured the same way as the one
/// `store` would write.
pub const MAX_DOCUMENT_SIZE: usize = 512;

/// Debug levels at which the store starts reporting each kind of event.
const LEVEL_LOAD_FAILURE: u32 = 1;
const LEVEL_SUMMARY: u32 = 2;
const LEVEL_MISSING_FILE: u32 = 3;
const LEVEL_FIELD_DETAIL: u32 = 4;

/// Which way the most recent [`ConfigStore::load`] went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    /// No usable file; every field holds its default.
    Defaulted,
    /// The file parsed; fields were populated with field-level fallback.
    Loaded,
}

/// Why [`ConfigStore::store`] did not persist a document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The input is not valid JSON.
    #[error("configuration document is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The input parsed but is not a JSON object.
    #[error("configuration document must be a JSON object")]
    NotAnObject,

    /// The serialized document exceeds [`MAX_DOCUMENT_SIZE`].
    #[error("configuration document is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    /// The file could not be written.  The previous in-memory configuration
    /// is kept.
    #[error("failed to write {file}: {source}")]
    Write {
        file: String,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// `true` when the caller's document was refused before any write was
    /// attempted, meaning both memory and the file are unchanged.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Write { .. })
    }
}

/// Reasons a load falls back to defaults.
#[derive(Debug, Error)]
enum LoadError {
    #[error("file does not exist")]
    Missing,
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error("document is {0} bytes when compacted, over the size limit")]
    TooLarge(usize),
    #[error("invalid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("top-level value is not an object")]
    NotAnObject,
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Process-wide configuration, owned by whoever constructs it at startup and
/// passed by reference to the components that need it.
pub struct ConfigStore<F: ConfigFs> {
    fs: F,
    file: String,
    config: BaseConfig,
    state: ConfigState,
}

impl<F: ConfigFs> ConfigStore<F> {
    /// Creates the store on [`CONFIG_FILE_NAME`] and loads it.
    pub fn open(fs: F) -> Self {
        Self::with_file(fs, CONFIG_FILE_NAME)
    }

    /// Creates the store on a custom file name and loads it.
    pub fn with_file(fs: F, file: impl Into<String>) -> Self {
        let mut store = Self {
            fs,
            file: file.into(),
            config: BaseConfig::default(),
            state: ConfigState::Defaulted,
        };
        store.load();
        store
    }

    /// Reloads the configuration from the persisted file.
    ///
    /// Never fails: a missing, unreadable or malformed file leaves every field
    /// at its default.  Calling it twice without touching the file yields the
    /// same state.
    pub fn load(&mut self) -> ConfigState {
        let (config, state) = match self.read_document() {
            Ok(doc) => {
                let (config, fallbacks) = BaseConfig::from_document_with_fallbacks(&doc);
                if config.debug_level >= LEVEL_FIELD_DETAIL && !fallbacks.is_empty() {
                    debug!(file = %self.file, ?fallbacks, "keys absent or unusable, using defaults");
                }
                (config, ConfigState::Loaded)
            }
            Err(LoadError::Missing) => {
                if self.debug_level() >= LEVEL_MISSING_FILE {
                    info!(file = %self.file, "configuration file does not exist, loading defaults");
                }
                (BaseConfig::default(), ConfigState::Defaulted)
            }
            Err(e) => {
                if self.debug_level() >= LEVEL_LOAD_FAILURE {
                    warn!(file = %self.file, "failed to load configuration, loading defaults: {e}");
                }
                (BaseConfig::default(), ConfigState::Defaulted)
            }
        };

        self.config = config;
        self.state = state;

        if self.debug_level() >= LEVEL_SUMMARY {
            info!(
                state = ?self.state,
                root = %self.config.mqtt_root,
                server = %self.config.mqtt_server,
                port = self.config.mqtt_port,
                basepath = %self.config.mqtt_basepath,
                ethernet = self.config.use_ethernet(),
                "configuration ready"
            );
        }
        state
    }

    /// Persists a caller-supplied JSON document and reloads from it.
    ///
    /// The document is written as parsed, including keys this firmware does
    /// not recognize, replacing the previous file entirely.  On success the
    /// returned state comes from the reload.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Malformed`], [`StoreError::NotAnObject`] or
    ///   [`StoreError::TooLarge`] if the input is refused; nothing changes.
    /// - [`StoreError::Write`] if the file cannot be written; the in-memory
    ///   configuration is kept.
    pub fn store(&mut self, json: &str) -> Result<ConfigState, StoreError> {
        let bytes = match encode_document(json) {
            Ok(bytes) => bytes,
            Err(e) => {
                if self.debug_level() >= LEVEL_LOAD_FAILURE {
                    warn!(file = %self.file, "refusing configuration document: {e}");
                }
                return Err(e);
            }
        };

        if let Err(source) = self.fs.write(&self.file, &bytes) {
            error!(file = %self.file, "failed to write configuration file: {source}");
            return Err(StoreError::Write {
                file: self.file.clone(),
                source,
            });
        }

        if self.debug_level() >= LEVEL_MISSING_FILE {
            debug!(file = %self.file, size = bytes.len(), "configuration file written");
        }
        Ok(self.load())
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> &BaseConfig {
        &self.config
    }

    pub fn state(&self) -> ConfigState {
        self.state
    }

    /// Current diagnostic verbosity; 0 until a file sets it.
    pub fn debug_level(&self) -> u32 {
        self.config.debug_level
    }

    /// Name of the persisted file.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    fn read_document(&self) -> Result<Map<String, Value>, LoadError> {
        let bytes = self.fs.read(&self.file)?.ok_or(LoadError::Missing)?;
        let doc = match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(doc) => doc,
            _ => return Err(LoadError::NotAnObject),
        };
        let size = compact_size(&doc);
        if size > MAX_DOCUMENT_SIZE {
            return Err(LoadError::TooLarge(size));
        }
        Ok(doc)
    }
}

/// Parses `json`, checks it is an object within the size bound and returns
/// the compact serialization to persist.
fn encode_document(json: &str) -> Result<Vec<u8>, StoreError> {
    let doc = match serde_json::from_str::<Value>(json).map_err(StoreError::Malformed)? {
        Value::Object(doc) => doc,
        _ => return Err(StoreError::NotAnObject),
    };

    let bytes = Value::Object(doc).to_string().into_bytes();
    if bytes.len() > MAX_DOCUMENT_SIZE {
        return Err(StoreError::TooLarge {
            size: bytes.len(),
            limit: MAX_DOCUMENT_SIZE,
        });
    }
    Ok(bytes)
}

fn compact_size(doc: &Map<String, Value>) -> usize {
    // `Value`'s Display is the compact serialization.
    Value::Object(doc.clone()).to_string().len()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
