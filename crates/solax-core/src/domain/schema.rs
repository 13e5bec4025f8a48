//! The configuration value type and its declarative key schema.
//!
//! Every recognized JSON key is described once in [`SCHEMA`]: its name, the
//! kind of value it carries, how to apply a present value onto a
//! [`BaseConfig`], and how to read it back.  Loading iterates the schema
//! generically, so adding a setting means adding one entry here.
//!
//! # Field-level fallback
//!
//! Decoding starts from [`BaseConfig::default`] and only overwrites the fields
//! whose keys are present *and* usable.  A key holding a value of the wrong
//! type (for example `"mqttport": "abc"`) is treated exactly like a missing
//! key, so one bad value never discards the rest of the document.
//!
//! ```rust
//! use serde_json::json;
//! use solax_core::BaseConfig;
//!
//! let doc = json!({ "mqttroot": "inverter1", "mqttport": 1884 });
//! let cfg = BaseConfig::from_document(doc.as_object().unwrap());
//! assert_eq!(cfg.mqtt_root, "inverter1");
//! assert_eq!(cfg.mqtt_port, 1884);
//! assert_eq!(cfg.mqtt_server, "test.mosquitto.org");
//! ```

use serde_json::{Map, Value};

use crate::domain::selectors::{ClientIdMode, Connectivity};

// ── Defaults ──────────────────────────────────────────────────────────────────

pub const DEFAULT_MQTT_ROOT: &str = "solax";
pub const DEFAULT_MQTT_SERVER: &str = "test.mosquitto.org";
pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_MQTT_BASEPATH: &str = "home";
pub const DEFAULT_DEBUG_LEVEL: u32 = 0;

/// Separator between MQTT topic levels.  Stripped once from the end of the
/// base path during normalization.
pub const BASEPATH_SEPARATOR: char = '/';

// ── Config value ──────────────────────────────────────────────────────────────

/// Fully populated device configuration.
///
/// There is no partially loaded state: every constructor yields a value with
/// all ten fields set, and `mqtt_basepath` never ends in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseConfig {
    /// Device name; also the root of the published MQTT topics.
    pub mqtt_root: String,
    /// Broker host name or IP address.
    pub mqtt_server: String,
    /// Broker TCP port, 1–65535.
    pub mqtt_port: u16,
    pub mqtt_username: String,
    pub mqtt_password: String,
    /// Topic prefix such as `home/inverter`, without a trailing separator.
    pub mqtt_basepath: String,
    pub client_id_mode: ClientIdMode,
    pub connectivity: Connectivity,
    /// Wired board identifier.  Only consulted when `connectivity` is
    /// [`Connectivity::Ethernet`].
    pub lan_board: String,
    /// Diagnostic verbosity, 0 (silent) upwards.
    pub debug_level: u32,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            mqtt_root: DEFAULT_MQTT_ROOT.to_string(),
            mqtt_server: DEFAULT_MQTT_SERVER.to_string(),
            mqtt_port: DEFAULT_MQTT_PORT,
            mqtt_username: String::new(),
            mqtt_password: String::new(),
            mqtt_basepath: DEFAULT_MQTT_BASEPATH.to_string(),
            client_id_mode: ClientIdMode::default(),
            connectivity: Connectivity::default(),
            lan_board: String::new(),
            debug_level: DEFAULT_DEBUG_LEVEL,
        }
    }
}

impl BaseConfig {
    /// Decodes a persisted document with field-level fallback and basepath
    /// normalization.  Unknown keys are ignored.
    pub fn from_document(doc: &Map<String, Value>) -> Self {
        Self::from_document_with_fallbacks(doc).0
    }

    /// Like [`BaseConfig::from_document`], additionally returning the keys
    /// that fell back to their default (absent or unusable), in schema order.
    pub fn from_document_with_fallbacks(doc: &Map<String, Value>) -> (Self, Vec<&'static str>) {
        let mut config = Self::default();
        let mut fallbacks = Vec::new();

        for spec in &SCHEMA {
            let applied = doc
                .get(spec.key)
                .is_some_and(|value| spec.apply(&mut config, value));
            if !applied {
                fallbacks.push(spec.key);
            }
        }

        config.normalize();
        (config, fallbacks)
    }

    /// Renders the configuration as a document using the recognized keys, in
    /// schema order.  Decoding the result yields `self` again.
    pub fn to_document(&self) -> Map<String, Value> {
        SCHEMA
            .iter()
            .map(|spec| (spec.key.to_string(), spec.read(self)))
            .collect()
    }

    /// Applies the post-load normalization rules.
    pub fn normalize(&mut self) {
        let trimmed_len = normalize_basepath(&self.mqtt_basepath).len();
        self.mqtt_basepath.truncate(trimmed_len);
    }

    pub fn mqtt_use_random_client_id(&self) -> bool {
        self.client_id_mode.is_random()
    }

    pub fn use_ethernet(&self) -> bool {
        self.connectivity.is_ethernet()
    }

    /// The wired board to bring up, if ethernet is selected and a board is set.
    pub fn active_lan_board(&self) -> Option<&str> {
        (self.use_ethernet() && !self.lan_board.is_empty()).then_some(self.lan_board.as_str())
    }
}

/// Strips exactly one trailing [`BASEPATH_SEPARATOR`] from `path`.
///
/// ```rust
/// use solax_core::normalize_basepath;
///
/// assert_eq!(normalize_basepath("home/inverter/"), "home/inverter");
/// assert_eq!(normalize_basepath("home/inverter"), "home/inverter");
/// ```
pub fn normalize_basepath(path: &str) -> &str {
    path.strip_suffix(BASEPATH_SEPARATOR).unwrap_or(path)
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// Kind of value a recognized key carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON string, stored as-is.
    Text,
    /// Integer 1–65535, as a JSON number or a decimal string.
    Port,
    /// Integer clamped to ≥ 0, as a JSON number or a decimal string.
    Level,
    /// `"none"` or any other string.
    ClientIdMode,
    /// `"wifi"` or any other string.
    Connectivity,
}

/// One recognized key of the persisted document.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    /// JSON key as written by the configuration form.
    pub key: &'static str,
    pub kind: FieldKind,
    apply: fn(&mut BaseConfig, &Value) -> bool,
    read: fn(&BaseConfig) -> Value,
}

impl FieldSpec {
    /// Writes `value` into the matching field.  Returns `false` and leaves the
    /// field untouched when the value is unusable for this key.
    pub fn apply(&self, config: &mut BaseConfig, value: &Value) -> bool {
        (self.apply)(config, value)
    }

    /// Reads the matching field back as a document value.
    pub fn read(&self, config: &BaseConfig) -> Value {
        (self.read)(config)
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Every recognized key, in the order the form presents them.
pub const SCHEMA: [FieldSpec; 10] = [
    FieldSpec {
        key: "mqttroot",
        kind: FieldKind::Text,
        apply: |c, v| set(&mut c.mqtt_root, decode_text(v)),
        read: |c| Value::from(c.mqtt_root.as_str()),
    },
    FieldSpec {
        key: "SelectConnectivity",
        kind: FieldKind::Connectivity,
        apply: |c, v| set(&mut c.connectivity, v.as_str().map(Connectivity::from_wire)),
        read: |c| Value::from(c.connectivity.as_wire()),
    },
    FieldSpec {
        key: "SelectLAN",
        kind: FieldKind::Text,
        apply: |c, v| set(&mut c.lan_board, decode_text(v)),
        read: |c| Value::from(c.lan_board.as_str()),
    },
    FieldSpec {
        key: "mqttserver",
        kind: FieldKind::Text,
        apply: |c, v| set(&mut c.mqtt_server, decode_text(v)),
        read: |c| Value::from(c.mqtt_server.as_str()),
    },
    FieldSpec {
        key: "mqttport",
        kind: FieldKind::Port,
        apply: |c, v| set(&mut c.mqtt_port, decode_port(v)),
        read: |c| Value::from(c.mqtt_port),
    },
    FieldSpec {
        key: "mqttuser",
        kind: FieldKind::Text,
        apply: |c, v| set(&mut c.mqtt_username, decode_text(v)),
        read: |c| Value::from(c.mqtt_username.as_str()),
    },
    FieldSpec {
        key: "mqttpass",
        kind: FieldKind::Text,
        apply: |c, v| set(&mut c.mqtt_password, decode_text(v)),
        read: |c| Value::from(c.mqtt_password.as_str()),
    },
    FieldSpec {
        key: "mqttbasepath",
        kind: FieldKind::Text,
        apply: |c, v| set(&mut c.mqtt_basepath, decode_text(v)),
        read: |c| Value::from(c.mqtt_basepath.as_str()),
    },
    FieldSpec {
        key: "UseRandomClientID",
        kind: FieldKind::ClientIdMode,
        apply: |c, v| set(&mut c.client_id_mode, v.as_str().map(ClientIdMode::from_wire)),
        read: |c| Value::from(c.client_id_mode.as_wire()),
    },
    FieldSpec {
        key: "debuglevel",
        kind: FieldKind::Level,
        apply: |c, v| set(&mut c.debug_level, decode_level(v)),
        read: |c| Value::from(c.debug_level),
    },
];

/// Looks up the schema entry for `key`.
pub fn field(key: &str) -> Option<&'static FieldSpec> {
    SCHEMA.iter().find(|spec| spec.key == key)
}

// ── Decoders ──────────────────────────────────────────────────────────────────

fn set<T>(slot: &mut T, decoded: Option<T>) -> bool {
    match decoded {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

fn decode_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Integers arrive as JSON numbers from hand-written files and as strings
/// from the browser form.
fn decode_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn decode_port(value: &Value) -> Option<u16> {
    decode_integer(value)
        .and_then(|n| u16::try_from(n).ok())
        .filter(|&port| port != 0)
}

fn decode_level(value: &Value) -> Option<u32> {
    decode_integer(value).map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
