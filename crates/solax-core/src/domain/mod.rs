//! Domain layer: configuration values and the key schema.
//!
//! Nothing in here touches the filesystem.  Decoding works on an already
//! parsed `serde_json` object so the same rules apply whether the document
//! came from flash or from a browser.

pub mod schema;
pub mod selectors;

pub use schema::{BaseConfig, FieldKind, FieldSpec, SCHEMA};
pub use selectors::{ClientIdMode, Connectivity, LanBoard};
