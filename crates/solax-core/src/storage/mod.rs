//! Storage layer: the persisted configuration file and the store around it.
//!
//! - [`fs`] – the [`ConfigFs`](fs::ConfigFs) seam with a directory-backed and
//!   an in-memory implementation.
//! - [`store`] – [`ConfigStore`](store::ConfigStore), which owns the in-memory
//!   configuration and keeps it in sync with the file.

pub mod fs;
pub mod store;

pub use fs::{ConfigFs, DirFs, MemoryFs};
pub use store::{ConfigState, ConfigStore, StoreError};
