//! Presentation helpers.  Pure functions only; serving the markup is the job
//! of `solax-webui`.

pub mod form;

pub use form::{render_form, STORE_ACTION};
