//! Decoding of `application/x-www-form-urlencoded` request bodies.
//!
//! The configuration page posts a single field, `json`, holding the form's
//! values serialized as a JSON object.

use thiserror::Error;

/// Name of the field carrying the JSON document.
pub const JSON_FIELD: &str = "json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormBodyError {
    #[error("form body has no `{0}` field")]
    MissingField(&'static str),
}

/// Extracts and decodes the `json` field from a form-encoded body.
///
/// Escapes that do not decode to UTF-8 become U+FFFD, which the store then
/// refuses as malformed JSON.
///
/// # Errors
///
/// Returns [`FormBodyError::MissingField`] if the body has no `json` field.
pub fn json_field(body: &[u8]) -> Result<String, FormBodyError> {
    form_urlencoded::parse(body)
        .find(|(name, _)| name == JSON_FIELD)
        .map(|(_, value)| value.into_owned())
        .ok_or(FormBodyError::MissingField(JSON_FIELD))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
