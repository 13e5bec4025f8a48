//! Minimal HTTP/1.1 message types.
//!
//! The configuration page needs three routes and one small form post, so the
//! server speaks just enough HTTP/1.1: one request per connection, bodies
//! delimited by `Content-Length`, `Connection: close` on every response.
//!
//! Parsing the request head is pure and lives here; reading the bytes off a
//! socket is done by `infrastructure::http_server`.

use std::fmt;

use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Ways a request can fail before it reaches the router.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request line or a header could not be parsed.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// Request line plus headers exceeded the head limit.
    #[error("request head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    /// `Content-Length` exceeded the configured body limit.
    #[error("request body of {length} bytes exceeds {limit} bytes")]
    BodyTooLarge { length: usize, limit: usize },

    /// The client did not finish the request in time.
    #[error("timed out waiting for the request")]
    Timeout,

    /// The peer closed the connection before the request was complete.
    #[error("connection closed mid-request")]
    ConnectionClosed,

    #[error("I/O error reading request: {0}")]
    Io(#[from] std::io::Error),
}

impl RequestError {
    /// The response to send back, or `None` when the connection is unusable.
    pub fn response(&self) -> Option<Response> {
        let status = match self {
            Self::Malformed(_) => StatusCode::BadRequest,
            Self::HeadTooLarge { .. } => StatusCode::HeaderFieldsTooLarge,
            Self::BodyTooLarge { .. } => StatusCode::PayloadTooLarge,
            Self::Timeout => StatusCode::RequestTimeout,
            Self::ConnectionClosed | Self::Io(_) => return None,
        };
        Some(Response::text(status, self.to_string()))
    }
}

// ── Request ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            "POST" => Self::Post,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
            Self::Other(token) => f.write_str(token),
        }
    }
}

/// Request line and the headers the router cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: Method,
    /// Request target without its query string.
    pub path: String,
    pub content_type: Option<String>,
    pub content_length: usize,
}

impl RequestHead {
    /// Parses the bytes before the blank line that ends the head.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Malformed`] for non-UTF-8 input, a bad request
    /// line, or an unparsable `Content-Length`.
    pub fn parse(head: &[u8]) -> Result<Self, RequestError> {
        let text = std::str::from_utf8(head)
            .map_err(|_| RequestError::Malformed("request head is not UTF-8".to_string()))?;
        let mut lines = text.split("\r\n");

        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split(' ');
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(RequestError::Malformed(format!(
                "bad request line: {request_line:?}"
            )));
        };
        if !version.starts_with("HTTP/1.") {
            return Err(RequestError::Malformed(format!(
                "unsupported version: {version}"
            )));
        }

        let path = target.split('?').next().unwrap_or_default().to_string();
        let mut content_type = None;
        let mut content_length = 0;

        for line in lines.filter(|line| !line.is_empty()) {
            let Some((name, value)) = line.split_once(':') else {
                return Err(RequestError::Malformed(format!("bad header: {line:?}")));
            };
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().map_err(|_| {
                    RequestError::Malformed(format!("bad Content-Length: {value:?}"))
                })?;
            } else if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }

        Ok(Self {
            method: Method::parse(method),
            path,
            content_type,
            content_length,
        })
    }
}

/// A complete request: head plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub head: RequestHead,
    pub body: Vec<u8>,
}

impl Request {
    /// `true` when the content type is `application/x-www-form-urlencoded`,
    /// ignoring parameters such as `charset`.
    pub fn is_form_encoded(&self) -> bool {
        self.head.content_type.as_deref().is_some_and(|ct| {
            ct.split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
        })
    }
}

// ── Response ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    SeeOther,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    RequestTimeout,
    PayloadTooLarge,
    HeaderFieldsTooLarge,
    InternalServerError,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::SeeOther => 303,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::RequestTimeout => 408,
            Self::PayloadTooLarge => 413,
            Self::HeaderFieldsTooLarge => 431,
            Self::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::SeeOther => "See Other",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::RequestTimeout => "Request Timeout",
            Self::PayloadTooLarge => "Payload Too Large",
            Self::HeaderFieldsTooLarge => "Request Header Fields Too Large",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: &'static str,
    /// Extra headers such as `Location` or `Allow`.
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn html(body: String) -> Self {
        Self::new(StatusCode::Ok, "text/html; charset=utf-8", body.into_bytes())
    }

    pub fn json(body: String) -> Self {
        Self::new(StatusCode::Ok, "application/json", body.into_bytes())
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut body = body.into();
        body.push('\n');
        Self::new(status, "text/plain; charset=utf-8", body.into_bytes())
    }

    /// `303 See Other` pointing the browser back at `location`.
    pub fn redirect(location: &str) -> Self {
        Self::new(StatusCode::SeeOther, "text/plain; charset=utf-8", Vec::new())
            .with_header("Location", location.to_string())
    }

    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: String) -> Self {
        self.headers.push((name, value));
        self
    }

    fn new(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            headers: Vec::new(),
            body,
        }
    }

    /// Serializes status line, headers and body for the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status.code(),
            self.status.reason(),
            self.content_type,
            self.body.len()
        );
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
