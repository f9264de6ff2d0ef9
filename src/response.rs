//! Endpoint replies, outgoing HTTP responses, and the [`IntoResponse`]
//! conversion between them.
//!
//! Endpoints return a [`Reply`]: a JSON value, optionally paired with a
//! status code. The server only ever sees the [`Response`] a reply turns
//! into.

use bytes::Bytes;
use http_body_util::Full;
use serde_json::Value;
use tracing::error;

// ── Reply ─────────────────────────────────────────────────────────────────────

/// What an endpoint produces.
///
/// A bare value means `200 OK`; a pair carries its own status code.
///
/// ```rust
/// use klotio::Reply;
/// use serde_json::json;
///
/// let ok: Reply = json!({"message": "OK"}).into();
/// let created: Reply = (json!({"id": 42}), 201).into();
///
/// assert_eq!(ok.status_code(), 200);
/// assert_eq!(created.status_code(), 201);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Body(Value),
    WithStatus(Value, u16),
}

impl Reply {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Body(_) => 200,
            Self::WithStatus(_, status) => *status,
        }
    }

    pub fn body(&self) -> &Value {
        match self {
            Self::Body(body) | Self::WithStatus(body, _) => body,
        }
    }
}

impl From<Value> for Reply {
    fn from(body: Value) -> Self { Self::Body(body) }
}

impl From<(Value, u16)> for Reply {
    fn from((body, status): (Value, u16)) -> Self { Self::WithStatus(body, status) }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: u16,
}

impl Response {
    /// `application/json` response with the given status.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            body: body.to_string().into_bytes(),
            headers: vec![("content-type".to_owned(), "application/json".to_owned())],
            status,
        }
    }

    /// Response with no body.
    pub fn status(code: u16) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code }
    }

    pub fn status_code(&self) -> u16 { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Converts into the `http` type hyper writes to the wire.
    ///
    /// A status outside `100..=999` or an unencodable header cannot be
    /// sent; those degrade to an empty `500`.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder.body(Full::new(Bytes::from(self.body))).unwrap_or_else(|e| {
            error!("unsendable response: {e}");
            let mut res = http::Response::new(Full::default());
            *res.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
            res
        })
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from plain
/// (non-intercepted) handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        Response::json(self.status_code(), self.body())
    }
}

impl IntoResponse for Value {
    fn into_response(self) -> Response { Reply::from(self).into_response() }
}

impl IntoResponse for (Value, u16) {
    fn into_response(self) -> Response { Reply::from(self).into_response() }
}
