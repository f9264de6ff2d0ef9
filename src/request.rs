//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde_json::Value;

use crate::method::Method;

/// An incoming HTTP request, fully buffered.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) remote_addr: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Starts building a request by hand, for exercising handlers in tests
    /// without a running server.
    pub fn builder(method: Method, path: &str) -> RequestBuilder {
        RequestBuilder {
            inner: Request {
                method,
                path: path.to_owned(),
                remote_addr: "127.0.0.1".to_owned(),
                query: Vec::new(),
                headers: Vec::new(),
                body: Bytes::new(),
                params: HashMap::new(),
            },
        }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn remote_addr(&self) -> &str { &self.remote_addr }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Decoded query-string pairs in wire order. Repeated keys appear once
    /// per occurrence.
    pub fn args(&self) -> &[(String, String)] { &self.query }

    /// First value of a query-string key.
    pub fn arg(&self, key: &str) -> Option<&str> {
        self.query.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The body parsed as JSON, whatever the declared content type.
    ///
    /// Returns `None` for an empty or malformed body; never fails.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

// ── RequestBuilder ────────────────────────────────────────────────────────────

/// Fluent builder for [`Request`]. Obtain via [`Request::builder`].
pub struct RequestBuilder {
    inner: Request,
}

impl RequestBuilder {
    pub fn remote_addr(mut self, addr: &str) -> Self {
        self.inner.remote_addr = addr.to_owned();
        self
    }

    /// Appends one query-string pair.
    pub fn arg(mut self, key: &str, value: &str) -> Self {
        self.inner.query.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Appends every pair of a raw, percent-encoded query string.
    pub fn query_string(mut self, query: &str) -> Self {
        self.inner.query.extend(parse_query(query));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.inner.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.inner.body = body.into();
        self
    }

    /// Sets a JSON body and the matching content type.
    pub fn json(self, body: &Value) -> Self {
        self.header("content-type", "application/json")
            .body(body.to_string())
    }

    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.inner.params.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn build(self) -> Request {
        self.inner
    }
}

pub(crate) fn parse_query(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_string_is_decoded_in_order() {
        let req = Request::builder(Method::Get, "/good")
            .query_string("a=1&b=two%20words&a=3")
            .build();

        assert_eq!(req.args(), &[
            ("a".to_owned(), "1".to_owned()),
            ("b".to_owned(), "two words".to_owned()),
            ("a".to_owned(), "3".to_owned()),
        ]);
        assert_eq!(req.arg("a"), Some("1"));
        assert_eq!(req.arg("missing"), None);
    }

    #[test]
    fn json_accessor_never_fails() {
        let empty = Request::builder(Method::Post, "/").build();
        assert_eq!(empty.json(), None);

        let malformed = Request::builder(Method::Post, "/").body("{not json").build();
        assert_eq!(malformed.json(), None);

        // content type is not required
        let untyped = Request::builder(Method::Post, "/").body(r#"{"b":2}"#).build();
        assert_eq!(untyped.json(), Some(json!({"b": 2})));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::builder(Method::Get, "/")
            .json(&json!({"b": 2}))
            .build();
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.remote_addr(), "127.0.0.1");
    }
}
