//! Loggable snapshots of requests and replies.
//!
//! Both extractors are pure: they read their argument and nothing else.
//! Optional fields are left out of the serialized form entirely rather
//! than written as `null`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::request::Request;
use crate::response::Reply;

/// What the `"request"` log record carries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestSummary {
    pub method: String,
    pub path: String,
    pub remote_addr: String,
    /// Query string flattened to one value per key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<BTreeMap<String, String>>,
    /// Parsed body, when there is a non-empty one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

/// What the `"response"` log record carries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseSummary {
    pub status_code: u16,
    pub json: Value,
}

pub fn request_summary(req: &Request) -> RequestSummary {
    RequestSummary {
        method: req.method().as_str().to_owned(),
        path: req.path().to_owned(),
        remote_addr: req.remote_addr().to_owned(),
        args: flatten(req.args()),
        json: req.json().filter(is_present),
    }
}

pub fn response_summary(reply: &Reply) -> ResponseSummary {
    ResponseSummary {
        status_code: reply.status_code(),
        json: reply.body().clone(),
    }
}

/// One value per key; on repeats the first occurrence wins.
fn flatten(pairs: &[(String, String)]) -> Option<BTreeMap<String, String>> {
    if pairs.is_empty() {
        return None;
    }

    let mut args = BTreeMap::new();
    for (key, value) in pairs {
        args.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Some(args)
}

/// `null`, `false`, zero, and empty strings/arrays/objects count as no body.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use serde_json::json;

    #[test]
    fn bare_request_has_no_args_or_json() {
        let req = Request::builder(Method::Get, "/health").build();
        let summary = request_summary(&req);

        assert_eq!(serde_json::to_value(&summary).unwrap(), json!({
            "method": "GET",
            "path": "/health",
            "remote_addr": "127.0.0.1",
        }));
    }

    #[test]
    fn full_request_carries_args_and_json() {
        let req = Request::builder(Method::Post, "/forward")
            .remote_addr("here")
            .arg("a", "1")
            .json(&json!({"b": 2}))
            .build();

        assert_eq!(serde_json::to_value(request_summary(&req)).unwrap(), json!({
            "method": "POST",
            "path": "/forward",
            "remote_addr": "here",
            "args": {"a": "1"},
            "json": {"b": 2},
        }));
    }

    #[test]
    fn repeated_query_keys_keep_the_first_value() {
        let req = Request::builder(Method::Get, "/")
            .query_string("a=1&a=2&c=3")
            .build();

        let args = request_summary(&req).args.unwrap();
        assert_eq!(args.get("a").map(String::as_str), Some("1"));
        assert_eq!(args.get("c").map(String::as_str), Some("3"));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn unusable_bodies_are_left_out() {
        for body in ["", "{broken", "{}", "[]", "null", "0", "false", "\"\""] {
            let req = Request::builder(Method::Post, "/").body(body).build();
            assert_eq!(request_summary(&req).json, None, "body {body:?}");
        }

        let req = Request::builder(Method::Post, "/").body("[1]").build();
        assert_eq!(request_summary(&req).json, Some(json!([1])));
    }

    #[test]
    fn bare_reply_summarises_as_200() {
        let summary = response_summary(&json!({"a": 1}).into());
        assert_eq!(summary, ResponseSummary { status_code: 200, json: json!({"a": 1}) });
    }

    #[test]
    fn pair_reply_keeps_its_status() {
        let summary = response_summary(&(json!({"b": 2}), 201).into());
        assert_eq!(serde_json::to_value(summary).unwrap(), json!({
            "status_code": 201,
            "json": {"b": 2},
        }));
    }
}
