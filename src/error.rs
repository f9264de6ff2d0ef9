//! Error types.
//!
//! Two kinds of failure exist and they never mix:
//!
//! - [`Error`]: infrastructure failures outside any request, such as binding
//!   the listener or reading configuration. Returned from [`Server::serve`]
//!   and [`Config::load`].
//! - [`Fault`]: anything an endpoint fails with while handling a request.
//!   The interceptor turns every fault into a `500` reply; a fault never
//!   reaches the server.
//!
//! [`Server::serve`]: crate::Server::serve
//! [`Config::load`]: crate::Config::load

use std::any::Any;
use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use serde_json::json;

use crate::response::Reply;

/// The error type returned by klotio's fallible infrastructure operations.
///
/// Application-level failures are expressed as [`Fault`]s and end up as
/// HTTP `500` replies, not as `Error`s.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("invalid socket address `{0}`")]
    Addr(String),
}

// ── Fault ─────────────────────────────────────────────────────────────────────

/// A failure raised while an endpoint handles a request.
///
/// Any `std::error::Error + Send + Sync` converts into a `Fault` with `?`,
/// so endpoints can propagate `reqwest`, `serde_json` or `io` errors
/// without wrapping them. The stack trace is captured when the fault is
/// created.
pub struct Fault {
    inner: Box<dyn StdError + Send + Sync + 'static>,
    backtrace: Backtrace,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Message(String);

impl Fault {
    /// A fault carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Box::new(Message(message.into())))
    }

    fn new(inner: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self { inner, backtrace: Backtrace::force_capture() }
    }

    /// Builds a fault from the payload of a caught panic.
    ///
    /// `panic!("...")` payloads are `&'static str` or `String`; anything else
    /// gets a generic message.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::msg(panic_message(payload.as_ref()).unwrap_or("endpoint panicked"))
    }

    /// Full textual trace: the message, its cause chain, and the stack
    /// captured when the fault was created.
    pub fn traceback(&self) -> String {
        let mut out = format!("Error: {}", self.inner);

        let mut source = self.inner.source();
        if source.is_some() {
            out.push_str("\n\nCaused by:");
        }
        while let Some(cause) = source {
            out.push_str(&format!("\n    {cause}"));
            source = cause.source();
        }

        out.push_str(&format!("\n\nStack backtrace:\n{}", self.backtrace));
        out
    }

    /// The `500` reply every fault is normalized into:
    /// `{"message": <display text>, "traceback": <trace text>}`.
    pub fn into_reply(self) -> Reply {
        let body = json!({
            "message": self.to_string(),
            "traceback": self.traceback(),
        });
        Reply::WithStatus(body, 500)
    }
}

/// The text of a `panic!` payload, if it carries one.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&'static str>().copied())
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.traceback())
    }
}

impl<E> From<E> for Fault
where
    E: StdError + Send + Sync + 'static,
{
    fn from(e: E) -> Self {
        Self::new(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("membership lookup failed")]
    struct Lookup(#[source] std::io::Error);

    #[test]
    fn message_fault_displays_its_text() {
        let fault = Fault::msg("whoops");
        assert_eq!(fault.to_string(), "whoops");
        assert!(fault.traceback().starts_with("Error: whoops"));
        assert!(fault.traceback().contains("Stack backtrace:"));
    }

    #[test]
    fn traceback_lists_the_cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let fault = Fault::from(Lookup(io));

        assert_eq!(fault.to_string(), "membership lookup failed");
        let trace = fault.traceback();
        assert!(trace.contains("Caused by:\n    refused"), "{trace}");
    }

    #[test]
    fn panic_payloads_become_messages() {
        let fault = Fault::from_panic(Box::new("static boom"));
        assert_eq!(fault.to_string(), "static boom");

        let fault = Fault::from_panic(Box::new(format!("formatted {}", 7)));
        assert_eq!(fault.to_string(), "formatted 7");

        let fault = Fault::from_panic(Box::new(42_u8));
        assert_eq!(fault.to_string(), "endpoint panicked");
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let text: Box<dyn Any + Send> = Box::new("static boom");
        assert_eq!(panic_message(text.as_ref()), Some("static boom"));

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(owned.as_ref()), Some("owned boom"));

        let other: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(other.as_ref()), None);
    }

    #[test]
    fn fault_reply_is_a_500_with_message_and_traceback() {
        let reply = Fault::msg("whoops").into_reply();

        assert_eq!(reply.status_code(), 500);
        assert_eq!(reply.body()["message"], "whoops");
        let trace = reply.body()["traceback"].as_str().unwrap_or_default();
        assert!(!trace.is_empty());
    }
}
