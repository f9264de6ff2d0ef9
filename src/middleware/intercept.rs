//! The logging and fault-normalization interceptor.
//!
//! ```text
//! ctx ──► debug "request"  {request: <summary>}
//!          │
//!          ▼
//!     endpoint(ctx) ── Ok(reply) ───────────────────────┐
//!          │                                            │
//!          └─ Err(fault) / panic ─► exception "request failed"
//!                                   reply = ({message, traceback}, 500)
//!                                                       │
//!     debug "response" {response: <summary>} ◄──────────┘
//!          │
//!          ▼
//!       Response
//! ```
//!
//! Exactly one record is written before the endpoint runs and exactly one
//! after a reply exists, whichever path produced it. Nothing escapes: the
//! server always receives a response.
//!
//! A panic still runs the process panic hook before it is caught here, and
//! the default hook writes to stderr. The `klotio` binary replaces it with
//! [`install_panic_hook`](crate::log::install_panic_hook); services built
//! on the library should do the same.

use std::any::type_name;
use std::borrow::Cow;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::json;

use crate::context::Context;
use crate::error::Fault;
use crate::handler::{private, BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::log::Logger;
use crate::response::{IntoResponse, Reply, Response};
use crate::summary::{request_summary, response_summary};

/// An endpoint wrapped by [`intercept`]. Register it on a
/// [`Router`](crate::Router) like any other handler.
pub struct Intercepted<E> {
    endpoint: Arc<E>,
    name: Cow<'static, str>,
}

/// Wraps a fallible endpoint in request/response logging and fault
/// normalization.
///
/// The endpoint receives the request [`Context`] and returns anything that
/// converts into a [`Reply`]: a bare `serde_json::Value` for `200`, or a
/// `(Value, u16)` pair. Returning `Err`, or panicking, yields
/// `500 {"message", "traceback"}` instead.
///
/// The wrapped handler keeps the endpoint's name for the router's route
/// table; override it with [`Intercepted::named`].
pub fn intercept<E, Fut, R>(endpoint: E) -> Intercepted<E>
where
    E: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Fault>> + Send + 'static,
    R: Into<Reply> + Send + 'static,
{
    Intercepted {
        endpoint: Arc::new(endpoint),
        name: Cow::Borrowed(type_name::<E>()),
    }
}

impl<E> Intercepted<E> {
    /// Replaces the name reported to the router. Closures have unhelpful
    /// type names; give them a real one here.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<E, Fut, R> private::Sealed for Intercepted<E>
where
    E: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Fault>> + Send + 'static,
    R: Into<Reply> + Send + 'static,
{
}

impl<E, Fut, R> Handler for Intercepted<E>
where
    E: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Fault>> + Send + 'static,
    R: Into<Reply> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

impl<E, Fut, R> ErasedHandler for Intercepted<E>
where
    E: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Fault>> + Send + 'static,
    R: Into<Reply> + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture {
        Box::pin(run(Arc::clone(&self.endpoint), ctx))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

async fn run<E, Fut, R>(endpoint: Arc<E>, ctx: Context) -> Response
where
    E: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Fault>> + Send + 'static,
    R: Into<Reply> + Send + 'static,
{
    let logger = Arc::clone(ctx.logger());

    logger.debug("request", json!({ "request": request_summary(ctx.request()) }));

    // The endpoint is called inside the guarded future so a panic while
    // building its future is caught too.
    let outcome = AssertUnwindSafe(async move { (*endpoint)(ctx).await })
        .catch_unwind()
        .await;

    let reply = match outcome {
        Ok(Ok(reply)) => reply.into(),
        Ok(Err(fault)) => fail(logger.as_ref(), fault),
        Err(panic) => fail(logger.as_ref(), Fault::from_panic(panic)),
    };

    logger.debug("response", json!({ "response": response_summary(&reply) }));

    reply.into_response()
}

fn fail(logger: &dyn Logger, fault: Fault) -> Reply {
    logger.exception("request failed", &fault);
    fault.into_reply()
}
