//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router also owns the
//! application logger that every request [`Context`](crate::Context) carries.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::log::{SharedLogger, TracingLogger};
use crate::method::Method;

/// One registered route, as reported by [`Router::routes`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Route {
    pub method: Method,
    pub path: String,
    /// Name of the handler, e.g. `klotio::endpoints::health::get`.
    pub name: String,
}

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Every registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    table: Vec<Route>,
    logger: SharedLogger,
}

impl Router {
    /// An empty router logging through `tracing` under the name `klotio`.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            table: Vec::new(),
            logger: Arc::new(TracingLogger::new("klotio")),
        }
    }

    /// Replaces the logger handed to handlers.
    pub fn logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered. Routes are fixed at startup, so this is a programming error.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::Post, path, handler)
    }

    /// Every registered route, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.table
    }

    fn add(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        let handler = handler.into_boxed_handler();
        let name = handler.name().to_owned();

        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));

        self.table.push(Route { method, path: path.to_owned(), name });
        self
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    pub(crate) fn shared_logger(&self) -> &SharedLogger {
        &self.logger
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
