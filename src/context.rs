//! Per-request context.

use crate::log::SharedLogger;
use crate::request::Request;

/// Everything a handler may need about the request being served.
///
/// The server builds one per request and hands it to the handler by value,
/// so nothing is looked up through thread-locals or globals: the current
/// request and the application logger travel together.
pub struct Context {
    request: Request,
    logger: SharedLogger,
}

impl Context {
    pub fn new(request: Request, logger: SharedLogger) -> Self {
        Self { request, logger }
    }

    pub fn request(&self) -> &Request { &self.request }
    pub fn logger(&self) -> &SharedLogger { &self.logger }
}
