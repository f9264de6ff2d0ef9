//! # klotio
//!
//! Request/response logging and fault normalization for klot-io JSON
//! services, plus the two endpoints every service exposes.
//!
//! ## The contract
//!
//! Every endpoint is wrapped by [`middleware::intercept`]. For each call it:
//!
//! - logs `debug "request"` with a summary of the request (method, path,
//!   remote address, query args, JSON body)
//! - runs the endpoint, catching any [`Fault`] or panic
//! - on a fault, logs `exception "request failed"` and answers
//!   `500 {"message": ..., "traceback": ...}`
//! - logs `debug "response"` with the status code and JSON body
//!
//! A fault never crosses the interceptor. There is no distinction between
//! expected and unexpected failures: everything is a `500`.
//!
//! Nothing is ambient. The server hands each handler a [`Context`] holding
//! the request and the router's [`Logger`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use klotio::{Context, Fault, Router, Server};
//! use klotio::endpoints::{self, GroupConfig};
//! use klotio::middleware::intercept;
//! use serde_json::{json, Value};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = endpoints::mount(Router::new(), &GroupConfig::new("redis.klot.io"))
//!         .get("/users/{id}", intercept(get_user));
//!
//!     Server::bind("0.0.0.0:3000").unwrap().serve(app).await.unwrap();
//! }
//!
//! async fn get_user(ctx: Context) -> Result<(Value, u16), Fault> {
//!     let id = ctx.request().param("id").ok_or_else(|| Fault::msg("no id"))?;
//!     Ok((json!({"id": id}), 200))
//! }
//! ```

mod context;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod endpoints;
pub mod log;
pub mod middleware;
pub mod summary;

pub use config::Config;
pub use context::Context;
pub use error::{Error, Fault};
pub use handler::Handler;
pub use log::{Logger, RecordingLogger, SharedLogger, TracingLogger};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::{IntoResponse, Reply, Response};
pub use router::{Route, Router};
pub use server::Server;
