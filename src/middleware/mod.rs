//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the place for
//! cross-cutting concerns. klotio ships one: [`intercept`], which brackets
//! every endpoint call with structured `"request"` / `"response"` log
//! records and turns any fault into a JSON `500`.
//!
//! ```rust,no_run
//! use klotio::{Context, Fault, Router};
//! use klotio::middleware::intercept;
//! use serde_json::{json, Value};
//!
//! async fn echo(ctx: Context) -> Result<(Value, u16), Fault> {
//!     let body = ctx.request().json().ok_or_else(|| Fault::msg("no body"))?;
//!     Ok((json!({"echo": body}), 201))
//! }
//!
//! let app = Router::new().post("/echo", intercept(echo));
//! ```

mod intercept;

pub use intercept::{intercept, Intercepted};
