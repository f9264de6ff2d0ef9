//! Liveness check.
//!
//! If the process can answer HTTP at all, it is alive, so this endpoint has
//! no dependencies. Register it through the interceptor like everything
//! else so probes show up in the request log:
//!
//! ```rust,no_run
//! use klotio::Router;
//! use klotio::endpoints::health;
//! use klotio::middleware::intercept;
//!
//! let app = Router::new().get("/health", intercept(health::get));
//! ```

use serde_json::{json, Value};

use crate::context::Context;
use crate::error::Fault;

/// `GET /health` → `200 {"message": "OK"}`.
pub async fn get(_ctx: Context) -> Result<Value, Fault> {
    Ok(json!({"message": "OK"}))
}
