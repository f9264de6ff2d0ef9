//! Minimal klotio service: the standard endpoints plus one of your own.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/health
//!   curl 'http://localhost:3000/users/42?verbose=1'
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -X POST http://localhost:3000/users          # 500, see the log
//!
//! Every call logs a `request` and a `response` record at debug level.

use klotio::endpoints::{self, GroupConfig};
use klotio::middleware::intercept;
use klotio::{Context, Fault, Router, Server};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    klotio::log::install_panic_hook();

    // No app configured, so only /health is mounted from the standard set.
    let app = endpoints::mount(Router::new(), &GroupConfig::default())
        .get("/users/{id}", intercept(get_user))
        .post("/users", intercept(create_user));

    Server::bind("0.0.0.0:3000")?.serve(app).await?;
    Ok(())
}

// GET /users/{id}
async fn get_user(ctx: Context) -> Result<Value, Fault> {
    let id = ctx.request().param("id").unwrap_or("unknown");
    Ok(json!({"id": id, "name": "alice"}))
}

// POST /users → 201, or 500 when the body is missing
async fn create_user(ctx: Context) -> Result<(Value, u16), Fault> {
    let input = ctx.request().json().ok_or_else(|| Fault::msg("expected a JSON body"))?;
    let name = input["name"].as_str().unwrap_or("anonymous");

    Ok((json!({"id": "99", "name": name}), 201))
}
