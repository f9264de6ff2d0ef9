//! Membership of the app's group, looked up on the klot-io API.
//!
//! Each deployment runs as one `app`; the API knows which other instances
//! belong to it. `GET /group` asks once per request: no retries, no
//! caching. Any transport error, non-2xx status or non-JSON body is a
//! fault, so the interceptor answers `500`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::context::Context;
use crate::error::Fault;
use crate::handler::Handler;
use crate::middleware::intercept;

/// Fixed per deployment, supplied when the endpoint is built.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GroupConfig {
    /// App identifier, e.g. `redis.klot.io`. Empty means unconfigured.
    #[serde(default)]
    pub app: String,
    /// Base URL of the klot-io API.
    #[serde(default = "default_api")]
    pub api: String,
}

fn default_api() -> String { "http://api.klot-io".into() }

impl Default for GroupConfig {
    fn default() -> Self {
        Self { app: String::new(), api: default_api() }
    }
}

impl GroupConfig {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into(), ..Self::default() }
    }
}

/// The group endpoint.
pub struct Group {
    config: GroupConfig,
    client: reqwest::Client,
}

impl Group {
    pub fn new(config: GroupConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: GroupConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// `{api}/app/{app}/member`
    pub fn member_url(&self) -> String {
        format!(
            "{}/app/{}/member",
            self.config.api.trim_end_matches('/'),
            self.config.app
        )
    }

    /// `GET /group` → `200 {"group": [...]}`.
    pub async fn get(&self, _ctx: Context) -> Result<Value, Fault> {
        let url = self.member_url();
        debug!(%url, "looking up group members");

        let response = self.client.get(&url).send().await?;

        // reqwest hands unfollowed 3xx back as Ok.
        let status = response.status();
        if !status.is_success() {
            return Err(Fault::msg(format!("member lookup returned {status}")));
        }

        let members: Value = response.json().await?;

        Ok(json!({"group": members}))
    }

    /// The intercepted handler to register on a router.
    pub fn into_handler(self) -> impl Handler {
        let group = Arc::new(self);
        intercept(move |ctx| {
            let group = Arc::clone(&group);
            async move { group.get(ctx).await }
        })
        .named(concat!(module_path!(), "::Group::get"))
    }
}
