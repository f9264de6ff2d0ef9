//! The endpoints every klot-io service exposes.
//!
//! | Path | Handler | Answers |
//! |---|---|---|
//! | `/health` | [`health::get`] | `{"message": "OK"}` |
//! | `/group`  | [`Group::get`]  | `{"group": [...]}` from the klot-io API |

pub mod group;
pub mod health;

pub use group::{Group, GroupConfig};

use tracing::warn;

use crate::middleware::intercept;
use crate::router::Router;

/// Registers `/health` and, when an app is configured, `/group`.
pub fn mount(router: Router, group: &GroupConfig) -> Router {
    let router = router.get("/health", intercept(health::get));

    if group.app.is_empty() {
        warn!("no app configured, /group is not mounted");
        return router;
    }

    router.get("/group", Group::new(group.clone()).into_handler())
}
