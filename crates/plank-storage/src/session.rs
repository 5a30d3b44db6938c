//! Mock local session: a logged-in user stored next to the board.
//!
//! Authentication only gates whether a board is shown; it has no bearing
//! on board correctness. Any email logs in, and the display name is
//! derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::fail_open::fail_open;
use crate::kv::KvStore;

/// Key under which the session lives.
pub const SESSION_KEY: &str = "session";

/// A locally stored login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Mock login: accepts any email and derives the profile from it.
    pub fn log_in(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            user_id: "user-1".to_string(),
            name,
            email: email.to_string(),
            avatar_url: format!(
                "https://ui-avatars.com/api/?name={}&background=3b82f6&color=fff",
                email
            ),
            logged_in_at: Utc::now(),
        }
    }
}

/// Read the current session. A missing or corrupt session reads as
/// logged out.
pub fn current_session<S: KvStore>(store: &S) -> Option<Session> {
    fail_open("session read", || {
        let Some(bytes) = store.read(SESSION_KEY)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    })
    .flatten()
}

/// Persist a session. Unlike board snapshots this surfaces errors, since
/// login is an explicit command.
pub fn save_session<S: KvStore>(store: &mut S, session: &Session) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(session)?;
    store.write(SESSION_KEY, &bytes)?;
    debug!(user = %session.name, "session saved");
    Ok(())
}

/// Log out: remove the stored session. Absence is fine.
pub fn clear_session<S: KvStore>(store: &mut S) -> Result<()> {
    store.delete(SESSION_KEY)
}
