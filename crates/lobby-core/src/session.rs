// ── Login session ──
//
// Holds the authenticated username for the rest of the application.
// One handle is created by the shell and cloned to whoever needs it;
// all clones observe the same value.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{debug, info};

/// Shared, lock-free holder of the logged-in username.
///
/// Written once per successful connect; read by any number of
/// downstream screens.
#[derive(Clone)]
pub struct LoginSession {
    username: Arc<ArcSwapOption<String>>,
}

impl LoginSession {
    pub fn new() -> Self {
        Self {
            username: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// Store `name`, lower-cased.
    pub fn set_username(&self, name: &str) {
        let normalized = name.to_lowercase();
        info!(username = %normalized, "session established");
        self.username.store(Some(Arc::new(normalized)));
    }

    /// The logged-in username, or `None` if nobody has logged in.
    pub fn username(&self) -> Option<String> {
        self.username.load_full().map(|name| name.as_ref().clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.load().is_some()
    }

    /// Forget the current user (explicit logout).
    pub fn clear(&self) {
        if self.username.swap(None).is_some() {
            debug!("session cleared");
        }
    }
}

impl Default for LoginSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoginSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginSession")
            .field("username", &self.username())
            .finish()
    }
}
