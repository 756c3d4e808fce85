//! Importing logins from the companion launcher.
//!
//! The launcher maintains a SQLite session store of past logins. An import
//! attempt runs `Idle -> Filtering -> {NoMatch, Matched -> Imported}`:
//!
//! 1. The operator's `[username] [server id] [server url]` are validated into a
//!    [`LoginFilter`]. Invalid combinations abort before the store is touched.
//! 2. The store is opened read-only and its `Login` rows are loaded.
//! 3. The first live record (store insertion order) matching the filter is
//!    copied into [`crate::auth::AuthState`].
//!
//! There are no retries, and the store is never written.

pub mod filter;
pub mod import;
pub mod store;

use std::path::PathBuf;

pub use filter::{LoginFilter, LoginQuery};
pub use import::{ImportOutcome, ImportedLogin, PLACEHOLDER_SERVER_ID, import_login, import_login_at};
pub use store::{
    DEFAULT_LAUNCHER_DIR, LoginRecord, SESSION_STORE_FILE, SessionStore, session_store_path,
};

/// Reasons an import attempt was aborted.
///
/// The display text is the line shown to the operator. None of these are
/// fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Custom server requires a URL")]
    MissingServerUrl,

    #[error("Server URL is only valid for custom servers")]
    UrlNotApplicable,

    #[error("Unable to access session store at {}: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Login for {user_name} cannot be imported: {reason}")]
    InvalidRecord { user_name: String, reason: String },
}
