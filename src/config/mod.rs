//! Runtime settings for launchauth.
//!
//! Settings locate the launcher's session store:
//!
//! ```text
//! <data dir>/<launcher dir name>/settings.db
//! ```
//!
//! Auth parameters themselves are not settings; they live in
//! [`crate::auth::AuthState`] and come from `ROBUST_AUTH_*` variables or an
//! import.
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;

pub use resolver::{
    DATA_DIR_ENV, LAUNCHER_DIR_ENV, Resolved, Settings, SettingsOverrides, ValueSource,
    resolve_settings, resolve_settings_with,
};
