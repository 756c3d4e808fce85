//! launchauth - credential bootstrap for client applications.
//!
//! This library loads authentication parameters into a single [`auth::AuthState`],
//! either from `ROBUST_AUTH_*` environment variables at startup or by importing
//! a login from the companion launcher's read-only session store.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod launcher;


/// Library-level error type for startup and configuration failures.
///
/// Any of these surfacing during environment loading is fatal: the process
/// should refuse to start rather than run with a half-configured identity.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed auth server descriptor: {0:?}")]
    MalformedDescriptor(String),

    #[error("Invalid auth server endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid user id {value:?}: {source}")]
    InvalidUserId {
        value: String,
        #[source]
        source: uuid::Error,
    },

    #[error("Environment variable {0} is not valid unicode")]
    InvalidEnvVar(String),

    #[error("Could not determine a data directory: pass --data-dir or set LAUNCHAUTH_DATA_DIR")]
    NoDataDir,
}

/// Result type alias for launchauth operations.
pub type Result<T> = std::result::Result<T, Error>;
