//! Authentication parameters and their sources.
//!
//! This module provides:
//! - `AuthServer` / `ServerRegistry`: auth server descriptors and the `id@url,...` codec
//! - `AuthState`: the single mutable store of the client's auth parameters
//! - `env`: startup loading of `ROBUST_AUTH_*` environment variables

pub mod env;
pub mod server;
pub mod state;

pub use env::{AUTH_ENV_VARS, load_from_env};
pub use server::{AuthServer, CUSTOM_SERVER_ID, ServerRegistry};
pub use state::{AuthState, UserId};
