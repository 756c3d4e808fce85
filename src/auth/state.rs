//! Process-wide authentication state.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use super::server::{AuthServer, ServerRegistry};
use crate::{Error, Result};

/// Stable 128-bit identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a user id. Surrounding whitespace is ignored; hyphenated,
    /// simple, braced and URN forms are accepted.
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|source| Error::InvalidUserId {
                value: s.to_string(),
                source,
            })
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Client authentication parameters.
///
/// Created once with defaults, overridden by [`super::env::load_from_env`] at
/// startup, and optionally overwritten by a launcher import later. Callers
/// hold it by `&mut` for every mutation; there is no internal locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user_id: Option<UserId>,
    pub current_server: AuthServer,
    pub known_servers: ServerRegistry,
    pub token: Option<String>,
    pub public_key: Option<String>,
    /// If true, the user allows HWID information to be provided to servers.
    pub allow_hwid: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user_id: None,
            current_server: AuthServer::fallback(),
            known_servers: ServerRegistry::default(),
            token: None,
            public_key: None,
            allow_hwid: true,
        }
    }
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the logged-in identity in one step.
    pub fn set_login(&mut self, user_id: UserId, token: String, server: AuthServer) {
        self.user_id = Some(user_id);
        self.token = Some(token);
        self.current_server = server;
    }

    /// Both a user id and a token are present.
    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some() && self.token.is_some()
    }
}
