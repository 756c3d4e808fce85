//! Command implementations for the launchauth CLI.
//!
//! Each command returns a result type implementing [`Output`], which the
//! binary prints as JSON or as human-readable text.

use std::path::PathBuf;

use serde::Serialize;

use crate::auth::{AuthServer, AuthState, UserId};
use crate::config::Settings;
use crate::launcher::{self, ImportError, ImportOutcome, LoginQuery};

/// Version string including build metadata.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LAUNCHAUTH_GIT_COMMIT"),
    ", built ",
    env!("LAUNCHAUTH_BUILD_TIMESTAMP"),
    ")"
);

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// Mask a secret for display, keeping only its edges.
///
/// Secrets of four characters or fewer are hidden entirely.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        "...".to_string()
    } else if chars.len() <= 12 {
        let head: String = chars.iter().take(4.min(chars.len() / 2)).collect();
        format!("{}...", head)
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

// === import ===

/// Result of `launchauth import`.
#[derive(Debug, Serialize)]
pub struct ImportResult {
    #[serde(flatten)]
    pub outcome: ImportOutcome,
    pub store: PathBuf,
}

impl Output for ImportResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.outcome.to_string()
    }
}

/// Import a launcher login into `state`.
pub fn import(
    state: &mut AuthState,
    settings: &Settings,
    query: LoginQuery,
) -> Result<ImportResult, ImportError> {
    let store = settings.session_store_path();
    let outcome = launcher::import_login(state, &store, query)?;
    Ok(ImportResult { outcome, store })
}

// === status ===

/// Result of `launchauth status`.
#[derive(Debug, Serialize)]
pub struct StatusResult {
    pub logged_in: bool,
    pub user_id: Option<UserId>,
    pub current_server: AuthServer,
    pub known_servers: Vec<AuthServer>,
    /// Masked token
    pub token: Option<String>,
    /// Masked public key
    pub public_key: Option<String>,
    pub allow_hwid: bool,
    pub env_applied: Vec<String>,
    pub session_store: Option<PathBuf>,
}

impl Output for StatusResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        let or_none = |v: Option<String>| v.unwrap_or_else(|| "(none)".to_string());

        lines.push(format!(
            "Logged in: {}",
            if self.logged_in { "yes" } else { "no" }
        ));
        lines.push(format!("User ID: {}", or_none(self.user_id.map(|u| u.to_string()))));
        lines.push(format!("Token: {}", or_none(self.token.clone())));
        lines.push(format!("Public key: {}", or_none(self.public_key.clone())));
        lines.push(format!("Current server: {}", self.current_server));
        lines.push(format!("Allow HWID: {}", self.allow_hwid));
        lines.push(format!("Known servers ({}):", self.known_servers.len()));
        for server in &self.known_servers {
            lines.push(format!("  {}", server));
        }
        if !self.env_applied.is_empty() {
            lines.push(format!("From environment: {}", self.env_applied.join(", ")));
        }
        if let Some(ref store) = self.session_store {
            lines.push(format!("Session store: {}", store.display()));
        }
        lines.join("\n")
    }
}

/// Describe `state` without exposing secrets.
pub fn status(state: &AuthState, env_applied: &[&str], settings: Option<&Settings>) -> StatusResult {
    StatusResult {
        logged_in: state.is_logged_in(),
        user_id: state.user_id,
        current_server: state.current_server.clone(),
        known_servers: state.known_servers.iter().cloned().collect(),
        token: state.token.as_deref().map(mask_secret),
        public_key: state.public_key.as_deref().map(mask_secret),
        allow_hwid: state.allow_hwid,
        env_applied: env_applied.iter().map(|s| s.to_string()).collect(),
        session_store: settings.map(Settings::session_store_path),
    }
}

// === servers ===

/// Result of `launchauth servers list`.
#[derive(Debug, Serialize)]
pub struct ServerList {
    pub count: usize,
    pub servers: Vec<AuthServer>,
}

impl Output for ServerList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.servers.is_empty() {
            return "No known auth servers.".to_string();
        }
        self.servers
            .iter()
            .map(|s| format!("{:<20} {}", s.id(), s.endpoint()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn servers_list(state: &AuthState) -> ServerList {
    let servers: Vec<AuthServer> = state.known_servers.iter().cloned().collect();
    ServerList {
        count: servers.len(),
        servers,
    }
}

/// Result of `launchauth servers encode`.
#[derive(Debug, Serialize)]
pub struct EncodedServers {
    pub encoded: String,
}

impl Output for EncodedServers {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.encoded.clone()
    }
}

pub fn servers_encode(state: &AuthState) -> EncodedServers {
    EncodedServers {
        encoded: state.known_servers.encode_list(),
    }
}

/// Result of `launchauth servers find`.
#[derive(Debug, Serialize)]
pub struct ServerLookup {
    pub found: bool,
    pub server: Option<AuthServer>,
}

impl Output for ServerLookup {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match self.server {
            Some(ref server) => server.to_string(),
            None => "No matching auth server.".to_string(),
        }
    }
}

/// Look up a known server by id, or else by endpoint URL.
pub fn servers_find(state: &AuthState, id: Option<&str>, url: Option<&str>) -> ServerLookup {
    let server = match (id, url) {
        (Some(id), _) => state.known_servers.find_by_id(id),
        (None, Some(url)) => url::Url::parse(url)
            .ok()
            .and_then(|u| state.known_servers.find_by_endpoint(&u))
            .or_else(|| state.known_servers.find_by_endpoint_str(url)),
        (None, None) => None,
    };

    ServerLookup {
        found: server.is_some(),
        server: server.cloned(),
    }
}
