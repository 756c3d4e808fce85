//! Importing a launcher login into [`AuthState`].

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use super::ImportError;
use super::filter::{LoginFilter, LoginQuery};
use super::store::{LoginRecord, SessionStore};
use crate::auth::{AuthServer, AuthState, ServerRegistry, UserId};

/// Server id given to imported logins; the store does not carry a display name.
pub const PLACEHOLDER_SERVER_ID: &str = "unset";

/// The account that was imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedLogin {
    pub user_id: UserId,
    pub user_name: String,
    /// Server id as stored in the record.
    pub server_id: String,
    pub server_url: Url,
}

/// Result of an import attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported(ImportedLogin),
    NoMatch,
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportOutcome::Imported(login) => write!(
                f,
                "Logged into account {}@{} ({})",
                login.user_name, login.server_id, login.server_url
            ),
            ImportOutcome::NoMatch => write!(f, "Unable to find a matching login"),
        }
    }
}

/// Import the first live login matching `query` from the store at `store_path`.
///
/// `state` is written only when a record is selected and fully converted;
/// every error and [`ImportOutcome::NoMatch`] leave it untouched.
pub fn import_login(
    state: &mut AuthState,
    store_path: &Path,
    query: LoginQuery,
) -> Result<ImportOutcome, ImportError> {
    import_login_at(state, store_path, query, Utc::now())
}

/// [`import_login`] with an explicit notion of "now".
pub fn import_login_at(
    state: &mut AuthState,
    store_path: &Path,
    query: LoginQuery,
    now: DateTime<Utc>,
) -> Result<ImportOutcome, ImportError> {
    let filter = LoginFilter::new(query)?;

    let records = {
        let store = SessionStore::open(store_path)?;
        store.logins()?
    };

    let Some(record) = filter.select(&records, now) else {
        debug!(candidates = records.len(), "No matching login in session store");
        return Ok(ImportOutcome::NoMatch);
    };

    let user_id = UserId::parse(&record.user_id).map_err(|e| invalid(record, e.to_string()))?;
    let endpoint = resolve_endpoint(record, &state.known_servers)?;

    state.set_login(
        user_id,
        record.token.clone(),
        AuthServer::new(PLACEHOLDER_SERVER_ID, endpoint.clone()),
    );
    info!(user = %record.user_name, server = %record.server, "Imported launcher login");

    Ok(ImportOutcome::Imported(ImportedLogin {
        user_id,
        user_name: record.user_name.clone(),
        server_id: record.server.clone(),
        server_url: endpoint,
    }))
}

/// The record's own URL if present, otherwise the registry endpoint for its server id.
fn resolve_endpoint(record: &LoginRecord, known: &ServerRegistry) -> Result<Url, ImportError> {
    if !record.server_url.is_empty() {
        return Url::parse(&record.server_url)
            .map_err(|e| invalid(record, format!("bad server URL {:?}: {}", record.server_url, e)));
    }

    known
        .find_by_id(&record.server)
        .map(|server| server.endpoint().clone())
        .ok_or_else(|| invalid(record, format!("unknown auth server {:?}", record.server)))
}

fn invalid(record: &LoginRecord, reason: String) -> ImportError {
    ImportError::InvalidRecord {
        user_name: record.user_name.clone(),
        reason,
    }
}
