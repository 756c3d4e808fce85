//! Read-only access to the launcher's session store.
//!
//! The launcher keeps past logins in a SQLite database at
//! `<data dir>/<launcher dir>/settings.db`, table `Login`. This module only
//! ever opens it with `SQLITE_OPEN_READ_ONLY` and issues a single `SELECT`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use tracing::{debug, warn};

use super::ImportError;

/// File name of the session store inside the launcher directory.
pub const SESSION_STORE_FILE: &str = "settings.db";

/// Launcher directory name used when none is configured.
pub const DEFAULT_LAUNCHER_DIR: &str = "launcher";

/// Timestamp layouts the launcher has been seen to write for `Expires`.
const EXPIRY_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];
const NAIVE_EXPIRY_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// One row of the `Login` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRecord {
    /// User id as stored; parsed only when the record is imported.
    pub user_id: String,
    pub user_name: String,
    pub token: String,
    /// Auth server id, or [`crate::auth::CUSTOM_SERVER_ID`].
    pub server: String,
    /// Only meaningful for custom servers; empty when the column is NULL.
    pub server_url: String,
    /// `None` when the stored value could not be interpreted.
    pub expires: Option<DateTime<Utc>>,
}

impl LoginRecord {
    /// True if the record has a known expiry strictly after `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires > now)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let user_name: String = row.get::<_, Option<String>>(1)?.unwrap_or_default();
        let expires = expiry_from_value(row.get_ref(5)?);
        if expires.is_none() {
            warn!(user = %user_name, "Login record has an unreadable expiry; skipping it");
        }

        Ok(Self {
            user_id: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
            user_name,
            token: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            server: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            server_url: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            expires,
        })
    }
}

/// An open, read-only handle on the session store.
///
/// The connection is closed when the value is dropped.
pub struct SessionStore {
    path: PathBuf,
    conn: Connection,
}

impl SessionStore {
    /// Open the store at `path` without creating it.
    pub fn open(path: &Path) -> Result<Self, ImportError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| {
            ImportError::StoreUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), "Opened session store");

        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// All login records, in insertion order.
    pub fn logins(&self) -> Result<Vec<LoginRecord>, ImportError> {
        self.read_logins().map_err(|source| ImportError::StoreUnavailable {
            path: self.path.clone(),
            source,
        })
    }

    fn read_logins(&self) -> rusqlite::Result<Vec<LoginRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT UserId, UserName, Token, Server, ServerUrl, Expires FROM Login ORDER BY rowid",
        )?;
        let records = stmt
            .query_map([], LoginRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = records.len(), "Loaded login records");
        Ok(records)
    }
}

/// Build the store path from a data directory and launcher directory name.
pub fn session_store_path(data_dir: &Path, launcher_dir: &str) -> PathBuf {
    data_dir.join(launcher_dir).join(SESSION_STORE_FILE)
}

/// Interpret an `Expires` text value.
///
/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS[.fffffff][+HH:MM]` layout.
/// A value without an offset is taken as UTC.
pub fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in EXPIRY_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    NAIVE_EXPIRY_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn expiry_from_value(value: ValueRef<'_>) -> Option<DateTime<Utc>> {
    match value {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().and_then(parse_expiry),
        // Unix seconds
        ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0),
        _ => None,
    }
}
