//! Common test utilities for launchauth integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never read the
//! user's real launcher data or `ROBUST_AUTH_*` variables.

#![allow(dead_code)]

use assert_cmd::Command;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, params};
pub use tempfile::TempDir;

pub const ALICE_ID: &str = "5c3a4d9e-1f2b-4c6d-8e7f-9a0b1c2d3e4f";
pub const BOB_ID: &str = "0f1e2d3c-4b5a-4978-8695-a4b3c2d1e0f9";

const ISOLATED_VARS: [&str; 7] = [
    "ROBUST_AUTH_SERVERS",
    "ROBUST_AUTH_USERID",
    "ROBUST_AUTH_PUBKEY",
    "ROBUST_AUTH_TOKEN",
    "ROBUST_AUTH_ALLOW_HWID",
    "SS14_LAUNCHER_APPDATA_NAME",
    "RUST_LOG",
];

/// A test environment with an isolated data directory.
///
/// The `launchauth()` method returns a `Command` that sets
/// `LAUNCHAUTH_DATA_DIR` per-invocation and clears every auth variable,
/// making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with no session store.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment with an empty launcher session store.
    pub fn with_store() -> Self {
        let env = Self::new();
        std::fs::create_dir_all(env.data_path().join("launcher")).unwrap();
        let conn = Connection::open(env.store_path()).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE Login (
                UserId TEXT NOT NULL PRIMARY KEY,
                UserName TEXT NOT NULL,
                Token TEXT NOT NULL,
                Server TEXT NOT NULL,
                ServerUrl TEXT,
                Expires TEXT NOT NULL
            );
            "#,
        )
        .unwrap();
        env
    }

    /// Get a Command for the launchauth binary with an isolated environment.
    pub fn launchauth(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_launchauth"));
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("LAUNCHAUTH_DATA_DIR", self.data_dir.path());
        cmd
    }

    /// Insert a login row into the session store.
    pub fn add_login(
        &self,
        user_id: &str,
        user_name: &str,
        token: &str,
        server: &str,
        server_url: Option<&str>,
        expires: DateTime<Utc>,
    ) {
        let conn = Connection::open(self.store_path()).unwrap();
        conn.execute(
            "INSERT INTO Login (UserId, UserName, Token, Server, ServerUrl, Expires)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                user_name,
                token,
                server,
                server_url,
                format!("{}0+00:00", expires.format("%Y-%m-%d %H:%M:%S%.6f"))
            ],
        )
        .unwrap();
    }

    /// Insert an unexpired Space-Wizards login.
    pub fn add_wizards_login(&self, user_id: &str, user_name: &str, token: &str) {
        self.add_login(
            user_id,
            user_name,
            token,
            "Space-Wizards",
            Some("https://auth.spacestation14.com/"),
            tomorrow(),
        );
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Get the path to the session store.
    pub fn store_path(&self) -> std::path::PathBuf {
        self.data_path().join("launcher").join("settings.db")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn tomorrow() -> DateTime<Utc> {
    Utc::now() + Duration::days(1)
}

pub fn yesterday() -> DateTime<Utc> {
    Utc::now() - Duration::days(1)
}
