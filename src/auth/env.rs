//! Startup loading of auth parameters from environment variables.
//!
//! Variables that are not set leave the corresponding field untouched.
//! Structured values (server list, user id) that fail to parse are fatal
//! errors; opaque values (token, public key) are taken verbatim.

use std::env::{self, VarError};

use tracing::debug;

use super::server::ServerRegistry;
use super::state::{AuthState, UserId};
use crate::{Error, Result};

/// Comma-separated `id@url` list replacing the known servers.
pub const AUTH_SERVERS_ENV: &str = "ROBUST_AUTH_SERVERS";

/// User id of the logged-in account.
pub const AUTH_USERID_ENV: &str = "ROBUST_AUTH_USERID";

/// Public key used to verify auth server responses.
pub const AUTH_PUBKEY_ENV: &str = "ROBUST_AUTH_PUBKEY";

/// Bearer token of the logged-in account.
pub const AUTH_TOKEN_ENV: &str = "ROBUST_AUTH_TOKEN";

/// `1` allows HWID information to be sent to servers; anything else denies it.
pub const AUTH_ALLOW_HWID_ENV: &str = "ROBUST_AUTH_ALLOW_HWID";

/// All variables read by [`load_from_env`], in application order.
pub const AUTH_ENV_VARS: [&str; 5] = [
    AUTH_SERVERS_ENV,
    AUTH_USERID_ENV,
    AUTH_PUBKEY_ENV,
    AUTH_TOKEN_ENV,
    AUTH_ALLOW_HWID_ENV,
];

/// Apply `ROBUST_AUTH_*` variables from the process environment to `state`.
///
/// Returns the names of the variables that were applied.
pub fn load_from_env(state: &mut AuthState) -> Result<Vec<&'static str>> {
    load_with(state, process_var)
}

/// Apply auth variables obtained through `lookup`.
///
/// Every value is parsed before any field is written, so on error `state` is
/// left exactly as it was.
pub fn load_with<F>(state: &mut AuthState, mut lookup: F) -> Result<Vec<&'static str>>
where
    F: FnMut(&'static str) -> Result<Option<String>>,
{
    let servers = lookup(AUTH_SERVERS_ENV)?
        .map(|v| ServerRegistry::decode_list(&v))
        .transpose()?;
    let user_id = lookup(AUTH_USERID_ENV)?
        .map(|v| UserId::parse(&v))
        .transpose()?;
    let public_key = lookup(AUTH_PUBKEY_ENV)?;
    let token = lookup(AUTH_TOKEN_ENV)?;
    let allow_hwid = lookup(AUTH_ALLOW_HWID_ENV)?.map(|v| parse_allow_hwid(&v));

    let mut applied = Vec::new();

    if let Some(servers) = servers {
        debug!(count = servers.len(), "Loaded auth servers from {}", AUTH_SERVERS_ENV);
        state.known_servers = servers;
        applied.push(AUTH_SERVERS_ENV);
    }

    if let Some(user_id) = user_id {
        state.user_id = Some(user_id);
        applied.push(AUTH_USERID_ENV);
    }

    if let Some(public_key) = public_key {
        state.public_key = Some(public_key);
        applied.push(AUTH_PUBKEY_ENV);
    }

    if let Some(token) = token {
        state.token = Some(token);
        applied.push(AUTH_TOKEN_ENV);
    }

    if let Some(allow_hwid) = allow_hwid {
        state.allow_hwid = allow_hwid;
        applied.push(AUTH_ALLOW_HWID_ENV);
    }

    debug!(?applied, "Applied auth environment variables");
    Ok(applied)
}

/// HWID sharing is allowed iff the trimmed value is exactly `1`.
pub fn parse_allow_hwid(value: &str) -> bool {
    value.trim() == "1"
}

fn process_var(name: &'static str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(Error::InvalidEnvVar(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    const ID: &str = "5c3a4d9e-1f2b-4c6d-8e7f-9a0b1c2d3e4f";

    fn load(vars: &[(&'static str, &str)]) -> (AuthState, Result<Vec<&'static str>>) {
        let vars: HashMap<&str, String> = vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        let mut state = AuthState::new();
        let result = load_with(&mut state, |name| Ok(vars.get(name).cloned()));
        (state, result)
    }

    #[test]
    fn test_no_variables_keeps_defaults() {
        let (state, result) = load(&[]);
        assert!(result.unwrap().is_empty());
        assert_eq!(state, AuthState::new());
    }

    #[test]
    fn test_all_variables_applied() {
        let (state, result) = load(&[
            (AUTH_SERVERS_ENV, "Mine@https://auth.example.com/"),
            (AUTH_USERID_ENV, ID),
            (AUTH_PUBKEY_ENV, "pubkey"),
            (AUTH_TOKEN_ENV, "token"),
            (AUTH_ALLOW_HWID_ENV, "0"),
        ]);

        assert_eq!(result.unwrap(), AUTH_ENV_VARS.to_vec());
        assert_eq!(state.known_servers.encode_list(), "Mine@https://auth.example.com/");
        assert_eq!(state.user_id, Some(UserId::parse(ID).unwrap()));
        assert_eq!(state.public_key.as_deref(), Some("pubkey"));
        assert_eq!(state.token.as_deref(), Some("token"));
        assert!(!state.allow_hwid);
        assert!(state.is_logged_in());
    }

    #[test]
    fn test_opaque_values_taken_verbatim() {
        let (state, result) = load(&[(AUTH_TOKEN_ENV, "  spaced@,token "), (AUTH_PUBKEY_ENV, "")]);
        result.unwrap();
        assert_eq!(state.token.as_deref(), Some("  spaced@,token "));
        assert_eq!(state.public_key.as_deref(), Some(""));
    }

    #[test]
    fn test_malformed_server_list_is_fatal() {
        let (state, result) = load(&[
            (AUTH_TOKEN_ENV, "token"),
            (AUTH_SERVERS_ENV, "Mine@https://auth.example.com/,oops"),
        ]);
        assert!(matches!(result.unwrap_err(), Error::MalformedDescriptor(_)));
        assert_eq!(state, AuthState::new());
    }

    #[test]
    fn test_invalid_server_endpoint_is_fatal() {
        let (_, result) = load(&[(AUTH_SERVERS_ENV, "Mine@auth.example.com")]);
        assert!(matches!(result.unwrap_err(), Error::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_malformed_user_id_is_fatal() {
        let (state, result) = load(&[(AUTH_USERID_ENV, "not-a-guid"), (AUTH_TOKEN_ENV, "t")]);
        assert!(matches!(result.unwrap_err(), Error::InvalidUserId { .. }));
        assert_eq!(state.token, None);
    }

    #[test]
    fn test_allow_hwid_parsing() {
        assert!(parse_allow_hwid("1"));
        assert!(parse_allow_hwid(" 1 "));
        assert!(parse_allow_hwid("\t1\n"));
        assert!(!parse_allow_hwid("0"));
        assert!(!parse_allow_hwid("yes"));
        assert!(!parse_allow_hwid("true"));
        assert!(!parse_allow_hwid(""));
        assert!(!parse_allow_hwid("1 1"));
    }

    #[test]
    fn test_unrecognized_allow_hwid_disables() {
        let (state, result) = load(&[(AUTH_ALLOW_HWID_ENV, "yes")]);
        assert_eq!(result.unwrap(), vec![AUTH_ALLOW_HWID_ENV]);
        assert!(!state.allow_hwid);
    }

    #[test]
    fn test_lookup_error_propagates() {
        let mut state = AuthState::new();
        let err = load_with(&mut state, |name| {
            if name == AUTH_TOKEN_ENV {
                Err(Error::InvalidEnvVar(name.to_string()))
            } else {
                Ok(None)
            }
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidEnvVar(ref n) if n == AUTH_TOKEN_ENV));
    }

    #[test]
    #[serial]
    fn test_load_from_process_env() {
        // SAFETY: serialized with every other test touching the process environment.
        unsafe {
            for name in AUTH_ENV_VARS {
                env::remove_var(name);
            }
            env::set_var(AUTH_TOKEN_ENV, "from-env");
            env::set_var(AUTH_ALLOW_HWID_ENV, " 1 ");
        }

        let mut state = AuthState::new();
        state.allow_hwid = false;
        let applied = load_from_env(&mut state).unwrap();

        unsafe {
            env::remove_var(AUTH_TOKEN_ENV);
            env::remove_var(AUTH_ALLOW_HWID_ENV);
        }

        assert_eq!(applied, vec![AUTH_TOKEN_ENV, AUTH_ALLOW_HWID_ENV]);
        assert_eq!(state.token.as_deref(), Some("from-env"));
        assert!(state.allow_hwid);
        assert_eq!(state.user_id, None);
    }
}
