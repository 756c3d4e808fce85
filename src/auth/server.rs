//! Auth server descriptors and the registry codec.
//!
//! A descriptor is encoded as `id@url`, and a registry as a comma-separated
//! list of descriptors:
//!
//! ```text
//! Space-Wizards@https://auth.spacestation14.com/,SimpleStation@https://auth.simplestation.org/
//! ```
//!
//! Endpoints are stored as parsed [`Url`]s, so encoding always emits the
//! normalized form (e.g. a trailing `/` is added to a bare host).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use crate::{Error, Result};

/// Separates a descriptor's id from its endpoint.
pub const DESCRIPTOR_DELIMITER: char = '@';

/// Separates descriptors in an encoded registry.
pub const LIST_DELIMITER: char = ',';

/// Id of the primary built-in auth server.
pub const DEFAULT_SERVER_ID: &str = "Space-Wizards";

/// Endpoint of the primary built-in auth server.
pub const DEFAULT_SERVER_URL: &str = "https://auth.spacestation14.com/";

/// Id of the secondary built-in auth server.
pub const SECONDARY_SERVER_ID: &str = "SimpleStation";

/// Endpoint of the secondary built-in auth server.
pub const SECONDARY_SERVER_URL: &str = "https://auth.simplestation.org/";

/// Reserved server id for self-hosted auth servers outside the registry.
pub const CUSTOM_SERVER_ID: &str = "Custom";

/// An authentication server: an identifier plus its endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AuthServer {
    id: String,
    endpoint: Url,
}

impl AuthServer {
    /// Build a descriptor from parts. The id is not validated.
    pub fn new(id: impl Into<String>, endpoint: Url) -> Self {
        Self {
            id: id.into(),
            endpoint,
        }
    }

    /// The primary built-in server, used as the default current server.
    pub fn fallback() -> Self {
        builtin(DEFAULT_SERVER_ID, DEFAULT_SERVER_URL)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Encode as `id@url`.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode an `id@url` string.
    ///
    /// The string must contain exactly one `@` with non-empty text on both
    /// sides, and the id must not contain `,`. The endpoint must be an
    /// absolute URL.
    pub fn decode(s: &str) -> Result<Self> {
        let mut parts = s.split(DESCRIPTOR_DELIMITER);
        let (Some(id), Some(endpoint), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::MalformedDescriptor(s.to_string()));
        };

        if id.is_empty() || endpoint.is_empty() || id.contains(LIST_DELIMITER) {
            return Err(Error::MalformedDescriptor(s.to_string()));
        }

        let endpoint = Url::parse(endpoint).map_err(|source| Error::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;

        Ok(Self::new(id, endpoint))
    }
}

impl fmt::Display for AuthServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.id, DESCRIPTOR_DELIMITER, self.endpoint)
    }
}

impl FromStr for AuthServer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

fn builtin(id: &str, url: &str) -> AuthServer {
    let endpoint = Url::parse(url).expect("built-in auth server URL is valid");
    AuthServer::new(id, endpoint)
}

/// A deduplicated set of known auth servers.
///
/// Insertion order is preserved so encoding is deterministic and lookups
/// resolve duplicate ids to the earliest inserted descriptor. Equality is set
/// equality and ignores order.
#[derive(Debug, Clone)]
pub struct ServerRegistry {
    servers: Vec<AuthServer>,
}

impl ServerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            servers: Vec::new(),
        }
    }

    /// Insert a descriptor. Returns `false` if an equal one was already present.
    pub fn insert(&mut self, server: AuthServer) -> bool {
        if self.contains(&server) {
            return false;
        }
        self.servers.push(server);
        true
    }

    pub fn contains(&self, server: &AuthServer) -> bool {
        self.servers.contains(server)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuthServer> {
        self.servers.iter()
    }

    /// First descriptor with the given id, if any.
    pub fn find_by_id(&self, id: &str) -> Option<&AuthServer> {
        self.servers.iter().find(|s| s.id == id)
    }

    /// First descriptor with the given endpoint, if any.
    pub fn find_by_endpoint(&self, endpoint: &Url) -> Option<&AuthServer> {
        self.servers.iter().find(|s| &s.endpoint == endpoint)
    }

    /// First descriptor whose normalized endpoint string equals `endpoint`.
    pub fn find_by_endpoint_str(&self, endpoint: &str) -> Option<&AuthServer> {
        self.servers.iter().find(|s| s.endpoint.as_str() == endpoint)
    }

    /// Encode as a comma-separated list of `id@url` descriptors.
    pub fn encode_list(&self) -> String {
        self.to_string()
    }

    /// Decode a comma-separated list of descriptors.
    ///
    /// Fails on the first malformed segment; no partial registry is returned.
    pub fn decode_list(s: &str) -> Result<Self> {
        s.split(LIST_DELIMITER).map(AuthServer::decode).collect()
    }
}

impl Default for ServerRegistry {
    /// The built-in primary and secondary servers.
    fn default() -> Self {
        [
            AuthServer::fallback(),
            builtin(SECONDARY_SERVER_ID, SECONDARY_SERVER_URL),
        ]
        .into_iter()
        .collect()
    }
}

impl PartialEq for ServerRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|s| other.contains(s))
    }
}

impl Eq for ServerRegistry {}

impl FromIterator<AuthServer> for ServerRegistry {
    fn from_iter<I: IntoIterator<Item = AuthServer>>(iter: I) -> Self {
        let mut registry = Self::new();
        for server in iter {
            registry.insert(server);
        }
        registry
    }
}

impl<'a> IntoIterator for &'a ServerRegistry {
    type Item = &'a AuthServer;
    type IntoIter = std::slice::Iter<'a, AuthServer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ServerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, server) in self.servers.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", LIST_DELIMITER)?;
            }
            write!(f, "{}", server)?;
        }
        Ok(())
    }
}

impl FromStr for ServerRegistry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode_list(s)
    }
}

impl Serialize for ServerRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.servers.iter())
    }
}
