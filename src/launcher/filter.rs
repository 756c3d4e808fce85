//! Typed login lookup over session store records.

use chrono::{DateTime, Utc};

use super::ImportError;
use super::store::LoginRecord;
use crate::auth::CUSTOM_SERVER_ID;

/// Raw operator input for a login lookup: `[username] [server id] [server url]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginQuery {
    pub username: Option<String>,
    pub server_id: Option<String>,
    pub server_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ServerFilter {
    /// A registry server, matched by id alone.
    Registered(String),
    /// The custom sentinel, matched by exact URL.
    Custom { url: String },
}

/// A validated login predicate.
///
/// Construction enforces the server id / URL rules, so a `LoginFilter` can
/// always be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFilter {
    username: Option<String>,
    server: Option<ServerFilter>,
}

impl LoginFilter {
    /// Validate a query.
    ///
    /// - The custom server id requires a URL ([`ImportError::MissingServerUrl`]).
    /// - Any other server id rejects a URL ([`ImportError::UrlNotApplicable`]).
    /// - A URL given without a server id is ignored.
    pub fn new(query: LoginQuery) -> Result<Self, ImportError> {
        let server = match (query.server_id, query.server_url) {
            (None, _) => None,
            (Some(id), Some(url)) if id == CUSTOM_SERVER_ID => Some(ServerFilter::Custom { url }),
            (Some(id), None) if id == CUSTOM_SERVER_ID => return Err(ImportError::MissingServerUrl),
            (Some(_), Some(_)) => return Err(ImportError::UrlNotApplicable),
            (Some(id), None) => Some(ServerFilter::Registered(id)),
        };

        Ok(Self {
            username: query.username,
            server,
        })
    }

    /// True if `record` is unexpired at `now` and satisfies every filter.
    pub fn matches(&self, record: &LoginRecord, now: DateTime<Utc>) -> bool {
        if !record.is_live(now) {
            return false;
        }

        if let Some(ref username) = self.username {
            if record.user_name != *username {
                return false;
            }
        }

        match self.server {
            None => true,
            Some(ServerFilter::Registered(ref id)) => record.server == *id,
            Some(ServerFilter::Custom { ref url }) => {
                record.server == CUSTOM_SERVER_ID && record.server_url == *url
            }
        }
    }

    /// The first matching record in store order.
    pub fn select<'a>(&self, records: &'a [LoginRecord], now: DateTime<Utc>) -> Option<&'a LoginRecord> {
        records.iter().find(|record| self.matches(record, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(user: &str, server: &str, url: &str, expires_in: Duration) -> LoginRecord {
        LoginRecord {
            user_id: "5c3a4d9e-1f2b-4c6d-8e7f-9a0b1c2d3e4f".to_string(),
            user_name: user.to_string(),
            token: format!("token-{user}"),
            server: server.to_string(),
            server_url: url.to_string(),
            expires: Some(Utc::now() + expires_in),
        }
    }

    fn query(user: Option<&str>, server: Option<&str>, url: Option<&str>) -> LoginQuery {
        LoginQuery {
            username: user.map(str::to_string),
            server_id: server.map(str::to_string),
            server_url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_custom_server_requires_url() {
        let err = LoginFilter::new(query(None, Some("Custom"), None)).unwrap_err();
        assert!(matches!(err, ImportError::MissingServerUrl));
    }

    #[test]
    fn test_url_rejected_for_registered_server() {
        let err = LoginFilter::new(query(
            Some("alice"),
            Some("Space-Wizards"),
            Some("https://auth.spacestation14.com/"),
        ))
        .unwrap_err();
        assert!(matches!(err, ImportError::UrlNotApplicable));
    }

    #[test]
    fn test_sentinel_is_case_sensitive() {
        let err = LoginFilter::new(query(None, Some("custom"), Some("https://a/"))).unwrap_err();
        assert!(matches!(err, ImportError::UrlNotApplicable));
    }

    #[test]
    fn test_url_without_server_id_is_ignored() {
        let filter = LoginFilter::new(query(None, None, Some("https://ignored/"))).unwrap();
        assert_eq!(filter, LoginFilter::new(LoginQuery::default()).unwrap());
    }

    #[test]
    fn test_expired_records_never_match() {
        let filter = LoginFilter::new(LoginQuery::default()).unwrap();
        let now = Utc::now();
        assert!(!filter.matches(&record("alice", "Space-Wizards", "", -Duration::hours(1)), now));
        assert!(filter.matches(&record("alice", "Space-Wizards", "", Duration::hours(1)), now));
    }

    #[test]
    fn test_username_filter_is_exact() {
        let filter = LoginFilter::new(query(Some("alice"), None, None)).unwrap();
        let now = Utc::now();
        assert!(filter.matches(&record("alice", "Space-Wizards", "", Duration::hours(1)), now));
        assert!(!filter.matches(&record("Alice", "Space-Wizards", "", Duration::hours(1)), now));
        assert!(!filter.matches(&record("alice2", "Space-Wizards", "", Duration::hours(1)), now));
    }

    #[test]
    fn test_registered_server_filter() {
        let filter = LoginFilter::new(query(None, Some("SimpleStation"), None)).unwrap();
        let now = Utc::now();
        assert!(filter.matches(&record("a", "SimpleStation", "", Duration::hours(1)), now));
        assert!(!filter.matches(&record("a", "Space-Wizards", "", Duration::hours(1)), now));
    }

    #[test]
    fn test_custom_server_filter_matches_url_exactly() {
        let filter =
            LoginFilter::new(query(None, Some("Custom"), Some("https://auth.example.com/"))).unwrap();
        let now = Utc::now();
        let hour = Duration::hours(1);
        assert!(filter.matches(&record("a", "Custom", "https://auth.example.com/", hour), now));
        assert!(!filter.matches(&record("a", "Custom", "https://auth.example.com", hour), now));
        assert!(!filter.matches(&record("a", "Space-Wizards", "https://auth.example.com/", hour), now));
    }

    #[test]
    fn test_select_first_match_in_store_order() {
        let filter = LoginFilter::new(query(None, Some("Space-Wizards"), None)).unwrap();
        let records = vec![
            record("expired", "Space-Wizards", "", -Duration::hours(1)),
            record("other", "SimpleStation", "", Duration::hours(1)),
            record("first", "Space-Wizards", "", Duration::hours(1)),
            record("second", "Space-Wizards", "", Duration::hours(2)),
        ];
        let selected = filter.select(&records, Utc::now()).unwrap();
        assert_eq!(selected.user_name, "first");
    }

    #[test]
    fn test_select_none() {
        let filter = LoginFilter::new(query(Some("nobody"), None, None)).unwrap();
        let records = vec![record("alice", "Space-Wizards", "", Duration::hours(1))];
        assert!(filter.select(&records, Utc::now()).is_none());
    }
}
