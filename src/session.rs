//! Session and location records.
//!
//! The session is passed explicitly into every guard evaluation; nothing in
//! this crate reads it from ambient storage. A host persists it in
//! tab-scoped storage through [`Session::to_storage_json`].
//!
//! ```
//! use console_navigator::{Location, Session, TransferState};
//!
//! let session = Session::signed_in("tok", "alice");
//! assert!(session.is_authenticated());
//!
//! let restored = Session::from_storage_json(&session.to_storage_json().unwrap()).unwrap();
//! assert_eq!(restored, session);
//!
//! let login = Location::new("/login").with_state(TransferState::new("/cluster?tab=hosts"));
//! assert_eq!(login.origin(), Some("/cluster?tab=hosts"));
//! ```

use crate::matching::normalize_path;
use serde::{Deserialize, Serialize};

// ============================================================================
// Session
// ============================================================================

/// The current user's session.
///
/// An empty `session` string means unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub session: String,
    #[serde(default)]
    pub password_expired: bool,
}

impl Session {
    /// A session with nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session after a successful login.
    pub fn signed_in(token: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            session: session.into(),
            password_expired: false,
        }
    }

    /// `true` when a session id is present.
    pub fn is_authenticated(&self) -> bool {
        !self.session.is_empty()
    }

    /// Clear the session, as on logout or an HTTP 401.
    pub fn sign_out(&mut self) {
        *self = Self::anonymous();
    }

    /// Encode for tab-scoped storage.
    pub fn to_storage_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from tab-scoped storage.
    pub fn from_storage_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// TransferState
// ============================================================================

/// State carried across a guard redirect: where the user was going.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferState {
    pub from: String,
}

impl TransferState {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

// ============================================================================
// Location
// ============================================================================

/// A navigation target: path, query string and optional transfer state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    #[serde(default)]
    pub search: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TransferState>,
}

impl Location {
    /// Parse an href such as `/cluster/42?tab=hosts`.
    ///
    /// The path part is normalized; `search` keeps its leading `?`.
    pub fn new(href: &str) -> Self {
        let (pathname, search) = match href.find('?') {
            Some(at) => (&href[..at], &href[at..]),
            None => (href, ""),
        };
        Self {
            pathname: normalize_path(pathname).into_owned(),
            search: search.to_string(),
            state: None,
        }
    }

    /// Attach transfer state.
    pub fn with_state(mut self, state: TransferState) -> Self {
        self.state = Some(state);
        self
    }

    /// Path plus query string, as recorded in `from`.
    pub fn href(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }

    /// The transfer state's `from`, if any.
    pub fn origin(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.from.as_str())
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("/")
    }
}

impl From<&str> for Location {
    fn from(href: &str) -> Self {
        Self::new(href)
    }
}

impl From<String> for Location {
    fn from(href: String) -> Self {
        Self::new(&href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_out_clears_everything() {
        let mut session = Session::signed_in("tok", "alice");
        session.password_expired = true;
        session.sign_out();
        assert_eq!(session, Session::anonymous());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_session_storage_is_camel_case() {
        let session = Session::signed_in("tok", "alice");
        let json = session.to_storage_json().unwrap();
        assert_eq!(
            json,
            r#"{"token":"tok","session":"alice","passwordExpired":false}"#
        );
    }

    #[test]
    fn test_session_storage_tolerates_missing_flag() {
        let session = Session::from_storage_json(r#"{"token":"t","session":"s"}"#).unwrap();
        assert!(!session.password_expired);
    }

    #[test]
    fn test_transfer_state_wire_format() {
        let json = serde_json::to_string(&TransferState::new("/cluster")).unwrap();
        assert_eq!(json, r#"{"from":"/cluster"}"#);
    }

    #[test]
    fn test_location_parsing() {
        let location = Location::new("cluster/42/?tab=hosts");
        assert_eq!(location.pathname, "/cluster/42");
        assert_eq!(location.search, "?tab=hosts");
        assert_eq!(location.href(), "/cluster/42?tab=hosts");
        assert_eq!(location.origin(), None);
    }

    #[test]
    fn test_location_serialization_skips_empty_state() {
        let json = serde_json::to_value(Location::new("/login")).unwrap();
        assert_eq!(json, serde_json::json!({"pathname": "/login", "search": ""}));
    }
}
