//! Navigator configuration.
//!
//! ```
//! use console_navigator::NavigatorConfig;
//!
//! let config = NavigatorConfig::default()
//!     .no_session_path("/auth/login")
//!     .max_redirects(3);
//! assert_eq!(config.no_session_path, "/auth/login");
//! assert_eq!(config.max_redirects, 3);
//! ```
//!
//! Role names are fixed: pages listing [`SESSION_ROLE`](crate::SESSION_ROLE)
//! need a session, pages listing [`PUBLIC_ROLE`](crate::PUBLIC_ROLE) do not.

/// Default cap on consecutive redirects followed by one navigation.
pub const MAX_REDIRECT_DEPTH: usize = 5;

/// Default capacity of the path -> match chain cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Knobs shared by the router, the guards and the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Where users without a session are sent.
    pub no_session_path: String,
    /// Redirect hops followed before a navigation is blocked.
    pub max_redirects: usize,
    /// Entries kept by the match cache. `0` disables it.
    pub match_cache_capacity: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            no_session_path: "/login".to_string(),
            max_redirects: MAX_REDIRECT_DEPTH,
            match_cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl NavigatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_session_path(mut self, path: impl Into<String>) -> Self {
        self.no_session_path = path.into();
        self
    }

    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn match_cache_capacity(mut self, capacity: usize) -> Self {
        self.match_cache_capacity = capacity;
        self
    }
}
