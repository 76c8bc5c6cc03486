//! History-aware navigation.
//!
//! [`Navigator`] owns a [`Router`] and the history stack. Every navigation
//! resolves the target against the current session, follows redirects until
//! a page renders or nothing matches, and only then touches history. A
//! redirected navigation lands on the redirect target, which carries the
//! transfer state `{from}` of the location that was refused.
//!
//! Redirect chains are capped at [`NavigatorConfig::max_redirects`] hops;
//! a chain that revisits a target or exceeds the cap is
//! [`Blocked`](NavigationResult::Blocked) and history stays untouched.
//!
//! ```
//! use console_navigator::{
//!     Navigator, NavigatorConfig, PageDescriptor, PageMeta, RedirectRule, Router, Session,
//! };
//!
//! let router = Router::new(
//!     vec![
//!         PageDescriptor::new("cluster", ()),
//!         PageDescriptor::new("[-1]login", ())
//!             .meta(PageMeta::public().redirect_rule(RedirectRule::return_to_origin("/"))),
//!     ],
//!     NavigatorConfig::default(),
//! )
//! .unwrap();
//! let mut navigator = Navigator::new(router);
//!
//! let result = navigator.navigate(&Session::anonymous(), "/cluster");
//! assert_eq!(result.path(), "/login");
//! assert_eq!(navigator.current().origin(), Some("/cluster"));
//!
//! let result = navigator.refresh(&Session::signed_in("tok", "alice"));
//! assert_eq!(result.path(), "/cluster");
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, MatchCache};
use crate::config::NavigatorConfig;
use crate::error::NavigationResult;
use crate::router::{RedirectResponse, Resolution, Router};
use crate::session::{Location, Session};
use crate::state::RouterState;
use crate::{error_log, info_log};
use std::fmt;

/// Owned outcome of resolving one location.
enum Step {
    Render,
    NotFound,
    Redirect(RedirectResponse),
}

/// How the settled location enters history.
#[derive(Debug, Clone, Copy)]
enum NavigateOp {
    Push,
    Replace,
    Back,
    Forward,
    Refresh,
}

/// Router plus history.
pub struct Navigator<C> {
    router: Router<C>,
    state: RouterState,
    #[cfg(feature = "cache")]
    cache: MatchCache,
}

impl<C> Navigator<C> {
    /// Start at `/` without resolving it; call [`refresh`](Self::refresh)
    /// or navigate somewhere to settle the first page.
    pub fn new(router: Router<C>) -> Self {
        Self {
            #[cfg(feature = "cache")]
            cache: MatchCache::new(router.config().match_cache_capacity),
            router,
            state: RouterState::new(),
        }
    }

    pub fn router(&self) -> &Router<C> {
        &self.router
    }

    pub fn config(&self) -> &NavigatorConfig {
        self.router.config()
    }

    pub fn state(&self) -> &RouterState {
        &self.state
    }

    pub fn current(&self) -> &Location {
        self.state.current()
    }

    pub fn current_path(&self) -> &str {
        self.state.current_path()
    }

    pub fn can_go_back(&self) -> bool {
        self.state.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.state.can_go_forward()
    }

    /// Id of the latest navigation, bumped even when it ends up blocked.
    pub fn navigation_id(&self) -> usize {
        self.state.navigation_id()
    }

    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Resolve the current location for rendering.
    pub fn resolve_current(&self, session: &Session) -> Resolution<'_, C> {
        self.router.resolve(session, self.state.current())
    }

    /// Navigate to `to`, pushing a history entry.
    pub fn navigate(&mut self, session: &Session, to: impl Into<Location>) -> NavigationResult {
        self.run(session, to.into(), NavigateOp::Push)
    }

    /// Navigate to `to`, replacing the current entry.
    pub fn replace(&mut self, session: &Session, to: impl Into<Location>) -> NavigationResult {
        self.run(session, to.into(), NavigateOp::Replace)
    }

    /// Go back one entry. `None` at the start of history.
    pub fn back(&mut self, session: &Session) -> Option<NavigationResult> {
        let target = self.state.previous()?.clone();
        Some(self.run(session, target, NavigateOp::Back))
    }

    /// Go forward one entry. `None` at the end of history.
    pub fn forward(&mut self, session: &Session) -> Option<NavigationResult> {
        let target = self.state.next()?.clone();
        Some(self.run(session, target, NavigateOp::Forward))
    }

    /// Re-resolve the current entry, as after a session change.
    pub fn refresh(&mut self, session: &Session) -> NavigationResult {
        let target = self.state.current().clone();
        self.run(session, target, NavigateOp::Refresh)
    }

    fn run(&mut self, session: &Session, target: Location, op: NavigateOp) -> NavigationResult {
        let nav_id = self.state.start_navigation();
        info_log!(
            "Navigation #{} {:?}: '{}' -> '{}'",
            nav_id,
            op,
            self.state.current().href(),
            target.href()
        );

        let (settled, found, redirects) = match self.settle(session, target) {
            Ok(settled) => settled,
            Err(blocked) => return blocked,
        };

        match op {
            NavigateOp::Push => {
                self.state.push(settled);
            }
            NavigateOp::Replace => {
                self.state.replace(settled);
            }
            NavigateOp::Back => {
                self.state.back();
                if redirects > 0 {
                    self.state.replace(settled);
                }
            }
            NavigateOp::Forward => {
                self.state.forward();
                if redirects > 0 {
                    self.state.replace(settled);
                }
            }
            NavigateOp::Refresh => {
                if redirects > 0 {
                    self.state.replace(settled);
                }
            }
        }

        let path = self.state.current_path().to_string();
        info_log!("Navigation #{} settled on '{}' after {} redirects", nav_id, path, redirects);
        if found {
            NavigationResult::Rendered { path, redirects }
        } else {
            NavigationResult::NotFound { path, redirects }
        }
    }

    /// Follow redirects from `target` until something renders or nothing
    /// matches. Returns the final location, whether a page was found, and
    /// the number of hops.
    fn settle(
        &mut self,
        session: &Session,
        target: Location,
    ) -> Result<(Location, bool, usize), NavigationResult> {
        let max_redirects = self.router.config().max_redirects;
        let mut visited = vec![target.href()];
        let mut current = target;

        loop {
            let redirect = match self.step(session, &current) {
                Step::Render => return Ok((current, true, visited.len() - 1)),
                Step::NotFound => return Ok((current, false, visited.len() - 1)),
                Step::Redirect(redirect) => redirect,
            };

            let next = redirect.location();
            let href = next.href();
            if visited.contains(&href) {
                error_log!(
                    "Redirect loop detected: '{}' leads back to '{}'",
                    current.href(),
                    href
                );
                return Err(NavigationResult::Blocked {
                    reason: format!("Redirect loop detected: '{}' was already visited", href),
                    path: href,
                });
            }
            if visited.len() > max_redirects {
                error_log!(
                    "Redirect limit ({}) exceeded navigating to '{}'",
                    max_redirects,
                    href
                );
                return Err(NavigationResult::Blocked {
                    reason: format!("More than {} redirects", max_redirects),
                    path: href,
                });
            }

            visited.push(href);
            current = next;
        }
    }

    fn step(&mut self, session: &Session, location: &Location) -> Step {
        let resolution = self.resolve_cached(session, location);
        match resolution {
            Resolution::Render(_) => Step::Render,
            Resolution::NotFound => Step::NotFound,
            Resolution::Redirect(redirect) => Step::Redirect(redirect),
        }
    }

    #[cfg(feature = "cache")]
    fn resolve_cached(&mut self, session: &Session, location: &Location) -> Resolution<'_, C> {
        let Self { router, cache, .. } = self;
        let router: &Router<C> = router;
        let stack = match cache.get(&location.pathname) {
            Some(Some(indices)) => router.tree().stack_from_indices(&indices),
            Some(None) => None,
            None => {
                let stack = router.match_path(&location.pathname);
                cache.insert(
                    location.pathname.clone(),
                    stack.as_ref().map(|s| s.to_indices()),
                );
                stack
            }
        };
        match stack {
            Some(stack) => router.resolve_stack(stack, session, location),
            None => Resolution::NotFound,
        }
    }

    #[cfg(not(feature = "cache"))]
    fn resolve_cached(&mut self, session: &Session, location: &Location) -> Resolution<'_, C> {
        self.router.resolve(session, location)
    }
}

impl<C> fmt::Debug for Navigator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("router", &self.router)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
