//! Navigation guards.
//!
//! Guards decide, per navigation, whether the matched page renders or the
//! user is sent elsewhere. Evaluation is synchronous and pure: a guard sees
//! the explicit [`Session`], the [`Location`] being visited and one node's
//! metadata, nothing else.
//!
//! # Built-in guards
//!
//! | Guard | Priority | Outcome |
//! |-------|----------|---------|
//! | [`SessionGuard`] | 100 | page needs a session and there is none: go to the login path |
//! | [`RedirectRuleGuard`] | 90 | the page's redirect rule names a target: go there |
//!
//! # Execution order
//!
//! [`NavigationGuard`] runs guards in **priority order** (higher value
//! first), each over the whole matched chain from root to leaf. The first
//! non-[`Allowed`](GuardOutcome::Allowed) outcome wins. A missing session is
//! therefore reported before any redirect rule anywhere in the chain fires,
//! and a directory's session requirement covers its children.
//!
//! Redirect rules are called as-is; a rule that panics is not caught.
//!
//! # Example
//!
//! ```
//! use console_navigator::{
//!     GuardOutcome, GuardRequest, Location, NavigationGuard, NavigatorConfig, PageMeta, Session,
//! };
//!
//! let guard = NavigationGuard::from_config(&NavigatorConfig::default());
//! let meta = PageMeta::new();
//! let location = Location::new("/cluster");
//! let session = Session::anonymous();
//!
//! let outcome = guard.evaluate(&session, &location, [("cluster", &meta)]);
//! assert_eq!(outcome, GuardOutcome::RoleDenied { to: "/login".to_string() });
//! ```

use crate::config::NavigatorConfig;
use crate::debug_log;
use crate::meta::PageMeta;
use crate::session::{Location, Session};

// ============================================================================
// GuardOutcome
// ============================================================================

/// Terminal states of guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the page.
    Allowed,
    /// The page needs a session and there is none.
    RoleDenied { to: String },
    /// The page's redirect rule sent the user elsewhere.
    ConditionalRedirect { to: String },
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allowed)
    }

    /// Redirect target, if this outcome redirects.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            GuardOutcome::Allowed => None,
            GuardOutcome::RoleDenied { to } | GuardOutcome::ConditionalRedirect { to } => Some(to),
        }
    }
}

// ============================================================================
// GuardRequest
// ============================================================================

/// Everything a guard may look at for one node of the matched chain.
#[derive(Debug, Clone, Copy)]
pub struct GuardRequest<'a> {
    pub session: &'a Session,
    pub location: &'a Location,
    /// Id of the node being checked.
    pub route_id: &'a str,
    pub meta: &'a PageMeta,
}

// ============================================================================
// RouteGuard trait
// ============================================================================

/// A navigation guard.
///
/// # Example
///
/// ```
/// use console_navigator::{GuardOutcome, GuardRequest, RouteGuard};
///
/// struct MaintenanceGuard;
///
/// impl RouteGuard for MaintenanceGuard {
///     fn check(&self, request: &GuardRequest<'_>) -> GuardOutcome {
///         if request.route_id.starts_with("cluster") {
///             GuardOutcome::ConditionalRedirect { to: "/maintenance".into() }
///         } else {
///             GuardOutcome::Allowed
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "MaintenanceGuard"
///     }
/// }
/// ```
pub trait RouteGuard: Send + Sync + 'static {
    /// Check one node of the matched chain.
    fn check(&self, request: &GuardRequest<'_>) -> GuardOutcome;

    /// Guard name for debugging and logs.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }

    /// Priority for execution order. Higher runs first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// guard_fn helper
// ============================================================================

/// Create a guard from a function or closure.
///
/// ```
/// use console_navigator::{guard_fn, GuardOutcome};
///
/// let guard = guard_fn(|request| {
///     if request.session.password_expired && request.location.pathname != "/password" {
///         GuardOutcome::ConditionalRedirect { to: "/password".into() }
///     } else {
///         GuardOutcome::Allowed
///     }
/// });
/// ```
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&GuardRequest<'_>) -> GuardOutcome + Send + Sync + 'static,
{
    FnGuard { f }
}

/// Guard created from a function or closure.
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteGuard for FnGuard<F>
where
    F: Fn(&GuardRequest<'_>) -> GuardOutcome + Send + Sync + 'static,
{
    fn check(&self, request: &GuardRequest<'_>) -> GuardOutcome {
        (self.f)(request)
    }
}

// ============================================================================
// SessionGuard
// ============================================================================

/// Sends visitors without a session to the login page.
///
/// A page needs a session when its roles include
/// [`SESSION_ROLE`](crate::meta::SESSION_ROLE).
pub struct SessionGuard {
    no_session_path: String,
}

impl SessionGuard {
    pub fn new(no_session_path: impl Into<String>) -> Self {
        Self {
            no_session_path: no_session_path.into(),
        }
    }
}

impl RouteGuard for SessionGuard {
    fn check(&self, request: &GuardRequest<'_>) -> GuardOutcome {
        if request.meta.requires_session() && !request.session.is_authenticated() {
            GuardOutcome::RoleDenied {
                to: self.no_session_path.clone(),
            }
        } else {
            GuardOutcome::Allowed
        }
    }

    fn name(&self) -> &'static str {
        "SessionGuard"
    }

    fn priority(&self) -> i32 {
        100
    }
}

// ============================================================================
// RedirectRuleGuard
// ============================================================================

/// Runs the page's redirect rule.
#[derive(Default)]
pub struct RedirectRuleGuard;

impl RouteGuard for RedirectRuleGuard {
    fn check(&self, request: &GuardRequest<'_>) -> GuardOutcome {
        let Some(rule) = request.meta.redirect.as_ref().and_then(|r| r.rule()) else {
            return GuardOutcome::Allowed;
        };
        match rule.evaluate(request.session, request.location) {
            Some(to) => GuardOutcome::ConditionalRedirect { to },
            None => GuardOutcome::Allowed,
        }
    }

    fn name(&self) -> &'static str {
        "RedirectRuleGuard"
    }

    fn priority(&self) -> i32 {
        90
    }
}

// ============================================================================
// NavigationGuard
// ============================================================================

/// Runs a set of guards over a matched chain.
///
/// Guards execute in priority order, each over every node from root to
/// leaf; the first non-allowed outcome is returned.
pub struct NavigationGuard {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl NavigationGuard {
    /// A guard set with nothing in it.
    pub fn empty() -> Self {
        Self { guards: Vec::new() }
    }

    /// The built-in guards configured from `config`.
    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self::empty()
            .guard(SessionGuard::new(config.no_session_path.clone()))
            .guard(RedirectRuleGuard)
    }

    /// Add a guard.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.push(Box::new(guard));
        self
    }

    /// Add a boxed guard, keeping priority order.
    pub fn push(&mut self, guard: Box<dyn RouteGuard>) {
        self.guards.push(guard);
        self.guards.sort_by_key(|g| std::cmp::Reverse(g.priority()));
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Evaluate the guards over `chain`, given as `(route_id, meta)` from
    /// root to leaf.
    pub fn evaluate<'a, I>(&self, session: &Session, location: &Location, chain: I) -> GuardOutcome
    where
        I: IntoIterator<Item = (&'a str, &'a PageMeta)>,
        I::IntoIter: Clone,
    {
        let chain = chain.into_iter();
        for guard in &self.guards {
            for (route_id, meta) in chain.clone() {
                let request = GuardRequest {
                    session,
                    location,
                    route_id,
                    meta,
                };
                let outcome = guard.check(&request);
                if !outcome.is_allowed() {
                    debug_log!(
                        "Guard '{}' on '{}' redirected '{}' to '{}'",
                        guard.name(),
                        route_id,
                        location.pathname,
                        outcome.redirect_path().unwrap_or_default()
                    );
                    return outcome;
                }
            }
        }
        GuardOutcome::Allowed
    }
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::from_config(&NavigatorConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
