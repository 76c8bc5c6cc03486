//! The router: page table in, per-navigation decision out.
//!
//! [`Router::resolve`] is a pure function of the route tree, the session and
//! the location. It matches the path, applies a static redirect if any page
//! in the matched chain has one, runs the navigation guards over the matched chain,
//! and finally hands back a [`RenderPlan`] that mounts the chain exactly once.
//!
//! ```
//! use console_navigator::{
//!     Location, NavigatorConfig, PageDescriptor, PageMeta, Resolution, Router, Session,
//! };
//!
//! let router = Router::new(
//!     vec![
//!         PageDescriptor::new("dashboard", "Dashboard").meta(PageMeta::public()),
//!         PageDescriptor::new("cluster", "ClusterList"),
//!     ],
//!     NavigatorConfig::default(),
//! )
//! .unwrap();
//!
//! match router.resolve(&Session::anonymous(), &Location::new("/cluster")) {
//!     Resolution::Redirect(redirect) => {
//!         assert_eq!(redirect.to, "/login");
//!         assert_eq!(redirect.state.unwrap().from, "/cluster");
//!     }
//!     other => panic!("expected a redirect, got {:?}", other),
//! }
//! ```

use crate::config::NavigatorConfig;
use crate::error::ConfigurationError;
use crate::guards::{GuardOutcome, NavigationGuard, RouteGuard};
use crate::menu::MenuNode;
use crate::page::PageDescriptor;
use crate::params::RouteParams;
use crate::session::{Location, Session, TransferState};
use crate::tree::{MatchStack, RouteNode, RouteTree};
use crate::{debug_log, warn_log};
use gpui::SharedString;
use std::fmt;

// ============================================================================
// Resolution
// ============================================================================

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// The page's static redirect.
    Static,
    /// No session for a page that needs one.
    RoleDenied,
    /// The page's redirect rule.
    Conditional,
}

/// A redirect instead of a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectResponse {
    pub to: String,
    /// Where the user was going. Absent for static redirects.
    pub state: Option<TransferState>,
    pub kind: RedirectKind,
}

impl RedirectResponse {
    /// The target as a location carrying the transfer state.
    pub fn location(&self) -> Location {
        let location = Location::new(&self.to);
        match &self.state {
            Some(state) => location.with_state(state.clone()),
            None => location,
        }
    }
}

/// The router's decision for one navigation.
pub enum Resolution<'a, C> {
    Redirect(RedirectResponse),
    Render(RenderPlan<'a, C>),
    NotFound,
}

impl<C> Resolution<'_, C> {
    pub fn is_render(&self) -> bool {
        matches!(self, Resolution::Render(_))
    }

    pub fn redirect(&self) -> Option<&RedirectResponse> {
        match self {
            Resolution::Redirect(redirect) => Some(redirect),
            _ => None,
        }
    }
}

impl<C> fmt::Debug for Resolution<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Redirect(redirect) => f.debug_tuple("Redirect").field(redirect).finish(),
            Resolution::Render(plan) => f.debug_tuple("Render").field(&plan.stack).finish(),
            Resolution::NotFound => f.write_str("NotFound"),
        }
    }
}

// ============================================================================
// RenderPlan
// ============================================================================

/// An allowed match chain, ready to mount.
pub struct RenderPlan<'a, C> {
    stack: MatchStack<'a, C>,
}

impl<'a, C> RenderPlan<'a, C> {
    pub fn stack(&self) -> &MatchStack<'a, C> {
        &self.stack
    }

    /// Parameters of the deepest level.
    pub fn params(&self) -> RouteParams {
        self.stack.params()
    }

    /// The deepest node that has a component.
    pub fn page(&self) -> Option<&'a RouteNode<C>> {
        self.stack
            .entries()
            .iter()
            .rev()
            .map(|e| e.node)
            .find(|n| n.component.is_some())
    }

    /// `true` if the page mounts behind a loading boundary.
    pub fn suspends(&self) -> bool {
        self.page().is_some_and(|n| !n.is_sync)
    }

    /// Loading text for the boundary, if the page sets one.
    pub fn fallback(&self) -> Option<&'a SharedString> {
        self.page().and_then(|n| n.meta.fallback.as_ref())
    }

    /// Compose the chain from leaf to root.
    ///
    /// `mount` is called once per level that has a component, innermost
    /// first, receiving the already-mounted child. Levels without a component
    /// pass their child through. Returns `None` if nothing in the chain has a
    /// component.
    pub fn mount<R, F>(&self, mut mount: F) -> Option<R>
    where
        F: FnMut(&'a RouteNode<C>, &'a C, &RouteParams, Option<R>) -> R,
    {
        self.stack
            .entries()
            .iter()
            .rev()
            .fold(None, |child, entry| match &entry.node.component {
                Some(component) => Some(mount(entry.node, component, &entry.params, child)),
                None => child,
            })
    }
}

// ============================================================================
// Router
// ============================================================================

/// Route tree, guards and configuration.
pub struct Router<C> {
    tree: RouteTree<C>,
    guard: NavigationGuard,
    config: NavigatorConfig,
}

impl<C> Router<C> {
    /// Build the route tree and the built-in guards.
    pub fn new<I>(pages: I, config: NavigatorConfig) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = PageDescriptor<C>>,
    {
        let tree = RouteTree::build(pages)?;
        Ok(Self {
            guard: NavigationGuard::from_config(&config),
            tree,
            config,
        })
    }

    /// Add a custom guard.
    pub fn with_guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guard.push(Box::new(guard));
        self
    }

    pub fn tree(&self) -> &RouteTree<C> {
        &self.tree
    }

    pub fn menu(&self) -> &[MenuNode] {
        self.tree.menu()
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Match a concrete path.
    pub fn match_path(&self, path: &str) -> Option<MatchStack<'_, C>> {
        self.tree.match_path(path)
    }

    /// Decide what to do with a navigation to `location`.
    pub fn resolve(&self, session: &Session, location: &Location) -> Resolution<'_, C> {
        match self.tree.match_path(&location.pathname) {
            Some(stack) => self.resolve_stack(stack, session, location),
            None => {
                warn_log!("No route matches '{}'", location.pathname);
                Resolution::NotFound
            }
        }
    }

    /// Decide what to do with an already matched chain.
    pub fn resolve_stack<'a>(
        &'a self,
        stack: MatchStack<'a, C>,
        session: &Session,
        location: &Location,
    ) -> Resolution<'a, C> {
        // Outermost static redirect wins; children behind it never render.
        if let Some(to) = stack.entries().iter().find_map(|e| e.node.redirect_target()) {
            debug_log!("Static redirect '{}' -> '{}'", location.pathname, to);
            return Resolution::Redirect(RedirectResponse {
                to: to.to_string(),
                state: None,
                kind: RedirectKind::Static,
            });
        }

        let chain = stack
            .entries()
            .iter()
            .map(|e| (e.node.id.as_str(), &e.node.meta));
        let (to, kind) = match self.guard.evaluate(session, location, chain) {
            GuardOutcome::Allowed => return Resolution::Render(RenderPlan { stack }),
            GuardOutcome::RoleDenied { to } => (to, RedirectKind::RoleDenied),
            GuardOutcome::ConditionalRedirect { to } => (to, RedirectKind::Conditional),
        };

        Resolution::Redirect(RedirectResponse {
            to,
            state: Some(TransferState::new(location.href())),
            kind,
        })
    }
}

impl<C> fmt::Debug for Router<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.tree.len())
            .field("guards", &self.guard.len())
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
