//! GPUI integration.
//!
//! - [`PageComponent`]: what a page renders with. Eager pages carry their
//!   builder; lazy pages carry a loader that produces the builder on GPUI's
//!   background executor the first time the page is shown.
//! - [`GlobalNavigator`]: the [`Navigator`] and the current [`Session`],
//!   stored as a GPUI `Global`.
//! - Free functions ([`navigate`], [`set_session`], [`sign_out`], ...) that
//!   update the global and refresh windows.
//!
//! # Initialization
//!
//! ```ignore
//! use console_navigator::{init_navigator, lazy_page, page, NavigatorConfig, PageMeta, Router, Session};
//!
//! let router = Router::new(
//!     vec![
//!         page("[1]dashboard", |_, _, _, _| gpui::div().child("Dashboard").into_any_element())
//!             .meta(PageMeta::public()),
//!         lazy_page("[2]cluster", || |_, _, _, _| gpui::div().child("Clusters").into_any_element()),
//!     ],
//!     NavigatorConfig::default(),
//! )?;
//! init_navigator(cx, router, Session::anonymous());
//! ```

use crate::error::NavigationResult;
use crate::menu::MenuNode;
use crate::navigator::Navigator;
use crate::page::PageDescriptor;
use crate::router::Router;
use crate::session::{Location, Session};
use crate::{info_log, RouteParams};
use gpui::{AnyElement, App, BorrowAppContext, Global, Window};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// PageComponent
// ============================================================================

/// Builds a page element. The last argument is the already-mounted child
/// page when this page is a layout around deeper routes.
pub type PageBuilder = Arc<
    dyn Fn(&mut Window, &mut App, &RouteParams, Option<AnyElement>) -> AnyElement + Send + Sync,
>;

/// Produces a [`PageBuilder`]; runs off the UI thread.
pub type PageLoader = Arc<dyn Fn() -> PageBuilder + Send + Sync>;

/// The renderable unit of a GPUI page.
#[derive(Clone)]
pub enum PageComponent {
    Eager(PageBuilder),
    Lazy(PageLoader),
}

impl PageComponent {
    pub fn eager<F>(builder: F) -> Self
    where
        F: Fn(&mut Window, &mut App, &RouteParams, Option<AnyElement>) -> AnyElement
            + Send
            + Sync
            + 'static,
    {
        Self::Eager(Arc::new(builder))
    }

    pub fn lazy<L, F>(load: L) -> Self
    where
        L: Fn() -> F + Send + Sync + 'static,
        F: Fn(&mut Window, &mut App, &RouteParams, Option<AnyElement>) -> AnyElement
            + Send
            + Sync
            + 'static,
    {
        Self::Lazy(Arc::new(move || -> PageBuilder { Arc::new(load()) }))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, PageComponent::Lazy(_))
    }
}

impl fmt::Debug for PageComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageComponent::Eager(_) => f.write_str("PageComponent::Eager"),
            PageComponent::Lazy(_) => f.write_str("PageComponent::Lazy"),
        }
    }
}

/// An eagerly mounted page.
pub fn page<F>(location: impl Into<String>, builder: F) -> PageDescriptor<PageComponent>
where
    F: Fn(&mut Window, &mut App, &RouteParams, Option<AnyElement>) -> AnyElement
        + Send
        + Sync
        + 'static,
{
    PageDescriptor::new(location, PageComponent::eager(builder)).sync()
}

/// A page loaded on first visit, behind a loading boundary.
pub fn lazy_page<L, F>(location: impl Into<String>, load: L) -> PageDescriptor<PageComponent>
where
    L: Fn() -> F + Send + Sync + 'static,
    F: Fn(&mut Window, &mut App, &RouteParams, Option<AnyElement>) -> AnyElement
        + Send
        + Sync
        + 'static,
{
    PageDescriptor::new(location, PageComponent::lazy(load))
}

// ============================================================================
// GlobalNavigator
// ============================================================================

/// Navigator and session, shared through GPUI's global state.
pub struct GlobalNavigator {
    navigator: Navigator<PageComponent>,
    session: Session,
}

impl Global for GlobalNavigator {}

impl GlobalNavigator {
    pub fn new(router: Router<PageComponent>, session: Session) -> Self {
        Self {
            navigator: Navigator::new(router),
            session,
        }
    }

    pub fn navigator(&self) -> &Navigator<PageComponent> {
        &self.navigator
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn menu(&self) -> &[MenuNode] {
        self.navigator.router().menu()
    }

    pub fn current_path(&self) -> &str {
        self.navigator.current_path()
    }

    pub fn push(&mut self, to: impl Into<Location>) -> NavigationResult {
        self.navigator.navigate(&self.session, to)
    }

    pub fn replace(&mut self, to: impl Into<Location>) -> NavigationResult {
        self.navigator.replace(&self.session, to)
    }

    pub fn back(&mut self) -> Option<NavigationResult> {
        self.navigator.back(&self.session)
    }

    pub fn forward(&mut self) -> Option<NavigationResult> {
        self.navigator.forward(&self.session)
    }

    /// Re-resolve the current location against the current session.
    pub fn refresh(&mut self) -> NavigationResult {
        self.navigator.refresh(&self.session)
    }

    /// Swap the session and re-resolve the current location.
    pub fn set_session(&mut self, session: Session) -> NavigationResult {
        self.session = session;
        self.refresh()
    }

    /// Clear the session, as on logout or an HTTP 401.
    pub fn sign_out(&mut self) -> NavigationResult {
        self.session.sign_out();
        self.refresh()
    }
}

impl fmt::Debug for GlobalNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalNavigator")
            .field("navigator", &self.navigator)
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}

// ============================================================================
// UseNavigator trait
// ============================================================================

/// Trait for accessing the global navigator from context.
pub trait UseNavigator {
    fn navigator(&self) -> &GlobalNavigator;

    fn update_navigator<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut GlobalNavigator, &mut App) -> R;
}

impl UseNavigator for App {
    fn navigator(&self) -> &GlobalNavigator {
        self.global::<GlobalNavigator>()
    }

    fn update_navigator<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut GlobalNavigator, &mut App) -> R,
    {
        self.update_global(f)
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Install the navigator and settle the first page.
pub fn init_navigator(
    cx: &mut App,
    router: Router<PageComponent>,
    session: Session,
) -> NavigationResult {
    info_log!("Installing navigator with {} routes", router.tree().len());
    let mut global = GlobalNavigator::new(router, session);
    let result = global.refresh();
    cx.set_global(global);
    result
}

fn update_and_refresh<R>(cx: &mut App, f: impl FnOnce(&mut GlobalNavigator) -> R) -> R {
    let result = cx.update_global::<GlobalNavigator, _>(|navigator, _cx| f(navigator));
    cx.refresh_windows();
    result
}

/// Navigate to `to` and refresh all windows.
pub fn navigate(cx: &mut App, to: impl Into<Location>) -> NavigationResult {
    let to = to.into();
    update_and_refresh(cx, |navigator| navigator.push(to))
}

/// Go back one entry and refresh all windows.
pub fn back(cx: &mut App) -> Option<NavigationResult> {
    update_and_refresh(cx, GlobalNavigator::back)
}

/// Go forward one entry and refresh all windows.
pub fn forward(cx: &mut App) -> Option<NavigationResult> {
    update_and_refresh(cx, GlobalNavigator::forward)
}

/// Replace the session (login, token refresh) and re-resolve.
pub fn set_session(cx: &mut App, session: Session) -> NavigationResult {
    update_and_refresh(cx, |navigator| navigator.set_session(session))
}

/// Clear the session and re-resolve.
pub fn sign_out(cx: &mut App) -> NavigationResult {
    update_and_refresh(cx, GlobalNavigator::sign_out)
}

/// Return the current path from the global navigator.
pub fn current_path(cx: &App) -> String {
    cx.navigator().current_path().to_string()
}

// ============================================================================
// Tests
// ============================================================================
