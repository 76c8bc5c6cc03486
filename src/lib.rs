//! # console-navigator
//!
//! Route and menu tree builder with role-based navigation guards for
//! [GPUI](https://gpui.rs) admin consoles.
//!
//! Pages are declared as a flat list of location strings such as
//! `"[2]cluster/_clusterId/hosts"`. From that list the crate builds:
//!
//! - a [`RouteTree`] where every directory becomes a layout route and
//!   `_param` segments become `:param` path parameters,
//! - a side-menu tree of [`MenuNode`]s ordered by the `[n]` prefixes,
//! - a [`Router`] that matches a location, applies static redirects and runs
//!   the [`NavigationGuard`] before anything is mounted.
//!
//! The core ([`RouteTree`], [`Router`], [`Navigator`]) is generic over the
//! page component type, so it can be driven without a window. The GPUI layer
//! ([`init_navigator`], [`RouterView`], [`SideMenu`]) uses
//! [`PageComponent`].
//!
//! ## Quick start
//!
//! ```ignore
//! use console_navigator::*;
//! use gpui::*;
//!
//! let router = Router::new(
//!     vec![
//!         page("[1]dashboard", |_, _, _, _| div().child("Dashboard").into_any_element())
//!             .meta(PageMeta::public().icon("gauge")),
//!         lazy_page("[2]cluster", || |_, _, _, _| div().child("Clusters").into_any_element())
//!             .meta(PageMeta::new().fallback("Loading clusters")),
//!         page("[-1]login", |_, _, _, _| div().child("Sign in").into_any_element())
//!             .meta(PageMeta::public().redirect_rule(RedirectRule::return_to_origin("/"))),
//!     ],
//!     NavigatorConfig::default(),
//! )?;
//!
//! init_navigator(cx, router, Session::anonymous());
//! cx.new(|_| RouterView::new());
//! ```
//!
//! ## Features
//!
//! | Feature   | Default | Effect                                   |
//! |-----------|---------|------------------------------------------|
//! | `log`     | yes     | log through the `log` crate              |
//! | `tracing` | no      | log through the `tracing` crate          |
//! | `cache`   | yes     | LRU cache of path -> matched chain       |

#[macro_use]
mod logging;

#[cfg(feature = "cache")]
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod guards;
pub mod location;
pub mod matching;
pub mod menu;
pub mod meta;
pub mod navigator;
pub mod page;
pub mod params;
pub mod router;
pub mod session;
pub mod state;
pub mod tree;
pub mod widgets;

pub use config::{NavigatorConfig, DEFAULT_CACHE_CAPACITY, MAX_REDIRECT_DEPTH};
pub use context::{
    back, current_path, forward, init_navigator, lazy_page, navigate, page, set_session,
    sign_out, GlobalNavigator, PageBuilder, PageComponent, PageLoader, UseNavigator,
};
pub use error::{ConfigurationError, NavigationResult};
pub use guards::{
    guard_fn, FnGuard, GuardOutcome, GuardRequest, NavigationGuard, RedirectRuleGuard,
    RouteGuard, SessionGuard,
};
pub use location::{resolve_location, ResolvedLocation, Segment, SortKey, INDEX_SEGMENT};
pub use matching::{match_pattern, normalize_path, split_path, PatternMatch};
pub use menu::{menu_rows, menu_selection, MenuNode, MenuRow, MenuSelection};
pub use meta::{PageMeta, Redirect, RedirectRule, Roles, PUBLIC_ROLE, SESSION_ROLE};
pub use navigator::Navigator;
pub use page::PageDescriptor;
pub use params::RouteParams;
pub use router::{RedirectKind, RedirectResponse, RenderPlan, Resolution, Router};
pub use session::{Location, Session, TransferState};
pub use state::RouterState;
pub use tree::{MatchEntry, MatchStack, RouteAction, RouteNode, RouteTree};
pub use widgets::{DefaultPages, MenuMarkers, RouterView, SideMenu};
