//! Widgets that render the navigator's state.
//!
//! - [`RouterView`]: mounts the current page chain, layouts around their
//!   children, and loads lazy pages on GPUI's background executor.
//! - [`SideMenu`]: the collapsible navigation menu with the current page
//!   highlighted.
//! - [`DefaultPages`]: configurable not-found, loading and error pages.

use crate::context::{navigate, GlobalNavigator, PageBuilder, PageComponent, PageLoader};
use crate::error::NavigationResult;
use crate::menu::{menu_rows, menu_selection, MenuRow};
use crate::params::RouteParams;
use crate::router::Resolution;
use crate::{debug_log, trace_log, warn_log};
use gpui::*;
use std::collections::{HashMap, HashSet};

// ============================================================================
// RouterView
// ============================================================================

/// One level of the chain, leaf first.
enum Level {
    Ready(PageBuilder, RouteParams),
    Loading(String, PageLoader),
}

/// What the navigator says to show, detached from the global borrow.
enum Snapshot {
    Missing,
    NotFound(String),
    /// The current location no longer resolves to a render.
    Stale { navigation_id: usize },
    Render {
        levels: Vec<Level>,
        fallback: Option<SharedString>,
    },
}

/// What one render pass draws.
enum Frame {
    Unconfigured,
    NotFound(String),
    /// A refresh of the current location is queued.
    Refreshing,
    Blocked(String),
    Loading(Option<SharedString>),
    Page(Vec<Level>),
}

/// Renders the page chain for the current location.
///
/// Lazy pages show the loading page (or the page's fallback text) until
/// their loader finishes. Loads for pages that left the chain are dropped.
///
/// When the session changes under the current location the view asks the
/// navigator to refresh. If that refresh is blocked (a redirect loop or too
/// many hops) the error page stays up until the next navigation.
pub struct RouterView {
    pages: DefaultPages,
    loaded: HashMap<String, PageBuilder>,
    pending: HashMap<String, Task<()>>,
    /// Navigation id and reason of the last blocked refresh.
    blocked: Option<(usize, String)>,
    refresh_queued: bool,
}

impl RouterView {
    pub fn new() -> Self {
        Self::with_pages(DefaultPages::default())
    }

    pub fn with_pages(pages: DefaultPages) -> Self {
        Self {
            pages,
            loaded: HashMap::new(),
            pending: HashMap::new(),
            blocked: None,
            refresh_queued: false,
        }
    }

    /// `true` once the lazy page `id` has been loaded.
    pub fn is_loaded(&self, id: &str) -> bool {
        self.loaded.contains_key(id)
    }

    /// Loads started and not yet finished.
    pub fn pending_loads(&self) -> usize {
        self.pending
            .keys()
            .filter(|id| !self.loaded.contains_key(*id))
            .count()
    }

    /// Reason of the blocked refresh currently shown, if any.
    pub fn blocked_reason(&self) -> Option<&str> {
        self.blocked.as_ref().map(|(_, reason)| reason.as_str())
    }

    /// Start loading every lazy page of the current chain.
    pub fn preload(&mut self, cx: &mut Context<'_, Self>) {
        let Snapshot::Render { levels, .. } = self.snapshot(cx) else {
            return;
        };
        self.prepare(&levels, cx);
    }

    fn snapshot(&self, cx: &App) -> Snapshot {
        let Some(global) = cx.try_global::<GlobalNavigator>() else {
            return Snapshot::Missing;
        };

        match global.navigator().resolve_current(global.session()) {
            Resolution::NotFound => Snapshot::NotFound(global.current_path().to_string()),
            Resolution::Redirect(redirect) => {
                trace_log!("RouterView: stale location, redirect to '{}'", redirect.to);
                Snapshot::Stale {
                    navigation_id: global.navigator().navigation_id(),
                }
            }
            Resolution::Render(plan) => {
                let fallback = plan.fallback().cloned();
                let levels = plan
                    .mount(|node, component, params, child: Option<Vec<Level>>| {
                        let mut levels = child.unwrap_or_default();
                        levels.push(match component {
                            PageComponent::Eager(builder) => {
                                Level::Ready(builder.clone(), params.clone())
                            }
                            PageComponent::Lazy(loader) => match self.loaded.get(&node.id) {
                                Some(builder) => Level::Ready(builder.clone(), params.clone()),
                                None => Level::Loading(node.id.clone(), loader.clone()),
                            },
                        });
                        levels
                    })
                    .unwrap_or_default();
                Snapshot::Render { levels, fallback }
            }
        }
    }

    /// Decide what to draw, starting loads and refreshes as needed.
    fn frame(&mut self, cx: &mut Context<'_, Self>) -> Frame {
        match self.snapshot(cx) {
            Snapshot::Missing => Frame::Unconfigured,
            Snapshot::NotFound(path) => Frame::NotFound(path),
            Snapshot::Stale { navigation_id } => match &self.blocked {
                Some((id, reason)) if *id == navigation_id => Frame::Blocked(reason.clone()),
                _ => {
                    self.queue_refresh(cx);
                    Frame::Refreshing
                }
            },
            Snapshot::Render { levels, fallback } => {
                self.blocked = None;
                self.prepare(&levels, cx);
                if levels.iter().all(|level| matches!(level, Level::Ready(..))) {
                    Frame::Page(levels)
                } else {
                    Frame::Loading(fallback)
                }
            }
        }
    }

    /// Re-resolve the current location once the render pass is over.
    fn queue_refresh(&mut self, cx: &mut Context<'_, Self>) {
        if self.refresh_queued {
            return;
        }
        self.refresh_queued = true;

        let view = cx.entity().downgrade();
        cx.defer(move |cx| {
            let result = cx.update_global::<GlobalNavigator, _>(|navigator, _cx| navigator.refresh());
            let navigation_id = cx.global::<GlobalNavigator>().navigator().navigation_id();
            view.update(cx, |view, cx| {
                view.refresh_queued = false;
                view.blocked = match result {
                    NavigationResult::Blocked { path, reason } => {
                        warn_log!("Refresh of '{}' blocked: {}", path, reason);
                        Some((navigation_id, reason))
                    }
                    _ => None,
                };
                cx.notify();
            })
            .ok();
            cx.refresh_windows();
        });
    }

    /// Drop loads outside the chain and start the missing ones.
    fn prepare(&mut self, levels: &[Level], cx: &mut Context<'_, Self>) {
        let wanted: HashSet<&str> = levels
            .iter()
            .filter_map(|level| match level {
                Level::Loading(id, _) => Some(id.as_str()),
                Level::Ready(..) => None,
            })
            .collect();

        let loaded = &self.loaded;
        self.pending.retain(|id, _| {
            if loaded.contains_key(id) {
                return false;
            }
            let keep = wanted.contains(id.as_str());
            if !keep {
                warn_log!("Dropping load of page '{}'", id);
            }
            keep
        });

        for level in levels {
            if let Level::Loading(id, loader) = level {
                self.start_load(id, loader, cx);
            }
        }
    }

    fn start_load(&mut self, id: &str, loader: &PageLoader, cx: &mut Context<'_, Self>) {
        if self.pending.contains_key(id) {
            return;
        }
        debug_log!("Loading page '{}'", id);

        let key = id.to_string();
        let loader = loader.clone();
        let task = cx.spawn(async move |this, cx| {
            let builder = cx
                .background_executor()
                .spawn(async move { loader() })
                .await;
            this.update(cx, |view, cx| {
                debug_log!("Page '{}' loaded", key);
                view.loaded.insert(key, builder);
                cx.notify();
            })
            .ok();
        });
        self.pending.insert(id.to_string(), task);
    }

    /// Mount ready levels leaf first, each receiving its child.
    fn compose(levels: &[Level], window: &mut Window, cx: &mut App) -> AnyElement {
        let mut child = None;
        for level in levels {
            if let Level::Ready(builder, params) = level {
                child = Some(builder(window, cx, params, child));
            }
        }
        child.unwrap_or_else(|| div().into_any_element())
    }
}

impl Default for RouterView {
    fn default() -> Self {
        Self::new()
    }
}

impl Render for RouterView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        match self.frame(cx) {
            Frame::Unconfigured => div().child("No navigator configured").into_any_element(),
            Frame::NotFound(path) => self.pages.render_not_found(&path),
            Frame::Refreshing => self.pages.render_loading(None),
            Frame::Blocked(reason) => self.pages.render_error(&reason),
            Frame::Loading(fallback) => self.pages.render_loading(fallback.as_ref()),
            Frame::Page(levels) => Self::compose(&levels, window, cx),
        }
    }
}

// ============================================================================
// SideMenu
// ============================================================================

/// Text drawn after a group's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuMarkers {
    pub expanded: SharedString,
    pub collapsed: SharedString,
}

impl MenuMarkers {
    pub fn new(expanded: impl Into<SharedString>, collapsed: impl Into<SharedString>) -> Self {
        Self {
            expanded: expanded.into(),
            collapsed: collapsed.into(),
        }
    }

    pub fn marker(&self, is_expanded: bool) -> SharedString {
        if is_expanded {
            self.expanded.clone()
        } else {
            self.collapsed.clone()
        }
    }
}

impl Default for MenuMarkers {
    fn default() -> Self {
        Self::new("-", "+")
    }
}

/// The navigation menu.
///
/// Groups on the path to the current page are always expanded; other
/// groups open and close on click.
#[derive(Debug, Default)]
pub struct SideMenu {
    open: HashSet<String>,
    markers: MenuMarkers,
}

impl SideMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the expanded/collapsed group markers.
    pub fn with_markers(mut self, markers: MenuMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn markers(&self) -> &MenuMarkers {
        &self.markers
    }

    /// Open or close the group `id`.
    pub fn toggle(&mut self, id: &str) {
        if !self.open.remove(id) {
            self.open.insert(id.to_string());
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains(id)
    }

    /// Rows for the current location, or nothing without a navigator.
    pub fn rows(&self, cx: &App) -> Vec<MenuRow> {
        let Some(global) = cx.try_global::<GlobalNavigator>() else {
            return Vec::new();
        };
        let selection = menu_selection(global.navigator().router().tree(), global.current_path());
        menu_rows(global.menu(), &selection, &self.open)
    }

    #[allow(clippy::cast_precision_loss)]
    fn render_row(row: MenuRow, markers: &MenuMarkers, cx: &mut Context<'_, Self>) -> Div {
        let MenuRow {
            id,
            path,
            label,
            icon,
            depth,
            is_group,
            is_expanded,
            is_selected,
            is_navigable,
        } = row;

        let mut item = div()
            .flex()
            .flex_row()
            .gap_2()
            .py_1()
            .pl(px(12.0 + depth as f32 * 16.0))
            .cursor_pointer()
            .text_color(if is_selected {
                rgb(0x2196f3)
            } else {
                rgb(0x333333)
            })
            .hover(|this| this.text_color(rgb(0x2196f3)));

        if is_selected {
            item = item.font_weight(FontWeight::BOLD);
        }
        if let Some(icon) = icon {
            item = item.child(div().text_color(rgb(0x888888)).child(icon));
        }
        item = item.child(label);
        if is_group {
            item = item.child(markers.marker(is_expanded));
        }

        item.on_mouse_down(
            MouseButton::Left,
            cx.listener(move |menu, _event, _window, cx| {
                if is_group {
                    menu.toggle(&id);
                    cx.notify();
                } else if is_navigable {
                    navigate(cx, path.clone());
                }
            }),
        )
    }
}

impl Render for SideMenu {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        let rows = self.rows(cx);
        let markers = self.markers.clone();
        rows.into_iter().fold(
            div().flex().flex_col().gap_1().py_2().bg(rgb(0xfafafa)),
            |list, row| list.child(Self::render_row(row, &markers, cx)),
        )
    }
}

// ============================================================================
// Default Pages
// ============================================================================

/// Configurable not-found, loading and error pages.
///
/// ```ignore
/// DefaultPages::new()
///     .with_not_found(|path| gpui::div().child(format!("Nothing at {path}")).into_any_element())
///     .with_error(|reason| gpui::div().child(reason.to_string()).into_any_element())
/// ```
#[derive(Default)]
pub struct DefaultPages {
    pub not_found: Option<Box<dyn Fn(&str) -> AnyElement + Send + Sync>>,
    /// Receives the page's fallback text, if it sets one.
    pub loading: Option<Box<dyn Fn(Option<&str>) -> AnyElement + Send + Sync>>,
    /// Receives the reason a navigation was blocked.
    pub error: Option<Box<dyn Fn(&str) -> AnyElement + Send + Sync>>,
}

impl DefaultPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_not_found<F>(mut self, builder: F) -> Self
    where
        F: Fn(&str) -> AnyElement + Send + Sync + 'static,
    {
        self.not_found = Some(Box::new(builder));
        self
    }

    pub fn with_loading<F>(mut self, builder: F) -> Self
    where
        F: Fn(Option<&str>) -> AnyElement + Send + Sync + 'static,
    {
        self.loading = Some(Box::new(builder));
        self
    }

    pub fn with_error<F>(mut self, builder: F) -> Self
    where
        F: Fn(&str) -> AnyElement + Send + Sync + 'static,
    {
        self.error = Some(Box::new(builder));
        self
    }

    pub fn render_not_found(&self, path: &str) -> AnyElement {
        match &self.not_found {
            Some(builder) => builder(path),
            None => default_not_found_page(path).into_any_element(),
        }
    }

    pub fn render_loading(&self, fallback: Option<&SharedString>) -> AnyElement {
        let fallback = fallback.map(AsRef::<str>::as_ref);
        match &self.loading {
            Some(builder) => builder(fallback),
            None => default_loading_page(fallback).into_any_element(),
        }
    }

    pub fn render_error(&self, reason: &str) -> AnyElement {
        match &self.error {
            Some(builder) => builder(reason),
            None => default_error_page(reason).into_any_element(),
        }
    }
}

fn default_not_found_page(path: &str) -> impl IntoElement {
    div()
        .flex()
        .flex_col()
        .items_center()
        .justify_center()
        .size_full()
        .p_8()
        .gap_6()
        .child(
            div()
                .text_3xl()
                .font_weight(FontWeight::BOLD)
                .child("404"),
        )
        .child(
            div()
                .text_base()
                .text_color(rgb(0x888888))
                .child(format!("Nothing here: {}", path)),
        )
}

fn default_loading_page(fallback: Option<&str>) -> impl IntoElement {
    div()
        .flex()
        .items_center()
        .justify_center()
        .size_full()
        .child(
            div()
                .text_sm()
                .text_color(rgb(0x888888))
                .child(fallback.unwrap_or("Loading...").to_string()),
        )
}

fn default_error_page(reason: &str) -> impl IntoElement {
    div()
        .flex()
        .flex_col()
        .items_center()
        .justify_center()
        .size_full()
        .p_8()
        .gap_6()
        .child(
            div()
                .text_2xl()
                .font_weight(FontWeight::BOLD)
                .child("Navigation blocked"),
        )
        .child(
            div()
                .text_base()
                .text_color(rgb(0x888888))
                .text_center()
                .max_w(px(500.))
                .child(reason.to_string()),
        )
}
