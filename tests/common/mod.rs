//! Shared fixtures for the integration tests.
//!
//! Components are plain strings so the core can be exercised without a
//! window.

#![allow(dead_code)]

use console_navigator::*;

pub type Page = PageDescriptor<&'static str>;

/// Route test logs to the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn page(location: &str, component: &'static str) -> Page {
    PageDescriptor::new(location, component).sync()
}

/// A small managed-database console.
pub fn console_pages() -> Vec<Page> {
    vec![
        page("index", "Home").meta(PageMeta::public()),
        page("[1]dashboard", "Dashboard").meta(PageMeta::public().icon("gauge")),
        page("[2]cluster", "ClusterLayout").meta(PageMeta::new().icon("server")),
        page("[2]cluster/index", "ClusterList"),
        page("[2]cluster/_clusterId", "ClusterDetail"),
        page("[2]cluster/_clusterId/hosts", "ClusterHosts"),
        page("[3]settings/profile", "Profile"),
        page("[-1]login", "Login")
            .meta(PageMeta::public().redirect_rule(RedirectRule::return_to_origin("/"))),
    ]
}

pub fn console_router() -> Router<&'static str> {
    init_logging();
    Router::new(console_pages(), NavigatorConfig::default()).unwrap()
}

pub fn console_navigator() -> Navigator<&'static str> {
    Navigator::new(console_router())
}

pub fn alice() -> Session {
    Session::signed_in("token-1", "alice")
}

/// Ids of the direct children of the root, in sibling order.
pub fn top_level_ids<C>(tree: &RouteTree<C>) -> Vec<&str> {
    tree.root().children.iter().map(|n| n.id.as_str()).collect()
}

/// Mount a plan into a string like `Layout(Page)`, counting calls.
pub fn mount_to_string(plan: &RenderPlan<'_, &'static str>, calls: &mut usize) -> Option<String> {
    plan.mount(|_node, component, _params, child: Option<String>| {
        *calls += 1;
        match child {
            Some(child) => format!("{}({})", component, child),
            None => component.to_string(),
        }
    })
}
