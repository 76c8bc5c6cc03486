//! The navigator installed as a GPUI global.

use console_navigator::*;
use gpui::{div, AnyElement, App, AppContext, IntoElement, ParentElement, TestAppContext, Window};

fn text(label: &'static str) -> impl Fn(&mut Window, &mut App, &RouteParams, Option<AnyElement>) -> AnyElement {
    move |_, _, _, child| match child {
        Some(child) => div().child(label).child(child).into_any_element(),
        None => div().child(label).into_any_element(),
    }
}

fn install(cx: &mut App) -> NavigationResult {
    let router = Router::new(
        vec![
            page("index", text("Home")).meta(PageMeta::public()),
            page("[1]dashboard", text("Dashboard")).meta(PageMeta::public()),
            lazy_page("[2]cluster", || text("Clusters")).meta(PageMeta::new().fallback("Loading clusters")),
            page("[2]cluster/_clusterId", text("Cluster")),
            page("[-1]login", text("Login"))
                .meta(PageMeta::public().redirect_rule(RedirectRule::return_to_origin("/"))),
        ],
        NavigatorConfig::default(),
    )
    .unwrap();
    init_navigator(cx, router, Session::anonymous())
}

#[gpui::test]
fn login_flow_through_global(cx: &mut TestAppContext) {
    cx.update(install);

    let result = cx.update(|cx| navigate(cx, "/cluster/7"));
    assert_eq!(result.path(), "/login");
    cx.read(|cx| {
        assert_eq!(cx.navigator().navigator().current().origin(), Some("/cluster/7"));
        assert!(!cx.navigator().session().is_authenticated());
    });

    let result = cx.update(|cx| set_session(cx, Session::signed_in("token-1", "alice")));
    assert!(result.is_rendered());
    assert_eq!(cx.read(current_path), "/cluster/7");

    cx.update(|cx| back(cx));
    assert_eq!(cx.read(current_path), "/");
}

#[gpui::test]
fn session_survives_storage(cx: &mut TestAppContext) {
    cx.update(install);
    let stored = Session::signed_in("token-1", "alice").to_storage_json().unwrap();

    let restored = Session::from_storage_json(&stored).unwrap();
    cx.update(|cx| set_session(cx, restored));
    cx.update(|cx| navigate(cx, "/login"));

    assert_eq!(cx.read(current_path), "/");
    cx.read(|cx| assert_eq!(cx.navigator().session().session, "alice"));
}

#[gpui::test]
fn router_view_loads_lazy_page(cx: &mut TestAppContext) {
    cx.update(install);
    cx.update(|cx| set_session(cx, Session::signed_in("token-1", "alice")));
    cx.update(|cx| navigate(cx, "/cluster/7"));

    let view = cx.new(|_| RouterView::new());
    view.update(cx, |view, cx| view.preload(cx));
    cx.run_until_parked();

    assert!(view.read_with(cx, |view, _| view.is_loaded("cluster")));
    assert_eq!(view.read_with(cx, |view, _| view.pending_loads()), 0);
}
