//! Guard decisions and mounting through the router and navigator.

mod common;

use common::*;
use common::page;
use console_navigator::*;
use rstest::rstest;

fn render_plan<'a>(resolution: Resolution<'a, &'static str>) -> RenderPlan<'a, &'static str> {
    match resolution {
        Resolution::Render(plan) => plan,
        other => panic!("expected a render, got {:?}", other),
    }
}

#[rstest]
#[case(None)]
#[case(Some("/elsewhere"))]
fn session_required_before_any_redirect_rule(#[case] rule_target: Option<&'static str>) {
    init_logging();
    let meta = match rule_target {
        Some(to) => PageMeta::new().redirect_rule(RedirectRule::new(move |_, _| Some(to.into()))),
        None => PageMeta::new(),
    };
    let router = Router::new(
        vec![page("cluster", "Cluster").meta(meta), page("[-1]login", "Login")],
        NavigatorConfig::default(),
    )
    .unwrap();

    let resolution = router.resolve(&Session::anonymous(), &Location::new("/cluster"));
    let redirect = resolution.redirect().unwrap();
    assert_eq!(redirect.to, "/login");
    assert_eq!(redirect.kind, RedirectKind::RoleDenied);
    assert_eq!(redirect.state, Some(TransferState::new("/cluster")));
}

#[test]
fn parent_session_requirement_covers_public_child() {
    let router = Router::new(
        vec![
            page("cluster", "Layout"),
            page("cluster/status", "Status").meta(PageMeta::public()),
        ],
        NavigatorConfig::default(),
    )
    .unwrap();

    let resolution = router.resolve(&Session::anonymous(), &Location::new("/cluster/status"));
    assert_eq!(resolution.redirect().unwrap().to, "/login");
}

#[test]
fn conditional_redirect_never_mounts() {
    let router = Router::new(
        vec![page("cluster", "Cluster")
            .meta(PageMeta::new().redirect_rule(RedirectRule::new(|_, _| Some("/x".into()))))],
        NavigatorConfig::default(),
    )
    .unwrap();

    let resolution = router.resolve(&alice(), &Location::new("/cluster"));
    let redirect = resolution.redirect().unwrap();
    assert_eq!(redirect.to, "/x");
    assert_eq!(redirect.kind, RedirectKind::Conditional);
    assert_eq!(redirect.state.as_ref().unwrap().from, "/cluster");
}

#[rstest]
#[case(None)]
#[case(Some(""))]
fn falsy_rule_mounts_exactly_once(#[case] target: Option<&'static str>) {
    let router = Router::new(
        vec![page("cluster", "Cluster")
            .meta(PageMeta::new().redirect_rule(RedirectRule::new(move |_, _| target.map(String::from))))],
        NavigatorConfig::default(),
    )
    .unwrap();

    let plan = render_plan(router.resolve(&alice(), &Location::new("/cluster")));
    let mut calls = 0;
    assert_eq!(mount_to_string(&plan, &mut calls).as_deref(), Some("Cluster"));
    assert_eq!(calls, 1);
}

#[test]
fn layouts_wrap_nested_pages() {
    let router = console_router();
    let plan = render_plan(router.resolve(&alice(), &Location::new("/cluster/7/hosts")));

    let mut calls = 0;
    let mounted = mount_to_string(&plan, &mut calls);
    assert_eq!(
        mounted.as_deref(),
        Some("ClusterLayout(ClusterDetail(ClusterHosts))")
    );
    assert_eq!(calls, 3);
    assert_eq!(plan.params().get("clusterId"), Some(&"7".to_string()));
}

#[test]
fn directory_lands_on_index_page() {
    let router = console_router();
    let plan = render_plan(router.resolve(&alice(), &Location::new("/cluster")));

    let mut calls = 0;
    assert_eq!(
        mount_to_string(&plan, &mut calls).as_deref(),
        Some("ClusterLayout(ClusterList)")
    );
}

#[test]
fn login_round_trip() {
    let mut navigator = console_navigator();
    let mut session = Session::anonymous();

    let result = navigator.navigate(&session, "/cluster");
    assert_eq!(result.path(), "/login");
    assert_eq!(result.redirects(), 1);
    assert_eq!(navigator.current().origin(), Some("/cluster"));

    session = alice();
    let result = navigator.refresh(&session);
    assert_eq!(
        result,
        NavigationResult::Rendered {
            path: "/cluster".to_string(),
            redirects: 1,
        }
    );

    let plan = render_plan(navigator.resolve_current(&session));
    let mut calls = 0;
    assert_eq!(
        mount_to_string(&plan, &mut calls).as_deref(),
        Some("ClusterLayout(ClusterList)")
    );
    assert_eq!(calls, 2);
}

#[test]
fn signed_in_user_skips_login() {
    let mut navigator = console_navigator();
    let result = navigator.navigate(&alice(), "/login");
    assert_eq!(result.path(), "/");
    assert!(result.is_rendered());
}

#[rstest]
#[case("/cluster")]
#[case("/cluster/detail")]
fn static_redirect_on_directory_covers_children(#[case] path: &str) {
    let router = Router::new(
        vec![
            page("dashboard", "Dashboard").meta(PageMeta::public()),
            page("cluster", "ClusterLayout").meta(PageMeta::public().redirect_to("/dashboard")),
            page("cluster/index", "ClusterList").meta(PageMeta::public()),
            page("cluster/detail", "ClusterDetail").meta(PageMeta::public()),
        ],
        NavigatorConfig::default(),
    )
    .unwrap();

    let resolution = router.resolve(&Session::anonymous(), &Location::new(path));
    let redirect = resolution.redirect().unwrap();
    assert_eq!(redirect.to, "/dashboard");
    assert_eq!(redirect.kind, RedirectKind::Static);

    let mut navigator = Navigator::new(router);
    let result = navigator.navigate(&Session::anonymous(), path);
    assert_eq!(
        result,
        NavigationResult::Rendered {
            path: "/dashboard".to_string(),
            redirects: 1,
        }
    );
}

#[test]
fn redirect_loop_is_blocked() {
    let router = Router::new(
        vec![
            page("a", "A").meta(PageMeta::public().redirect_to("/b")),
            page("b", "B").meta(PageMeta::public().redirect_to("/a")),
        ],
        NavigatorConfig::default(),
    )
    .unwrap();
    let mut navigator = Navigator::new(router);

    let result = navigator.navigate(&Session::anonymous(), "/a");
    assert!(result.is_blocked());
    assert_eq!(navigator.current_path(), "/");
    assert!(!navigator.can_go_back());
}

#[test]
fn unknown_path_is_not_found_but_recorded() {
    let mut navigator = console_navigator();
    let result = navigator.navigate(&alice(), "/nowhere");
    assert!(result.is_not_found());
    assert_eq!(navigator.current_path(), "/nowhere");
    assert!(navigator.can_go_back());
}

#[test]
fn custom_guard_runs_by_priority() {
    let router = console_router().with_guard(
        guard_fn(|request| {
            if request.route_id == "settings.profile" && request.session.password_expired {
                GuardOutcome::ConditionalRedirect {
                    to: "/dashboard".into(),
                }
            } else {
                GuardOutcome::Allowed
            }
        }),
    );

    let mut session = alice();
    session.password_expired = true;
    let resolution = router.resolve(&session, &Location::new("/settings/profile"));
    assert_eq!(resolution.redirect().unwrap().to, "/dashboard");

    let resolution = router.resolve(&Session::anonymous(), &Location::new("/settings/profile"));
    assert_eq!(resolution.redirect().unwrap().to, "/login");
}
