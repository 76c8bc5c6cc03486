//! Side menu selection and row flattening against the console fixture.

mod common;

use common::*;
use common::page;
use console_navigator::*;
use rstest::rstest;
use std::collections::HashSet;

#[rstest]
#[case("/", None)]
#[case("/dashboard", Some("dashboard"))]
#[case("/cluster", Some("cluster"))]
#[case("/cluster/7", Some("cluster._clusterId"))]
#[case("/cluster/7/hosts", Some("cluster._clusterId.hosts"))]
#[case("/settings/profile", Some("settings.profile"))]
#[case("/login", None)]
fn selection_follows_path(#[case] path: &str, #[case] selected: Option<&str>) {
    let router = console_router();
    let selection = menu_selection(router.tree(), path);
    assert_eq!(selection.selected.as_deref(), selected);
}

#[test]
fn rows_expand_along_current_path() {
    let router = console_router();
    let selection = menu_selection(router.tree(), "/cluster/7/hosts");
    assert_eq!(selection.expanded, vec!["cluster", "cluster._clusterId"]);

    let rows = menu_rows(router.menu(), &selection, &HashSet::new());
    let outline: Vec<(&str, usize)> = rows.iter().map(|r| (r.id.as_str(), r.depth)).collect();
    assert_eq!(
        outline,
        vec![
            ("dashboard", 0),
            ("cluster", 0),
            ("cluster._clusterId", 1),
            ("cluster._clusterId.hosts", 2),
            ("settings", 0),
        ]
    );

    let hosts = &rows[3];
    assert!(hosts.is_selected);
    assert!(!hosts.is_navigable);
    assert!(rows[1].is_expanded);
    assert!(!rows[4].is_expanded);
}

#[test]
fn opened_group_lists_children() {
    let router = console_router();
    let selection = menu_selection(router.tree(), "/dashboard");
    let open: HashSet<String> = ["settings".to_string()].into_iter().collect();

    let rows = menu_rows(router.menu(), &selection, &open);
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["dashboard", "cluster", "settings", "settings.profile"]);
    assert!(rows[0].is_selected);
    assert_eq!(rows[0].icon.as_deref(), Some("gauge"));
}

#[rstest]
#[case("/new/step", Some("new.step"), vec!["new"])]
#[case("/new", Some("new"), vec!["new"])]
#[case("/c-1", Some("_clusterId"), vec![])]
#[case("/c-1/step", None, vec![])]
fn selection_agrees_with_router(
    #[case] path: &str,
    #[case] selected: Option<&str>,
    #[case] expanded: Vec<&str>,
) {
    let router = Router::new(
        vec![
            page("[1]_clusterId", "ClusterDetail"),
            page("[2]new", "NewCluster"),
            page("[2]new/step", "NewClusterStep"),
        ],
        NavigatorConfig::default(),
    )
    .unwrap();

    let selection = menu_selection(router.tree(), path);
    assert_eq!(selection.selected.as_deref(), selected);
    assert_eq!(selection.expanded, expanded);
    assert_eq!(router.match_path(path).is_some(), selected.is_some());
}
