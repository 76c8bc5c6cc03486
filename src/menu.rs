//! Side menu model.
//!
//! The menu tree is assembled together with the route tree (see
//! [`RouteTree::menu`](crate::RouteTree::menu)). This module computes which
//! entry is highlighted for the current path and flattens the tree into rows
//! a renderer can draw.
//!
//! Highlighting re-runs the router's matcher, so an entry lights up exactly
//! when the router descends through it.
//!
//! ```
//! use console_navigator::{menu_selection, PageDescriptor, RouteTree};
//!
//! let tree = RouteTree::build(vec![
//!     PageDescriptor::new("dashboard", "Dashboard"),
//!     PageDescriptor::new("cluster", "ClusterLayout"),
//!     PageDescriptor::new("cluster/backups", "Backups"),
//! ])
//! .unwrap();
//!
//! let selection = menu_selection(&tree, "/cluster/backups");
//! assert_eq!(selection.selected.as_deref(), Some("cluster.backups"));
//! assert!(selection.is_expanded("cluster"));
//! ```

use crate::matching::{param_name, split_path};
use crate::tree::RouteTree;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// MenuNode
// ============================================================================

/// One side menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    /// Route id, also the i18n namespace of the label.
    pub id: String,
    /// Route pattern.
    pub path: String,
    /// Label used when no translation exists.
    pub default_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn leaf(id: impl Into<String>, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            default_name: name.into(),
            icon: None,
            children: Vec::new(),
        }
    }

    pub fn group(
        id: impl Into<String>,
        path: impl Into<String>,
        name: impl Into<String>,
        children: Vec<MenuNode>,
    ) -> Self {
        Self {
            children,
            ..Self::leaf(id, path, name)
        }
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// `false` for patterns with dynamic segments, which need concrete
    /// values before they can be visited.
    pub fn is_navigable(&self) -> bool {
        split_path(&self.path).iter().all(|s| param_name(s).is_none())
    }

    /// Ids of this entry and all descendants, pre-order.
    pub fn ids(&self) -> Vec<&str> {
        let mut out = vec![self.id.as_str()];
        for child in &self.children {
            out.extend(child.ids());
        }
        out
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Highlight state for the current path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSelection {
    /// Deepest entry on the current path.
    pub selected: Option<String>,
    /// Groups along the current path.
    pub expanded: Vec<String>,
}

impl MenuSelection {
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.iter().any(|e| e == id)
    }
}

/// Compute which entry is highlighted for `current_path`.
///
/// The path is matched against the route tree; the deepest matched route that
/// has a menu entry is selected and every menu group on the way is expanded.
/// Routes left out of the menu (index pages, hidden pages) are skipped.
pub fn menu_selection<C>(tree: &RouteTree<C>, current_path: &str) -> MenuSelection {
    let mut selection = MenuSelection::default();
    let Some(stack) = tree.match_path(current_path) else {
        return selection;
    };

    let mut level = tree.menu();
    for entry in stack.entries().iter().skip(1) {
        let Some(node) = level.iter().find(|m| m.id == entry.node.id) else {
            continue;
        };
        selection.selected = Some(node.id.clone());
        if node.is_group() {
            selection.expanded.push(node.id.clone());
        }
        level = &node.children;
    }

    selection
}

// ============================================================================
// Rows
// ============================================================================

/// One rendered line of the side menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRow {
    pub id: String,
    pub path: String,
    pub label: String,
    pub icon: Option<String>,
    /// Nesting level, `0` at the top.
    pub depth: usize,
    pub is_group: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
    pub is_navigable: bool,
}

/// Flatten the menu into rows, pre-order.
///
/// A group's children are listed when the group lies on the current path or
/// the user opened it.
pub fn menu_rows(menu: &[MenuNode], selection: &MenuSelection, open: &HashSet<String>) -> Vec<MenuRow> {
    fn push_rows(
        nodes: &[MenuNode],
        depth: usize,
        selection: &MenuSelection,
        open: &HashSet<String>,
        rows: &mut Vec<MenuRow>,
    ) {
        for node in nodes {
            let is_expanded =
                node.is_group() && (selection.is_expanded(&node.id) || open.contains(&node.id));
            rows.push(MenuRow {
                id: node.id.clone(),
                path: node.path.clone(),
                label: node.default_name.clone(),
                icon: node.icon.clone(),
                depth,
                is_group: node.is_group(),
                is_expanded,
                is_selected: selection.is_selected(&node.id),
                is_navigable: node.is_navigable(),
            });
            if is_expanded {
                push_rows(&node.children, depth + 1, selection, open, rows);
            }
        }
    }

    let mut rows = Vec::new();
    push_rows(menu, 0, selection, open, &mut rows);
    rows
}

// ============================================================================
// Tests
// ============================================================================
