//! Route and menu tree assembly.
//!
//! [`RouteTree::build`] turns a flat page table into two immutable trees:
//!
//! - the **route tree**, one [`RouteNode`] per location segment, with
//!   canonical patterns, access metadata and sibling order;
//! - the **menu tree**, the subset of routes a side menu shows.
//!
//! Directories that only appear as ancestors of other pages become implied
//! nodes: they have no component of their own and are public, so they never
//! hide a public child behind a session check.
//!
//! # Example
//!
//! ```
//! use console_navigator::{PageDescriptor, PageMeta, RouteTree};
//!
//! let tree = RouteTree::build(vec![
//!     PageDescriptor::new("[1]dashboard", ()).meta(PageMeta::public()),
//!     PageDescriptor::new("[2]cluster", ()),
//!     PageDescriptor::new("cluster/_clusterId", ()),
//!     PageDescriptor::new("[-1]login", ()).meta(PageMeta::public()),
//! ])
//! .unwrap();
//!
//! let stack = tree.match_path("/cluster/42").unwrap();
//! assert_eq!(stack.leaf().unwrap().node.id, "cluster._clusterId");
//! assert_eq!(stack.params().get("clusterId"), Some(&"42".to_string()));
//!
//! let menu: Vec<&str> = tree.menu().iter().map(|m| m.id.as_str()).collect();
//! assert_eq!(menu, vec!["dashboard", "cluster"]);
//! ```

use crate::error::ConfigurationError;
use crate::location::{resolve_location, Segment, SortKey};
use crate::matching::{join_path, match_segment, split_path};
use crate::menu::MenuNode;
use crate::meta::{PageMeta, Redirect, RedirectRule};
use crate::page::PageDescriptor;
use crate::params::RouteParams;
use crate::{info_log, trace_log};
use std::fmt;

// ============================================================================
// RouteNode
// ============================================================================

/// What the router does when a node is the end of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Mount the chain's components.
    Render,
    /// Send the visitor to `to` without rendering.
    Redirect { to: String },
}

/// One node of the route tree.
pub struct RouteNode<C> {
    /// Dotted identifier, `""` for the root.
    pub id: String,
    /// Canonical pattern such as `/cluster/:clusterId/hosts`.
    pub path: String,
    /// This node's own pattern segment: `cluster`, `:clusterId`, or `""`.
    pub segment: String,
    /// Segment name without prefix or dynamic marker.
    pub name: String,
    /// Must consume the whole remaining path to match.
    pub exact: bool,
    /// The index page of its parent directory.
    pub index: bool,
    pub meta: PageMeta,
    /// `None` for the root and implied directories.
    pub component: Option<C>,
    pub is_sync: bool,
    pub menu_visible: bool,
    pub order: SortKey,
    pub action: RouteAction,
    pub children: Vec<RouteNode<C>>,
}

impl<C> RouteNode<C> {
    /// `true` for the synthetic root.
    pub fn is_root(&self) -> bool {
        self.id.is_empty()
    }

    /// `true` for directories that have no page of their own.
    pub fn is_implied(&self) -> bool {
        self.component.is_none()
    }

    /// Static redirect target.
    pub fn redirect_target(&self) -> Option<&str> {
        match &self.action {
            RouteAction::Redirect { to } => Some(to),
            RouteAction::Render => None,
        }
    }

    /// Redirect rule deferred to the navigation guard.
    pub fn redirect_rule(&self) -> Option<&RedirectRule> {
        self.meta.redirect.as_ref().and_then(Redirect::rule)
    }

    /// The index page child, if the directory has one.
    pub fn index_child(&self) -> Option<(usize, &RouteNode<C>)> {
        self.children.iter().enumerate().find(|(_, c)| c.index)
    }

    /// Menu label: the page title, or the segment name.
    pub fn default_name(&self) -> &str {
        self.meta.title.as_deref().unwrap_or(&self.name)
    }

    /// `true` if landing on this node produces something.
    fn is_renderable(&self) -> bool {
        self.component.is_some()
            || matches!(self.action, RouteAction::Redirect { .. })
            || self.index_child().is_some()
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(RouteNode::count).sum::<usize>()
    }
}

impl<C> fmt::Debug for RouteNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("exact", &self.exact)
            .field("order", &self.order)
            .field("menu_visible", &self.menu_visible)
            .field("has_component", &self.component.is_some())
            .field("action", &self.action)
            .field("children", &self.children)
            .finish()
    }
}

// ============================================================================
// MatchStack
// ============================================================================

/// One matched level of the route tree.
pub struct MatchEntry<'a, C> {
    pub node: &'a RouteNode<C>,
    /// Parameters accumulated from the root down to this level.
    pub params: RouteParams,
    /// `0` for the root.
    pub depth: usize,
    /// Position of `node` among its siblings.
    pub index: usize,
}

impl<C> Clone for MatchEntry<'_, C> {
    fn clone(&self) -> Self {
        Self {
            node: self.node,
            params: self.params.clone(),
            depth: self.depth,
            index: self.index,
        }
    }
}

/// The chain of nodes a path matched, root first.
pub struct MatchStack<'a, C> {
    entries: Vec<MatchEntry<'a, C>>,
}

impl<'a, C> MatchStack<'a, C> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The root entry.
    pub fn root(&self) -> Option<&MatchEntry<'a, C>> {
        self.entries.first()
    }

    /// The deepest entry.
    pub fn leaf(&self) -> Option<&MatchEntry<'a, C>> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MatchEntry<'a, C>] {
        &self.entries
    }

    /// Parameters at the deepest level.
    pub fn params(&self) -> RouteParams {
        self.leaf().map(|e| e.params.clone()).unwrap_or_default()
    }

    /// Node ids from root to leaf.
    pub fn ids(&self) -> Vec<&'a str> {
        self.entries.iter().map(|e| e.node.id.as_str()).collect()
    }

    /// Sibling positions and params below the root, for caching.
    pub fn to_indices(&self) -> Vec<(usize, RouteParams)> {
        self.entries
            .iter()
            .skip(1)
            .map(|e| (e.index, e.params.clone()))
            .collect()
    }

    /// Pretty-print for debugging
    #[cfg(debug_assertions)]
    pub fn debug_string(&self) -> String {
        if self.entries.is_empty() {
            return "MatchStack: (empty)".to_string();
        }

        let mut lines = vec!["MatchStack:".to_string()];
        for entry in &self.entries {
            let indent = "  ".repeat(entry.depth);
            let params_str = if entry.params.is_empty() {
                String::new()
            } else {
                format!(
                    " params={{{}}}",
                    entry
                        .params
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            };
            lines.push(format!(
                "{}[{}] {}{}",
                indent, entry.depth, entry.node.path, params_str
            ));
        }
        lines.join("\n")
    }
}

impl<C> Clone for MatchStack<'_, C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C> fmt::Debug for MatchStack<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (&e.node.path, &e.params)))
            .finish()
    }
}

// ============================================================================
// RouteTree
// ============================================================================

/// The assembled route tree together with its menu tree.
pub struct RouteTree<C> {
    root: RouteNode<C>,
    menu: Vec<MenuNode>,
    len: usize,
}

impl<C> RouteTree<C> {
    /// Assemble the trees from a page table.
    ///
    /// Siblings sort by ordering prefix, ties and unprefixed entries in
    /// declaration order. Fails on any authoring mistake; a console with a
    /// malformed page table should not start.
    pub fn build<I>(pages: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = PageDescriptor<C>>,
    {
        let mut root = Draft::root();
        for (decl, page) in pages.into_iter().enumerate() {
            root.insert(page, decl)?;
        }

        let root = root.finish()?;
        let menu = menu_entries(&root);
        let len = root.count() - 1;

        info_log!(
            "Assembled route tree: {} routes, {} top-level menu entries",
            len,
            menu.len()
        );

        Ok(Self { root, menu, len })
    }

    /// The synthetic root node.
    pub fn root(&self) -> &RouteNode<C> {
        &self.root
    }

    /// Top-level menu entries.
    pub fn menu(&self) -> &[MenuNode] {
        &self.menu
    }

    /// Number of routes, root excluded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every node in pre-order, root first.
    pub fn nodes(&self) -> Vec<&RouteNode<C>> {
        fn walk<'a, C>(node: &'a RouteNode<C>, out: &mut Vec<&'a RouteNode<C>>) {
            out.push(node);
            for child in &node.children {
                walk(child, out);
            }
        }
        let mut out = Vec::with_capacity(self.len + 1);
        walk(&self.root, &mut out);
        out
    }

    /// Find a node by its dotted id.
    pub fn find(&self, id: &str) -> Option<&RouteNode<C>> {
        self.nodes().into_iter().find(|n| n.id == id)
    }

    /// Match a concrete path.
    ///
    /// Siblings are tried in order and the first one that matches wins; the
    /// walk never backtracks into a later sibling. A non-exact node matches
    /// its segment and then descends; when the path is used up, its index
    /// page (if any) is appended. Returns `None` when no chain consumes the
    /// whole path.
    pub fn match_path(&self, path: &str) -> Option<MatchStack<'_, C>> {
        let segments = split_path(path);
        let mut stack = MatchStack::new();
        stack.entries.push(MatchEntry {
            node: &self.root,
            params: RouteParams::new(),
            depth: 0,
            index: 0,
        });

        let mut node = &self.root;
        let mut params = RouteParams::new();
        let mut remaining = segments.as_slice();

        while let Some((head, rest)) = remaining.split_first() {
            let mut next = None;
            for (index, child) in node.children.iter().enumerate() {
                if child.index || (child.exact && !rest.is_empty()) {
                    continue;
                }
                if let Some(capture) = match_segment(&child.segment, head) {
                    trace_log!("Segment '{}' matched '{}'", head, child.path);
                    if let Some((name, value)) = capture {
                        params.insert(name.to_string(), value);
                    }
                    next = Some((index, child));
                    break;
                }
            }

            let (index, child) = next?;
            stack.entries.push(MatchEntry {
                node: child,
                params: params.clone(),
                depth: stack.entries.len(),
                index,
            });
            node = child;
            remaining = rest;
        }

        if let Some((index, child)) = node.index_child() {
            stack.entries.push(MatchEntry {
                node: child,
                params: params.clone(),
                depth: stack.entries.len(),
                index,
            });
        } else if !node.is_renderable() {
            trace_log!("Path '{}' ends on '{}' which has no page", path, node.path);
            return None;
        }

        Some(stack)
    }

    /// Rebuild a match stack from [`MatchStack::to_indices`].
    pub fn stack_from_indices(&self, indices: &[(usize, RouteParams)]) -> Option<MatchStack<'_, C>> {
        let mut stack = MatchStack::new();
        stack.entries.push(MatchEntry {
            node: &self.root,
            params: RouteParams::new(),
            depth: 0,
            index: 0,
        });

        let mut node = &self.root;
        for (index, params) in indices {
            node = node.children.get(*index)?;
            stack.entries.push(MatchEntry {
                node,
                params: params.clone(),
                depth: stack.entries.len(),
                index: *index,
            });
        }
        Some(stack)
    }
}

impl<C> fmt::Debug for RouteTree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTree")
            .field("root", &self.root)
            .field("len", &self.len)
            .finish()
    }
}

// ============================================================================
// Menu assembly
// ============================================================================

/// Menu entries for the children of `node`.
///
/// A negative prefix hides a node together with its subtree. Index pages
/// are represented by their directory's entry. Implied directories left
/// with nothing to show are dropped.
fn menu_entries<C>(node: &RouteNode<C>) -> Vec<MenuNode> {
    node.children
        .iter()
        .filter(|child| child.menu_visible && !child.index)
        .filter_map(|child| {
            let children = menu_entries(child);
            if children.is_empty() && !child.is_renderable() {
                return None;
            }
            Some(MenuNode {
                id: child.id.clone(),
                path: child.path.clone(),
                default_name: child.default_name().to_string(),
                icon: child.meta.icon.as_ref().map(|i| i.to_string()),
                children,
            })
        })
        .collect()
}

// ============================================================================
// Draft tree
// ============================================================================

struct Draft<C> {
    segment: Segment,
    id: String,
    path: String,
    prefix: Option<i32>,
    decl: usize,
    page: Option<(PageMeta, C, bool)>,
    children: Vec<Draft<C>>,
}

impl<C> Draft<C> {
    fn root() -> Self {
        Self {
            segment: Segment {
                name: String::new(),
                prefix: None,
                dynamic: false,
                index: false,
            },
            id: String::new(),
            path: "/".to_string(),
            prefix: None,
            decl: 0,
            page: None,
            children: Vec::new(),
        }
    }

    fn insert(&mut self, page: PageDescriptor<C>, decl: usize) -> Result<(), ConfigurationError> {
        let resolved = resolve_location(&page.location)?;
        let last = resolved.segments.len() - 1;
        let mut payload = Some((page.meta, page.component, page.is_sync));

        let mut node = self;
        for (position, segment) in resolved.segments.iter().enumerate() {
            let slot = node.child_slot(segment, decl)?;
            node = &mut node.children[slot];
            node.state_prefix(segment.prefix)?;

            if position == last {
                if node.page.is_some() {
                    return Err(ConfigurationError::DuplicateSibling {
                        path: node.path.clone(),
                    });
                }
                node.page = payload.take();
            }
        }
        Ok(())
    }

    fn child_slot(&mut self, segment: &Segment, decl: usize) -> Result<usize, ConfigurationError> {
        let existing = self.children.iter().position(|c| {
            c.segment.dynamic == segment.dynamic
                && c.segment.index == segment.index
                && c.segment.name == segment.name
        });
        if let Some(slot) = existing {
            return Ok(slot);
        }

        if segment.dynamic {
            if let Some(other) = self.children.iter().find(|c| c.segment.dynamic) {
                return Err(ConfigurationError::AmbiguousDynamicSegment {
                    parent: self.path.clone(),
                    first: other.segment.name.clone(),
                    second: segment.name.clone(),
                });
            }
        }

        let id = if self.id.is_empty() {
            segment.id_part()
        } else {
            format!("{}.{}", self.id, segment.id_part())
        };
        self.children.push(Draft {
            segment: segment.clone(),
            path: join_path(&self.path, &segment.public()),
            id,
            prefix: None,
            decl,
            page: None,
            children: Vec::new(),
        });
        Ok(self.children.len() - 1)
    }

    /// Record a prefix written for this segment. The first one stated wins;
    /// a different one later is an error.
    fn state_prefix(&mut self, prefix: Option<i32>) -> Result<(), ConfigurationError> {
        match (self.prefix, prefix) {
            (Some(first), Some(second)) if first != second => {
                Err(ConfigurationError::ConflictingOrder {
                    path: self.path.clone(),
                    first,
                    second,
                })
            }
            (None, Some(stated)) => {
                self.prefix = Some(stated);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn finish(self) -> Result<RouteNode<C>, ConfigurationError> {
        let mut drafts = self.children;
        drafts.sort_by(|a, b| {
            SortKey::from_prefix(a.prefix)
                .cmp(&SortKey::from_prefix(b.prefix))
                .then(a.decl.cmp(&b.decl))
        });
        let children = drafts
            .into_iter()
            .map(Draft::finish)
            .collect::<Result<Vec<_>, _>>()?;

        let (meta, component, is_sync) = match self.page {
            Some((meta, component, is_sync)) => (meta, Some(component), is_sync),
            None => (PageMeta::implied(), None, true),
        };

        let action = match meta.redirect.as_ref().and_then(Redirect::target) {
            Some(to) if !to.starts_with('/') => {
                return Err(ConfigurationError::InvalidRedirectTarget {
                    path: self.path,
                    target: to.to_string(),
                });
            }
            Some(to) => RouteAction::Redirect { to: to.to_string() },
            None => RouteAction::Render,
        };

        let order = SortKey::from_prefix(self.prefix);
        Ok(RouteNode {
            exact: self.segment.index || children.is_empty(),
            index: self.segment.index,
            segment: self.segment.public(),
            name: self.segment.name,
            id: self.id,
            path: self.path,
            meta,
            component,
            is_sync,
            menu_visible: !order.is_negative(),
            order,
            action,
            children,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn page(location: &str) -> PageDescriptor<&'static str> {
        PageDescriptor::new(location, "page")
    }

    fn child_ids<C>(node: &RouteNode<C>) -> Vec<&str> {
        node.children.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_implied_directory() {
        let tree = RouteTree::build(vec![page("cluster/_clusterId/hosts")]).unwrap();
        let cluster = tree.find("cluster").unwrap();
        assert!(cluster.is_implied());
        assert!(cluster.meta.is_public());
        assert!(!cluster.exact);

        let hosts = tree.find("cluster._clusterId.hosts").unwrap();
        assert_eq!(hosts.path, "/cluster/:clusterId/hosts");
        assert!(hosts.exact);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_implied_directory_takes_first_prefix() {
        let tree = RouteTree::build(vec![
            page("b"),
            page("[1]a/x"),
            page("a/y"),
        ])
        .unwrap();
        assert_eq!(child_ids(tree.root()), vec!["a", "b"]);
        assert_eq!(tree.find("a").unwrap().order, SortKey::Ordered(1));
    }

    #[test]
    fn test_conflicting_order() {
        let result = RouteTree::build(vec![page("[1]a/x"), page("[2]a")]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::ConflictingOrder {
                path: "/a".to_string(),
                first: 1,
                second: 2,
            }
        );
    }

    #[test]
    fn test_index_page() {
        let tree = RouteTree::build(vec![page("cluster"), page("cluster/index")]).unwrap();
        let stack = tree.match_path("/cluster").unwrap();
        assert_eq!(stack.ids(), vec!["", "cluster", "cluster.index"]);
        assert!(tree.find("cluster.index").unwrap().exact);
    }

    #[test]
    fn test_no_backtracking() {
        // The dynamic sibling comes first and wins even though a static
        // sibling would match too.
        let tree = RouteTree::build(vec![page("[1]_name"), page("[2]new")]).unwrap();
        let stack = tree.match_path("/new").unwrap();
        assert_eq!(stack.leaf().unwrap().node.id, "_name");
    }

    #[test]
    fn test_exact_node_skipped_for_longer_path() {
        let tree = RouteTree::build(vec![page("cluster"), page("_any/detail")]).unwrap();
        let stack = tree.match_path("/cluster/detail").unwrap();
        assert_eq!(stack.ids(), vec!["", "_any", "_any.detail"]);
        assert_eq!(stack.params().get("any"), Some(&"cluster".to_string()));
    }

    #[test]
    fn test_unmatched_paths() {
        let tree = RouteTree::build(vec![page("cluster/_clusterId")]).unwrap();
        assert!(tree.match_path("/backup").is_none());
        assert!(tree.match_path("/cluster/1/hosts").is_none());
        // Implied directory without an index page.
        assert!(tree.match_path("/cluster").is_none());
        assert!(tree.match_path("/").is_none());
    }

    #[test]
    fn test_indices_round_trip() {
        let tree = RouteTree::build(vec![page("a"), page("b/_id")]).unwrap();
        let stack = tree.match_path("/b/7").unwrap();
        let indices = stack.to_indices();
        let rebuilt = tree.stack_from_indices(&indices).unwrap();
        assert_eq!(rebuilt.ids(), stack.ids());
        assert_eq!(rebuilt.params(), stack.params());
    }

    #[test]
    fn test_static_redirect_action() {
        let tree = RouteTree::build(vec![
            page("old").meta(PageMeta::new().redirect_to("/new")),
            page("new"),
        ])
        .unwrap();
        assert_eq!(tree.find("old").unwrap().redirect_target(), Some("/new"));
        assert_eq!(tree.find("new").unwrap().action, RouteAction::Render);
    }

    #[test]
    fn test_relative_redirect_rejected() {
        let result = RouteTree::build(vec![page("old").meta(PageMeta::new().redirect_to("new"))]);
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidRedirectTarget { .. })
        ));
    }

    #[test]
    fn test_menu_drops_empty_implied_groups() {
        let tree = RouteTree::build(vec![
            page("[-1]auth"),
            page("settings/[-1]hidden"),
            page("cluster"),
        ])
        .unwrap();
        let ids: Vec<&str> = tree.menu().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["cluster"]);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_debug_string() {
        let tree = RouteTree::build(vec![page("cluster/_clusterId")]).unwrap();
        let stack = tree.match_path("/cluster/9").unwrap();
        let text = stack.debug_string();
        assert!(text.contains("[2] /cluster/:clusterId params={clusterId=9}"));
    }
}
