//! Page descriptors: the input of tree assembly.
//!
//! ```
//! use console_navigator::{PageDescriptor, PageMeta};
//!
//! let pages = vec![
//!     PageDescriptor::new("[1]dashboard", "Dashboard").meta(PageMeta::public()).sync(),
//!     PageDescriptor::new("[2]cluster", "ClusterList"),
//!     PageDescriptor::new("cluster/_clusterId", "ClusterDetail"),
//! ];
//! assert!(pages[0].is_sync);
//! assert!(!pages[1].is_sync);
//! ```

use crate::meta::PageMeta;

/// One page of the console.
///
/// `C` is whatever renders the page; the core never looks inside it.
#[derive(Debug, Clone)]
pub struct PageDescriptor<C> {
    /// `/`-separated segments in the page table naming convention.
    pub location: String,
    pub meta: PageMeta,
    pub component: C,
    /// Mount eagerly instead of behind a loading boundary.
    pub is_sync: bool,
}

impl<C> PageDescriptor<C> {
    /// A lazily loaded page with default metadata.
    pub fn new(location: impl Into<String>, component: C) -> Self {
        Self {
            location: location.into(),
            meta: PageMeta::default(),
            component,
            is_sync: false,
        }
    }

    /// Replace the metadata.
    pub fn meta(mut self, meta: PageMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Mount eagerly.
    pub fn sync(mut self) -> Self {
        self.is_sync = true;
        self
    }
}
