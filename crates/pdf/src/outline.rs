//! Bookmark tree building.
//!
//! The document side supplies a raw [`OutlineItem`] hierarchy and a
//! [`DestinationResolver`]; this module turns them into [`OutlineNode`]
//! records with resolved page numbers and top-down offsets.

use log::debug;
use thiserror::Error;

use crate::parser::backend::PageId;
use crate::types::OutlineNode;

/// Name given to the synthetic root. Never part of the returned forest.
pub const ROOT_NAME: &str = "root";

/// The page half of an explicit destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageTarget {
    /// Indirect reference to a page object.
    Ref(PageId),
    /// Zero-based page index (seen in remote-style destinations).
    Index(u32),
}

/// Where a bookmark points.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    Explicit { page: PageTarget, top: Option<f32> },
    Named(String),
}

/// What activating a bookmark does.
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkAction {
    GoTo(Destination),
    /// Any other action type (`URI`, `Launch`, ...), by its `/S` name.
    Other(String),
}

/// One node of the outline as read from the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineItem {
    pub title: String,
    pub action: Option<BookmarkAction>,
    pub children: Vec<OutlineItem>,
}

impl OutlineItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: BookmarkAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_children(mut self, children: Vec<OutlineItem>) -> Self {
        self.children = children;
        self
    }
}

/// A destination resolved against the page tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDestination {
    /// Zero-based page index.
    pub page_index: u32,
    /// Target top in bottom-up page space, when the destination names one.
    pub top: Option<f32>,
    pub page_height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DestinationError {
    #[error("destination has no page")]
    MissingPage,
    #[error("destination page not in document: {0}")]
    UnknownPage(String),
    #[error("malformed destination: {0}")]
    Malformed(String),
    #[error("named destination not found: {0}")]
    UnknownName(String),
}

pub trait DestinationResolver {
    fn resolve(&self, dest: &Destination) -> Result<ResolvedDestination, DestinationError>;
}

/// A document that may carry an outline.
pub trait OutlineDocument: DestinationResolver {
    /// The outline root, or `None` when the document has no outline.
    /// The root's title is not used.
    fn outline_root(&self) -> Option<OutlineItem>;
}

/// Flatten a single bookmark into a record without children.
///
/// A destination that cannot be resolved leaves both `page_number` and
/// `y_offset` unset. A resolved one without a usable top maps to offset 0.
pub fn bookmark_to_record(item: &OutlineItem, resolver: &dyn DestinationResolver) -> OutlineNode {
    let mut node = OutlineNode {
        name: item.title.clone(),
        page_number: None,
        y_offset: None,
        children: Vec::new(),
    };

    let Some(BookmarkAction::GoTo(dest)) = &item.action else {
        return node;
    };

    match resolver.resolve(dest) {
        Ok(resolved) => {
            node.page_number = Some(resolved.page_index + 1);
            node.y_offset = Some(match (resolved.top, resolved.page_height) {
                (Some(top), Some(height)) => (height - top).max(0.0),
                _ => 0.0,
            });
        }
        Err(e) => debug!("bookmark {:?}: {}", item.title, e),
    }

    node
}

/// Materialize `item` and its descendants, children in document order.
///
/// With `is_root` the item itself is replaced by the synthetic root.
pub fn build_tree(
    item: &OutlineItem,
    resolver: &dyn DestinationResolver,
    is_root: bool,
) -> OutlineNode {
    let mut node = if is_root {
        OutlineNode {
            name: ROOT_NAME.to_string(),
            page_number: None,
            y_offset: None,
            children: Vec::new(),
        }
    } else {
        bookmark_to_record(item, resolver)
    };

    node.children = item
        .children
        .iter()
        .map(|child| build_tree(child, resolver, false))
        .collect();
    node
}

/// The document's top-level bookmarks, or `None` without an outline.
pub fn get_bookmarks<D: OutlineDocument>(doc: &D) -> Option<Vec<OutlineNode>> {
    let root = doc.outline_root()?;
    Some(build_tree(&root, doc, true).children)
}
