//! Outline reading and destination resolution over `lopdf`.
//!
//! The catalog's `/Outlines` dictionary is walked through `/First` and
//! `/Next` links. Every reachable item is visited at most once and nesting
//! stops at [`MAX_OUTLINE_DEPTH`], so cyclic outlines terminate.

use std::collections::HashSet;

use log::debug;

use super::backend::{decode_text_simple, LopdfBackend, PdfBackend};
use crate::outline::{
    BookmarkAction, Destination, DestinationError, DestinationResolver, OutlineDocument,
    OutlineItem, PageTarget, ResolvedDestination,
};

/// Maximum nesting of outline items below the root.
pub const MAX_OUTLINE_DEPTH: usize = 64;

/// Maximum depth of a `/Kids` chain in a name tree.
const MAX_NAME_TREE_DEPTH: usize = 32;

impl LopdfBackend {
    fn catalog(&self) -> Option<&lopdf::Dictionary> {
        self.raw_doc()
            .trailer
            .get(b"Root")
            .ok()
            .and_then(|o| self.resolve_dict(o))
    }

    fn reference(dict: &lopdf::Dictionary, key: &[u8]) -> Option<lopdf::ObjectId> {
        dict.get(key).ok().and_then(|o| o.as_reference().ok())
    }

    /// Read the outline hierarchy, or `None` if the catalog has none.
    pub fn read_outline(&self) -> Option<OutlineItem> {
        let outlines = self
            .catalog()?
            .get(b"Outlines")
            .ok()
            .and_then(|o| self.resolve_dict(o))?;

        let mut visited = HashSet::new();
        let children = self.read_siblings(Self::reference(outlines, b"First"), 1, &mut visited);
        Some(OutlineItem::default().with_children(children))
    }

    fn read_siblings(
        &self,
        first: Option<lopdf::ObjectId>,
        depth: usize,
        visited: &mut HashSet<lopdf::ObjectId>,
    ) -> Vec<OutlineItem> {
        let mut items = Vec::new();
        if depth > MAX_OUTLINE_DEPTH {
            debug!("outline nesting exceeds {} levels; truncated", MAX_OUTLINE_DEPTH);
            return items;
        }

        let mut current = first;
        while let Some(id) = current {
            if !visited.insert(id) {
                debug!("outline item {:?} already visited; stopping chain", id);
                break;
            }
            let Ok(dict) = self.raw_doc().get_dictionary(id) else {
                break;
            };

            let title = dict
                .get(b"Title")
                .ok()
                .map(|o| self.resolve_object(o))
                .and_then(|o| o.as_str().ok())
                .map(decode_text_simple)
                .unwrap_or_default();

            let first_child = Self::reference(dict, b"First");
            items.push(OutlineItem {
                action: self.item_action(&title, dict),
                children: self.read_siblings(first_child, depth + 1, visited),
                title,
            });

            current = Self::reference(dict, b"Next");
        }
        items
    }

    /// `/Dest` wins over `/A`; a direct destination counts as GoTo.
    fn item_action(&self, title: &str, dict: &lopdf::Dictionary) -> Option<BookmarkAction> {
        if let Ok(dest) = dict.get(b"Dest") {
            return self.goto(title, dest);
        }

        let action = dict.get(b"A").ok().and_then(|o| self.resolve_dict(o))?;
        let kind = action.get(b"S").ok().and_then(|o| o.as_name().ok())?;
        match kind {
            b"GoTo" => self.goto(title, action.get(b"D").ok()?),
            other => Some(BookmarkAction::Other(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }

    fn goto(&self, title: &str, dest: &lopdf::Object) -> Option<BookmarkAction> {
        match self.parse_destination(dest) {
            Ok(d) => Some(BookmarkAction::GoTo(d)),
            Err(e) => {
                debug!("bookmark {:?}: {}", title, e);
                None
            }
        }
    }

    fn parse_destination(&self, obj: &lopdf::Object) -> Result<Destination, DestinationError> {
        match self.resolve_object(obj) {
            lopdf::Object::String(bytes, _) => Ok(Destination::Named(decode_text_simple(bytes))),
            lopdf::Object::Name(name) => Ok(Destination::Named(
                String::from_utf8_lossy(name).into_owned(),
            )),
            lopdf::Object::Array(_) => {
                let (page, top) = self.parse_explicit(obj)?;
                Ok(Destination::Explicit { page, top })
            }
            other => Err(DestinationError::Malformed(format!(
                "unexpected destination object {:?}",
                other
            ))),
        }
    }

    /// `[page /Kind args...]`; the page may be a reference or an index.
    fn parse_explicit(
        &self,
        obj: &lopdf::Object,
    ) -> Result<(PageTarget, Option<f32>), DestinationError> {
        let arr = self
            .resolve_object(obj)
            .as_array()
            .map_err(|_| DestinationError::Malformed("destination is not an array".into()))?;

        let page = match arr.first() {
            Some(lopdf::Object::Reference(id)) => PageTarget::Ref(*id),
            Some(lopdf::Object::Integer(i)) if *i >= 0 => {
                let index = u32::try_from(*i).map_err(|_| {
                    DestinationError::Malformed(format!("page index {} out of range", i))
                })?;
                PageTarget::Index(index)
            }
            _ => return Err(DestinationError::MissingPage),
        };

        Ok((page, self.destination_top(arr)))
    }

    /// The `top` operand of `/XYZ`, `/FitH`, `/FitBH` and `/FitR`.
    /// `null` means "unchanged" and reads as absent.
    fn destination_top(&self, arr: &[lopdf::Object]) -> Option<f32> {
        let kind = arr.get(1).and_then(|o| o.as_name().ok())?;
        let index = match kind {
            b"XYZ" => 3,
            b"FitH" | b"FitBH" => 2,
            b"FitR" => 5,
            _ => return None,
        };
        arr.get(index).and_then(|o| self.number(o))
    }

    /// Look a name up in `/Names /Dests`, then in the legacy `/Dests`.
    fn lookup_named(&self, name: &str) -> Result<(PageTarget, Option<f32>), DestinationError> {
        let catalog = self
            .catalog()
            .ok_or_else(|| DestinationError::Malformed("document has no catalog".into()))?;

        let from_tree = catalog
            .get(b"Names")
            .ok()
            .and_then(|o| self.resolve_dict(o))
            .and_then(|names| names.get(b"Dests").ok())
            .and_then(|o| self.resolve_dict(o))
            .and_then(|tree| self.lookup_name_tree(tree, name, 0));

        let value = from_tree
            .or_else(|| {
                catalog
                    .get(b"Dests")
                    .ok()
                    .and_then(|o| self.resolve_dict(o))
                    .and_then(|dests| dests.get(name.as_bytes()).ok())
            })
            .ok_or_else(|| DestinationError::UnknownName(name.to_string()))?;

        // The value is either the array itself or a dictionary holding it in /D.
        match self.resolve_dict(value) {
            Some(dict) => {
                let inner = dict.get(b"D").map_err(|_| {
                    DestinationError::Malformed(format!("named destination {:?} has no /D", name))
                })?;
                self.parse_explicit(inner)
            }
            None => self.parse_explicit(value),
        }
    }

    fn lookup_name_tree<'a>(
        &'a self,
        node: &'a lopdf::Dictionary,
        name: &str,
        depth: usize,
    ) -> Option<&'a lopdf::Object> {
        if depth > MAX_NAME_TREE_DEPTH {
            return None;
        }

        if let Some(pairs) = node
            .get(b"Names")
            .ok()
            .and_then(|o| self.resolve_object(o).as_array().ok())
        {
            for pair in pairs.chunks_exact(2) {
                if let lopdf::Object::String(key, _) = self.resolve_object(&pair[0]) {
                    if decode_text_simple(key) == name {
                        return Some(&pair[1]);
                    }
                }
            }
        }

        let kids = node
            .get(b"Kids")
            .ok()
            .and_then(|o| self.resolve_object(o).as_array().ok())?;
        kids.iter()
            .filter_map(|kid| self.resolve_dict(kid))
            .find_map(|kid| self.lookup_name_tree(kid, name, depth + 1))
    }

    fn resolve_explicit(
        &self,
        page: PageTarget,
        top: Option<f32>,
    ) -> Result<ResolvedDestination, DestinationError> {
        let pages = self.pages();
        let (page_number, page_id) = match page {
            PageTarget::Ref(id) => pages
                .iter()
                .find(|(_, page_id)| **page_id == id)
                .map(|(n, page_id)| (*n, *page_id))
                .ok_or_else(|| DestinationError::UnknownPage(format!("{} {} R", id.0, id.1)))?,
            PageTarget::Index(i) => i
                .checked_add(1)
                .and_then(|n| pages.get(&n).map(|page_id| (n, *page_id)))
                .ok_or_else(|| DestinationError::UnknownPage(format!("index {}", i)))?,
        };

        let page_height = self.page_dimensions(page_id).ok().map(|(_, h)| h);
        Ok(ResolvedDestination {
            page_index: page_number - 1,
            top,
            page_height,
        })
    }
}

impl DestinationResolver for LopdfBackend {
    fn resolve(&self, dest: &Destination) -> Result<ResolvedDestination, DestinationError> {
        match dest {
            Destination::Explicit { page, top } => self.resolve_explicit(*page, *top),
            Destination::Named(name) => {
                let (page, top) = self.lookup_named(name)?;
                self.resolve_explicit(page, top)
            }
        }
    }
}

impl OutlineDocument for LopdfBackend {
    fn outline_root(&self) -> Option<OutlineItem> {
        self.read_outline()
    }
}
