//! Flat, page-addressable table of contents
//!
//! The host owns the TOC; the component keeps a local copy. Every local
//! mutation marks the copy dirty, and the dirty copy is handed to the host
//! once, after which the flag is cleared. Values pushed in by the host never
//! mark the copy dirty.

use serde::{Deserialize, Serialize};

use crate::snippet::new_id;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocKind {
    #[default]
    Bookmark,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TocKind,
    /// 1-based page number
    pub page_number: u32,
    pub title: String,
}

impl TocItem {
    #[must_use]
    pub fn bookmark(page_number: u32, title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            kind: TocKind::Bookmark,
            page_number,
            title: title.into(),
        }
    }
}

/// Local TOC cache with explicit change tracking
#[derive(Debug, Default)]
pub struct TocState {
    items: Vec<TocItem>,
    dirty: bool,
}

impl TocState {
    #[must_use]
    pub fn new(items: Vec<TocItem>) -> Self {
        Self {
            items,
            dirty: false,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[TocItem] {
        &self.items
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Adopt the host's value as the current truth
    pub fn set_from_host(&mut self, items: Vec<TocItem>) {
        self.items = items;
        self.dirty = false;
    }

    #[must_use]
    pub fn has_bookmark(&self, page_number: u32) -> bool {
        self.items.iter().any(|i| i.page_number == page_number)
    }

    /// Add a `"Page N"` bookmark unless the page already has an entry.
    /// The list stays ordered by page.
    pub fn add_bookmark(&mut self, page_number: u32) -> bool {
        if self.has_bookmark(page_number) {
            return false;
        }
        self.items
            .push(TocItem::bookmark(page_number, format!("Page {page_number}")));
        self.items.sort_by_key(|i| i.page_number);
        self.dirty = true;
        true
    }

    /// Remove every entry pointing at `page_number`
    pub fn remove_bookmark(&mut self, page_number: u32) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.page_number != page_number);
        let changed = self.items.len() != before;
        self.dirty |= changed;
        changed
    }

    pub fn rename(&mut self, index: usize, title: impl Into<String>) -> bool {
        let title = title.into();
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        if item.title == title {
            return false;
        }
        item.title = title;
        self.dirty = true;
        true
    }

    /// Bulk replace, as produced by outline extraction
    pub fn replace_all(&mut self, items: Vec<TocItem>) {
        self.items = items;
        self.dirty = true;
    }

    /// The whole list if it changed since the last call
    pub fn take_changes(&mut self) -> Option<Vec<TocItem>> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.items.clone())
    }
}
