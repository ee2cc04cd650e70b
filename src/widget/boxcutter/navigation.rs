//! Page navigation, bookmarks, outline extraction and drawers

use log::{info, warn};

use crate::pdf::page_sync::PageSource;
use crate::pdf::{Command, DocumentBackend, resolve_outline};
use crate::snippet::{without_id, without_index};

use super::state::BoxCutter;
use super::types::Drawer;

impl<B: DocumentBackend> BoxCutter<B> {
    /// Host-supplied page for this pass. `None` leaves the page to the
    /// component.
    pub fn set_page(&mut self, page: Option<i64>) {
        let source = page.map_or(PageSource::Internal, PageSource::External);
        self.apply(Command::SyncPage(source));
        self.settle();
    }

    pub fn next_page(&mut self) {
        self.apply(Command::NextPage);
        self.settle();
    }

    pub fn previous_page(&mut self) {
        self.apply(Command::PreviousPage);
        self.settle();
    }

    /// Jump to `page`, clamped into range
    pub fn jump_to_page(&mut self, page: i64) {
        self.apply(Command::JumpToPage(page));
        self.settle();
    }

    /// Jump to the page of the TOC entry at `index`
    pub fn open_toc_entry(&mut self, index: usize) -> bool {
        let Some(page) = self.toc.items().get(index).map(|i| i.page_number) else {
            return false;
        };
        self.jump_to_page(i64::from(page));
        true
    }

    #[must_use]
    pub fn is_current_page_bookmarked(&self) -> bool {
        self.toc.has_bookmark(self.session.current_page())
    }

    /// Bookmark the current page as `"Page N"`
    pub fn add_bookmark(&mut self) -> bool {
        let added = self.toc.add_bookmark(self.session.current_page());
        self.settle();
        added
    }

    /// Remove every TOC entry for the current page
    pub fn remove_bookmark(&mut self) -> bool {
        let removed = self.toc.remove_bookmark(self.session.current_page());
        self.settle();
        removed
    }

    pub fn rename_bookmark(&mut self, index: usize, title: &str) -> bool {
        let renamed = self.toc.rename(index, title);
        self.settle();
        renamed
    }

    /// Replace the TOC with the document's own outline.
    ///
    /// Returns the number of entries, or `None` when the TOC was left alone
    /// (no document, no outline, or the outline could not be read).
    pub fn extract_outline(&mut self) -> Option<usize> {
        let doc = self.document.as_ref()?;
        let items = match resolve_outline(doc, self.config.outline_max_depth) {
            Ok(Some(items)) => items,
            Ok(None) => {
                info!("Document has no outline");
                return None;
            }
            Err(e) => {
                warn!("Failed to read document outline: {e}");
                return None;
            }
        };
        let count = items.len();
        info!("Extracted {count} outline entries");
        self.toc.replace_all(items);
        self.settle();
        Some(count)
    }

    /// Remove the snippet at `index` of the host's list
    pub fn remove_snippet_at(&mut self, index: usize) -> bool {
        let Some(next) = without_index(&self.snippets, index) else {
            return false;
        };
        self.publish_snippets(next);
        self.settle();
        true
    }

    pub fn remove_snippet(&mut self, id: &str) -> bool {
        let Some(next) = without_id(&self.snippets, id) else {
            return false;
        };
        self.publish_snippets(next);
        self.settle();
        true
    }

    pub fn toggle_drawer(&mut self, drawer: Drawer) -> bool {
        self.panels.toggle(drawer)
    }
}
