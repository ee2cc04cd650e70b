//! Overlay display list and redraw coalescing
//!
//! The overlay sits on top of the rendered page and shows stored snippet
//! outlines, multi-selection rectangles, the in-progress drag and the delete
//! button of the hovered entry. Any state change only marks the overlay
//! stale; the display list is rebuilt at most once per frame.

use super::geometry::{Point, Rect};
use super::hit_test::{DELETE_BUTTON_RADIUS, HoverTarget, delete_hotspot};
use super::selection::{MultiSelection, Selection};
use crate::snippet::Snippet;

/// One primitive for the host to paint, in surface space
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayShape {
    /// Dashed outline of a stored snippet, labelled with its 1-based position
    /// among the current page's snippets
    SnippetOutline { rect: Rect, label: usize },
    /// Thin dashed outline of a multi-selection entry
    MultiOutline { rect: Rect },
    /// Solid outline and tint of the drag in progress
    ActiveSelection { rect: Rect },
    /// Round delete button with a cross
    DeleteButton { center: Point, radius: f64 },
}

/// A complete overlay for one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayFrame {
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<OverlayShape>,
}

/// Everything the overlay depends on
pub struct OverlayInput<'a> {
    pub width: u32,
    pub height: u32,
    pub snippets: &'a [Snippet],
    pub page_number: u32,
    pub scale: f64,
    pub selection: &'a Selection,
    pub multi: &'a MultiSelection,
    pub hover: Option<&'a HoverTarget>,
}

/// Build the display list, bottom layer first
#[must_use]
pub fn compose(input: &OverlayInput<'_>) -> OverlayFrame {
    let mut shapes = Vec::new();

    let page_snippets = input
        .snippets
        .iter()
        .filter(|s| s.page_number == input.page_number);
    for (i, snippet) in page_snippets.enumerate() {
        let rect = snippet.bounds().to_surface_space(input.scale);
        shapes.push(OverlayShape::SnippetOutline { rect, label: i + 1 });
        if matches!(input.hover, Some(HoverTarget::Single { id, .. }) if *id == snippet.id) {
            shapes.push(delete_button(&rect));
        }
    }

    if input.multi.has_selections() {
        for (i, rect) in input.multi.selections.iter().enumerate() {
            shapes.push(OverlayShape::MultiOutline { rect: *rect });
            if matches!(input.hover, Some(HoverTarget::Multi { index, .. }) if *index == i) {
                shapes.push(delete_button(rect));
            }
        }
    }

    if input.selection.is_selecting {
        shapes.push(OverlayShape::ActiveSelection {
            rect: input.selection.normalized(),
        });
    }

    OverlayFrame {
        width: input.width,
        height: input.height,
        shapes,
    }
}

fn delete_button(rect: &Rect) -> OverlayShape {
    OverlayShape::DeleteButton {
        center: delete_hotspot(rect),
        radius: DELETE_BUTTON_RADIUS,
    }
}

/// Coalesces redraw requests to one per frame
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    pending: bool,
    redraws: u64,
}

impl RedrawScheduler {
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Called at a frame boundary; true when a redraw should happen now
    pub fn take(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.redraws += 1;
        true
    }

    /// Number of redraws performed so far
    #[must_use]
    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}
