//! Types shared between the component and its host

use image::Rgba;

use crate::pdf::extract::DEFAULT_BACKGROUND;
use crate::pdf::geometry::{Point, pointer_to_surface};
use crate::pdf::readiness::ReadyInfo;
use crate::pdf::selection::PointerKind;
use crate::pdf::SessionError;
use crate::snippet::Snippet;
use crate::table_of_contents::TocItem;

/// Per-component configuration, usually built from the settings file
#[derive(Clone, Debug, PartialEq)]
pub struct BoxCutterConfig {
    pub default_scale: f64,
    /// Outline levels kept by outline extraction, 1 = top level only
    pub outline_max_depth: usize,
    pub render_cache_pages: usize,
    /// Fill colour of combined snippets
    pub snippet_background: Rgba<u8>,
}

impl Default for BoxCutterConfig {
    fn default() -> Self {
        Self {
            default_scale: 1.5,
            outline_max_depth: 1,
            render_cache_pages: 8,
            snippet_background: DEFAULT_BACKGROUND,
        }
    }
}

/// A pointer event as delivered by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Raw pointer position in viewport coordinates
    pub client: Point,
    /// Top-left of the page surface in viewport coordinates at event time
    pub surface_origin: Point,
    /// Multi-selection modifier held
    pub shift: bool,
}

impl PointerEvent {
    /// Event for a surface that sits at the viewport origin
    #[must_use]
    pub fn at(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            client: Point::new(x, y),
            surface_origin: Point::default(),
            shift: false,
        }
    }

    #[must_use]
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.surface_origin = origin;
        self
    }

    /// Position in surface space
    #[must_use]
    pub fn surface_point(&self) -> Point {
        pointer_to_surface(self.client, self.surface_origin)
    }
}

/// Notifications for the host, drained with `BoxCutter::drain_events`
#[derive(Clone, Debug)]
pub enum HostEvent {
    /// The whole new snippet list
    SnippetsChanged(Vec<Snippet>),
    /// The whole new TOC list
    TocChanged(Vec<TocItem>),
    /// New 1-based current page
    PageChanged(u32),
    /// First page of a freshly loaded document is on screen
    Ready(ReadyInfo),
}

/// What the page area shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewStatus {
    /// No document has been supplied yet
    Empty,
    Loading,
    /// Load or render failure, shown instead of the page
    Error(SessionError),
    /// Loaded, but the document has no pages to show
    NoPages,
    /// Waiting for the current page's surface
    Rendering,
    Page,
}

/// Side drawers of the component
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drawer {
    Snippets,
    Contents,
}

/// Open/closed state of the two mutually exclusive drawers
#[derive(Debug)]
pub struct Panels {
    open: Option<Drawer>,
    show_snippets_collection: bool,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            open: None,
            show_snippets_collection: true,
        }
    }
}

impl Panels {
    #[must_use]
    pub fn open(&self) -> Option<Drawer> {
        self.open
    }

    #[must_use]
    pub fn is_open(&self, drawer: Drawer) -> bool {
        self.open == Some(drawer)
    }

    #[must_use]
    pub fn snippets_available(&self) -> bool {
        self.show_snippets_collection
    }

    /// Open `drawer`, closing the other one, or close it if already open.
    /// Returns false when the drawer is unavailable.
    pub fn toggle(&mut self, drawer: Drawer) -> bool {
        if drawer == Drawer::Snippets && !self.show_snippets_collection {
            return false;
        }
        self.open = if self.open == Some(drawer) {
            None
        } else {
            Some(drawer)
        };
        true
    }

    pub fn set_show_snippets_collection(&mut self, show: bool) {
        self.show_snippets_collection = show;
        if !show && self.open == Some(Drawer::Snippets) {
            self.open = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawers_are_mutually_exclusive() {
        let mut panels = Panels::default();
        assert!(panels.toggle(Drawer::Snippets));
        assert!(panels.toggle(Drawer::Contents));
        assert_eq!(panels.open(), Some(Drawer::Contents));
        assert!(panels.toggle(Drawer::Contents));
        assert_eq!(panels.open(), None);
    }

    #[test]
    fn hidden_snippet_drawer_cannot_open() {
        let mut panels = Panels::default();
        panels.toggle(Drawer::Snippets);
        panels.set_show_snippets_collection(false);
        assert_eq!(panels.open(), None);
        assert!(!panels.toggle(Drawer::Snippets));
        assert!(panels.toggle(Drawer::Contents));
    }

    #[test]
    fn pointer_is_made_relative_to_surface() {
        let ev = PointerEvent::at(PointerKind::Mouse, 120.0, 90.0)
            .with_origin(Point::new(100.0, 50.0));
        assert_eq!(ev.surface_point(), Point::new(20.0, 40.0));
    }
}
