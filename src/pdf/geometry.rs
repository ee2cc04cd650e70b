//! Coordinate spaces for the interactive page
//!
//! Three spaces are in play:
//! - document space: scale-invariant page units, what snippets store
//! - surface space: pixels of the page rendered at the current scale
//! - pointer space: raw viewport coordinates reported by input events
//!
//! Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};

/// A point in any of the three spaces
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle with non-negative extent
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from two opposite corners in any order
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment on all four edges
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest rectangle enclosing every input, `None` for an empty input
    #[must_use]
    pub fn bounding<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        let mut iter = rects.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.right(), first.bottom());
        for r in iter {
            min_x = min_x.min(r.x);
            min_y = min_y.min(r.y);
            max_x = max_x.max(r.right());
            max_y = max_y.max(r.bottom());
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Surface-space rectangle to document space
    #[must_use]
    pub fn to_document_space(&self, scale: f64) -> Rect {
        Rect::new(
            to_document_space(self.x, scale),
            to_document_space(self.y, scale),
            to_document_space(self.width, scale),
            to_document_space(self.height, scale),
        )
    }

    /// Document-space rectangle to surface space
    #[must_use]
    pub fn to_surface_space(&self, scale: f64) -> Rect {
        Rect::new(
            to_surface_space(self.x, scale),
            to_surface_space(self.y, scale),
            to_surface_space(self.width, scale),
            to_surface_space(self.height, scale),
        )
    }
}

#[must_use]
pub fn to_document_space(surface: f64, scale: f64) -> f64 {
    surface / scale
}

#[must_use]
pub fn to_surface_space(document: f64, scale: f64) -> f64 {
    document * scale
}

#[must_use]
pub fn point_to_document_space(p: Point, scale: f64) -> Point {
    Point::new(to_document_space(p.x, scale), to_document_space(p.y, scale))
}

/// Pointer-space to surface-space.
///
/// `surface_origin` is the top-left of the interactive surface in viewport
/// coordinates and must be sampled at the time of the event, since the
/// surface can scroll or reflow between events.
#[must_use]
pub fn pointer_to_surface(client: Point, surface_origin: Point) -> Point {
    Point::new(client.x - surface_origin.x, client.y - surface_origin.y)
}

/// Whole-pixel window of a surface-space rectangle.
///
/// Origins and extents are rounded to the nearest pixel; the window may
/// extend past the surface edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[must_use]
    pub fn from_surface(rect: &Rect) -> Self {
        Self {
            x: rect.x.round() as i64,
            y: rect.y.round() as i64,
            width: rect.width.round().max(0.0) as u32,
            height: rect.height.round().max(0.0) as u32,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Part of this window that lies inside a `width` x `height` surface
    #[must_use]
    pub fn clip_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + i64::from(self.width)).min(i64::from(width));
        let y1 = (self.y + i64::from(self.height)).min(i64::from(height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(PixelRect {
            x: x0,
            y: y0,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}
