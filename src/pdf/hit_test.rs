//! Hover and delete-button hit testing
//!
//! Multi-selection rectangles are ephemeral screen artifacts and are tested
//! in surface space. Snippets are persistent document entities and are tested
//! in document space against the pointer divided by the scale. Multi-selection
//! rectangles are tested first; the first hit wins.

use super::geometry::{Point, Rect, point_to_document_space};
use crate::snippet::Snippet;

/// Radius of the round delete button, in surface pixels
pub const DELETE_BUTTON_RADIUS: f64 = 8.0;
/// Gap between the delete button and the rectangle's top-right corner
pub const DELETE_BUTTON_MARGIN: f64 = 4.0;

/// What the pointer is over
#[derive(Clone, Debug, PartialEq)]
pub enum HoverTarget {
    /// A stored snippet on the current page
    Single { id: String, hotspot: Point },
    /// An entry of the multi-selection
    Multi { index: usize, hotspot: Point },
}

impl HoverTarget {
    /// Centre of the delete button, in surface space
    #[must_use]
    pub fn hotspot(&self) -> Point {
        match self {
            Self::Single { hotspot, .. } | Self::Multi { hotspot, .. } => *hotspot,
        }
    }

    /// Whether a surface-space point lands on the delete button
    #[must_use]
    pub fn hits_delete_button(&self, p: Point) -> bool {
        p.distance(self.hotspot()) <= DELETE_BUTTON_RADIUS
    }
}

/// Delete button centre for a surface-space rectangle
#[must_use]
pub fn delete_hotspot(rect: &Rect) -> Point {
    Point::new(
        rect.right() - DELETE_BUTTON_MARGIN - DELETE_BUTTON_RADIUS,
        rect.y + DELETE_BUTTON_MARGIN + DELETE_BUTTON_RADIUS,
    )
}

/// Find the hover target under a surface-space point
#[must_use]
pub fn hit_test(
    point: Point,
    multi: &[Rect],
    snippets: &[Snippet],
    page_number: u32,
    scale: f64,
) -> Option<HoverTarget> {
    if let Some((index, rect)) = multi.iter().enumerate().find(|(_, r)| r.contains(point)) {
        return Some(HoverTarget::Multi {
            index,
            hotspot: delete_hotspot(rect),
        });
    }

    let doc_point = point_to_document_space(point, scale);
    snippets
        .iter()
        .filter(|s| s.page_number == page_number)
        .find(|s| s.bounds().contains(doc_point))
        .map(|s| HoverTarget::Single {
            id: s.id.clone(),
            hotspot: delete_hotspot(&s.bounds().to_surface_space(scale)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(id: &str, page: u32, bounds: Rect) -> Snippet {
        Snippet {
            id: id.to_string(),
            page_number: page,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            image: Vec::new(),
        }
    }

    #[test]
    fn multi_selection_wins_over_snippets() {
        let multi = [Rect::new(0.0, 0.0, 100.0, 100.0)];
        let snippets = [snippet("s", 1, Rect::new(0.0, 0.0, 100.0, 100.0))];
        let hit = hit_test(Point::new(50.0, 50.0), &multi, &snippets, 1, 1.0);
        assert_eq!(
            hit,
            Some(HoverTarget::Multi {
                index: 0,
                hotspot: Point::new(88.0, 12.0)
            })
        );
    }

    #[test]
    fn first_overlapping_multi_rect_wins() {
        let multi = [
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Rect::new(40.0, 40.0, 50.0, 50.0),
        ];
        let hit = hit_test(Point::new(45.0, 45.0), &multi, &[], 1, 1.0);
        assert!(matches!(hit, Some(HoverTarget::Multi { index: 0, .. })));
    }

    #[test]
    fn snippets_are_tested_in_document_space() {
        // Stored at (10, 10, 20, 20); at scale 2 that covers surface (20..60, 20..60)
        let snippets = [snippet("s", 3, Rect::new(10.0, 10.0, 20.0, 20.0))];

        let hit = hit_test(Point::new(55.0, 25.0), &[], &snippets, 3, 2.0);
        assert_eq!(
            hit,
            Some(HoverTarget::Single {
                id: "s".to_string(),
                hotspot: Point::new(48.0, 32.0)
            })
        );
        assert_eq!(hit_test(Point::new(15.0, 15.0), &[], &snippets, 3, 2.0), None);
    }

    #[test]
    fn snippets_on_other_pages_are_invisible() {
        let snippets = [snippet("s", 2, Rect::new(0.0, 0.0, 50.0, 50.0))];
        assert_eq!(hit_test(Point::new(10.0, 10.0), &[], &snippets, 1, 1.0), None);
    }

    #[test]
    fn repeated_queries_agree() {
        let multi = [Rect::new(5.0, 5.0, 30.0, 30.0)];
        let snippets = [snippet("s", 1, Rect::new(40.0, 40.0, 30.0, 30.0))];
        for p in [Point::new(10.0, 10.0), Point::new(50.0, 50.0), Point::new(99.0, 1.0)] {
            let first = hit_test(p, &multi, &snippets, 1, 1.0);
            let second = hit_test(p, &multi, &snippets, 1, 1.0);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn delete_button_radius_is_inclusive() {
        let target = HoverTarget::Multi {
            index: 0,
            hotspot: Point::new(88.0, 12.0),
        };
        assert!(target.hits_delete_button(Point::new(96.0, 12.0)));
        assert!(!target.hits_delete_button(Point::new(96.1, 12.0)));
    }
}
