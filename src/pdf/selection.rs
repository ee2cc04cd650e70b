//! Drag-selection state machine for the interactive page
//!
//! A drag is `Idle -> Dragging(lock) -> Idle`. The lock records which pointer
//! kind started the drag; only events of that kind may move, commit or abort
//! it. Touch never starts a drag because the host keeps it for scrolling, and
//! that is encoded in [`DragPointer`], which has no touch variant.

use super::geometry::{Point, Rect};

/// Rectangles with either side at or below this many surface pixels are noise
pub const MIN_SELECTION_SIZE: f64 = 10.0;

/// Input device kind reported with every pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// The drag lock this kind may hold, if any
    #[must_use]
    pub fn drag_pointer(self) -> Option<DragPointer> {
        match self {
            Self::Mouse => Some(DragPointer::Mouse),
            Self::Pen => Some(DragPointer::Pen),
            Self::Touch => None,
        }
    }
}

/// Pointer kinds that can own a drag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPointer {
    Mouse,
    Pen,
}

impl DragPointer {
    #[must_use]
    pub fn matches(self, kind: PointerKind) -> bool {
        kind.drag_pointer() == Some(self)
    }
}

/// The in-progress single selection, in surface space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Selection {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub is_selecting: bool,
}

impl Selection {
    fn anchored_at(p: Point) -> Self {
        Self {
            start_x: p.x,
            start_y: p.y,
            end_x: p.x,
            end_y: p.y,
            is_selecting: true,
        }
    }

    #[must_use]
    pub fn normalized(&self) -> Rect {
        Rect::from_corners(
            Point::new(self.start_x, self.start_y),
            Point::new(self.end_x, self.end_y),
        )
    }
}

/// Rectangles accumulated by modifier-qualified drags, in surface space
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiSelection {
    pub selections: Vec<Rect>,
    pub is_active: bool,
}

impl MultiSelection {
    #[must_use]
    pub fn has_selections(&self) -> bool {
        self.is_active && !self.selections.is_empty()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
        self.is_active = false;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        lock: DragPointer,
    },
}

/// What a pointer-up did to the selection state
#[derive(Clone, Debug, PartialEq)]
pub enum Commit {
    /// No drag owned by this pointer was in progress
    Ignored,
    /// The rectangle was at or below the noise threshold
    Discarded,
    /// A single selection is ready for extraction
    Single(Rect),
    /// The rectangle joined the multi-selection, now `count` long
    Appended { count: usize },
}

/// Selection and multi-selection state for one interactive surface
#[derive(Debug, Default)]
pub struct SelectionMachine {
    state: DragState,
    selection: Selection,
    multi: MultiSelection,
}

impl SelectionMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn multi(&self) -> &MultiSelection {
        &self.multi
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The pointer kind currently holding the drag lock
    #[must_use]
    pub fn lock(&self) -> Option<DragPointer> {
        match self.state {
            DragState::Dragging { lock } => Some(lock),
            DragState::Idle => None,
        }
    }

    /// Start a drag. Returns false if the event was ignored.
    ///
    /// Touch never starts a drag. While a drag is held, a down from the same
    /// kind re-anchors it and a down from any other kind is ignored.
    pub fn pointer_down(&mut self, kind: PointerKind, p: Point) -> bool {
        let Some(pointer) = kind.drag_pointer() else {
            return false;
        };
        if let DragState::Dragging { lock } = self.state {
            if lock != pointer {
                return false;
            }
        }
        self.state = DragState::Dragging { lock: pointer };
        self.selection = Selection::anchored_at(p);
        true
    }

    /// Extend the drag. Returns true when the move belonged to the drag.
    pub fn pointer_move(&mut self, kind: PointerKind, p: Point) -> bool {
        match self.state {
            DragState::Dragging { lock } if lock.matches(kind) => {
                self.selection.end_x = p.x;
                self.selection.end_y = p.y;
                true
            }
            _ => false,
        }
    }

    /// Finish the drag owned by `kind`
    pub fn pointer_up(&mut self, kind: PointerKind, multi_modifier: bool) -> Commit {
        let DragState::Dragging { lock } = self.state else {
            return Commit::Ignored;
        };
        if !lock.matches(kind) {
            return Commit::Ignored;
        }

        let rect = self.selection.normalized();
        self.state = DragState::Idle;
        self.selection.is_selecting = false;

        if rect.width <= MIN_SELECTION_SIZE || rect.height <= MIN_SELECTION_SIZE {
            return Commit::Discarded;
        }

        if multi_modifier {
            self.multi.selections.push(rect);
            self.multi.is_active = true;
            Commit::Appended {
                count: self.multi.selections.len(),
            }
        } else {
            Commit::Single(rect)
        }
    }

    /// Pointer left the surface or the platform cancelled the gesture.
    ///
    /// A drag held by `kind` is dropped without extraction and any
    /// multi-selection is abandoned. Returns true if anything changed.
    pub fn abort(&mut self, kind: PointerKind) -> bool {
        let mut changed = false;
        if let DragState::Dragging { lock } = self.state {
            if lock.matches(kind) {
                self.state = DragState::Idle;
                self.selection.is_selecting = false;
                changed = true;
            }
        }
        if self.multi.is_active {
            self.multi.clear();
            changed = true;
        }
        changed
    }

    /// End the drag held by `kind` without committing anything
    pub fn release(&mut self, kind: PointerKind) -> bool {
        match self.state {
            DragState::Dragging { lock } if lock.matches(kind) => {
                self.state = DragState::Idle;
                self.selection.is_selecting = false;
                true
            }
            _ => false,
        }
    }

    /// Remove one multi-selection rectangle; deactivates when none are left
    pub fn remove_multi(&mut self, index: usize) -> bool {
        if index >= self.multi.selections.len() {
            return false;
        }
        self.multi.selections.remove(index);
        self.multi.is_active = !self.multi.selections.is_empty();
        true
    }

    pub fn clear_multi(&mut self) {
        self.multi.clear();
    }

    /// Drop all drag and multi-selection state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
