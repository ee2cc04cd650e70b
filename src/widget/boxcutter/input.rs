//! Pointer and keyboard handling

use log::debug;

use crate::pdf::DocumentBackend;
use crate::pdf::hit_test::{HoverTarget, hit_test};
use crate::pdf::selection::Commit;
use crate::snippet::without_id;

use super::state::{BoxCutter, Deferred};
use super::types::PointerEvent;

impl<B: DocumentBackend> BoxCutter<B> {
    pub fn pointer_down(&mut self, ev: &PointerEvent) {
        if self.selection.pointer_down(ev.kind, ev.surface_point()) {
            self.redraw.request();
        }
        self.settle();
    }

    pub fn pointer_move(&mut self, ev: &PointerEvent) {
        let p = ev.surface_point();
        if self.selection.pointer_move(ev.kind, p) {
            self.redraw.request();
        } else {
            let hover = hit_test(
                p,
                &self.selection.multi().selections,
                &self.snippets,
                self.session.current_page(),
                self.session.scale(),
            );
            if hover != self.hover {
                self.hover = hover;
                self.redraw.request();
            }
        }
        self.settle();
    }

    pub fn pointer_up(&mut self, ev: &PointerEvent) {
        let p = ev.surface_point();

        let on_delete = self
            .hover
            .as_ref()
            .is_some_and(|hover| hover.hits_delete_button(p));
        if on_delete {
            self.selection.release(ev.kind);
            if let Some(target) = self.hover.take() {
                self.delete_hover_target(target);
            }
            self.redraw.request();
            self.settle();
            return;
        }

        match self.selection.pointer_up(ev.kind, ev.shift) {
            Commit::Ignored => {}
            Commit::Discarded => {
                debug!("Selection below noise threshold, discarded");
                self.redraw.request();
            }
            Commit::Appended { count } => {
                debug!("Multi-selection now has {count} rectangles");
                self.redraw.request();
            }
            Commit::Single(rect) => {
                self.deferred.push_back(Deferred::ExtractSingle {
                    rect,
                    page: self.session.current_page(),
                    scale: self.session.scale(),
                });
                self.redraw.request();
            }
        }
        self.settle();
    }

    /// Pointer left the surface
    pub fn pointer_leave(&mut self, ev: &PointerEvent) {
        self.selection.abort(ev.kind);
        self.hover = None;
        self.redraw.request();
        self.settle();
    }

    /// The platform cancelled the gesture
    pub fn pointer_cancel(&mut self, ev: &PointerEvent) {
        self.selection.abort(ev.kind);
        self.hover = None;
        self.redraw.request();
        self.settle();
    }

    /// Any key release commits a pending multi-selection
    pub fn key_up(&mut self) {
        if self.selection.multi().has_selections() {
            self.extract_combined_now();
        }
        self.settle();
    }

    fn delete_hover_target(&mut self, target: HoverTarget) {
        match target {
            HoverTarget::Single { id, .. } => {
                if let Some(next) = without_id(&self.snippets, &id) {
                    debug!("Deleting snippet {id}");
                    self.publish_snippets(next);
                }
            }
            HoverTarget::Multi { index, .. } => {
                debug!("Deleting multi-selection rectangle {index}");
                self.selection.remove_multi(index);
            }
        }
    }
}
