//! The interactive selection-and-extraction component
//!
//! All mutation happens on the caller's thread through `&mut self`. Page
//! renders run on the render service's worker and come back through
//! [`BoxCutter::pump_render`] or [`BoxCutter::wait_for_render`]. Work that
//! must not run inside the triggering handler (single-snippet extraction,
//! jumps from the readiness capability) is queued and settled at the end of
//! every entry point; overlay redraws and the readiness announcement wait for
//! [`BoxCutter::on_frame`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use flume::{Receiver, Sender};
use log::{debug, error, info};

use crate::pdf::extract::{extract_combined, extract_single};
use crate::pdf::geometry::Rect;
use crate::pdf::hit_test::HoverTarget;
use crate::pdf::overlay::{OverlayFrame, OverlayInput, RedrawScheduler, compose};
use crate::pdf::readiness::{JumpRequest, PageJumper, ReadinessSignal, ReadyInfo};
use crate::pdf::selection::SelectionMachine;
use crate::pdf::{
    Command, DocumentBackend, DocumentError, DocumentHandle, Effect, PageSurface, RenderResponse,
    RenderService, SessionError, SessionState,
};
use crate::snippet::{Snippet, appended};
use crate::table_of_contents::{TocItem, TocState};

use super::types::{BoxCutterConfig, HostEvent, Panels, ViewStatus};

/// Work deferred to the end of the current entry point
#[derive(Debug)]
pub(super) enum Deferred {
    ExtractSingle { rect: Rect, page: u32, scale: f64 },
}

pub struct BoxCutter<B: DocumentBackend> {
    pub(super) backend: Arc<B>,
    pub(super) config: BoxCutterConfig,

    /// Main-thread handle, used for page count and outline lookups
    pub(super) document: Option<B::Document>,
    pub(super) renderer: Option<RenderService>,
    pub(super) has_document: bool,

    pub(super) session: SessionState,
    /// Surface of the current page at the current scale
    pub(super) surface: Option<Arc<PageSurface>>,

    pub(super) selection: SelectionMachine,
    pub(super) hover: Option<HoverTarget>,

    /// Host-owned lists, last seen values
    pub(super) snippets: Vec<Snippet>,
    pub(super) toc: TocState,

    pub(super) panels: Panels,

    pub(super) overlay: OverlayFrame,
    pub(super) redraw: RedrawScheduler,

    pub(super) readiness: ReadinessSignal,
    jump_tx: Sender<JumpRequest>,
    jump_rx: Receiver<JumpRequest>,

    pub(super) deferred: VecDeque<Deferred>,
    pub(super) events: Vec<HostEvent>,
}

impl<B: DocumentBackend> BoxCutter<B> {
    #[must_use]
    pub fn new(backend: B, config: BoxCutterConfig) -> Self {
        let (jump_tx, jump_rx) = flume::unbounded();
        Self {
            backend: Arc::new(backend),
            session: SessionState::new(config.default_scale),
            config,
            document: None,
            renderer: None,
            has_document: false,
            surface: None,
            selection: SelectionMachine::new(),
            hover: None,
            snippets: Vec::new(),
            toc: TocState::default(),
            panels: Panels::default(),
            overlay: OverlayFrame::default(),
            redraw: RedrawScheduler::default(),
            readiness: ReadinessSignal::new(),
            jump_tx,
            jump_rx,
            deferred: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Supply a new document, or `None` for "no document".
    ///
    /// Always starts a fresh session, even for identical bytes.
    pub fn load_document(&mut self, bytes: Option<Arc<[u8]>>) {
        self.readiness.reset();
        self.renderer = None;
        self.document = None;
        self.has_document = true;
        self.selection.reset();
        self.hover = None;
        self.apply(Command::BeginLoad);

        let result = match &bytes {
            Some(bytes) => self.backend.load(bytes),
            None => Err(DocumentError::Missing),
        };

        match (result, bytes) {
            (Ok(doc), Some(bytes)) => {
                let page_count = doc.page_count();
                info!("Loaded document with {page_count} pages");
                self.document = Some(doc);
                self.renderer = Some(RenderService::spawn(
                    self.backend.clone(),
                    bytes,
                    self.config.render_cache_pages,
                ));
                self.apply(Command::Loaded { page_count });
            }
            (Err(e), _) => {
                error!("Failed to load document: {e}");
                self.apply(Command::LoadFailed(e.to_string()));
            }
            (Ok(_), None) => {
                self.apply(Command::LoadFailed(DocumentError::Missing.to_string()));
            }
        }
        self.settle();
    }

    /// Adopt the host's snippet list as the current truth
    pub fn set_snippets(&mut self, snippets: Vec<Snippet>) {
        self.snippets = snippets;
        if let Some(HoverTarget::Single { id, .. }) = &self.hover {
            if !self.snippets.iter().any(|s| &s.id == id) {
                self.hover = None;
            }
        }
        self.redraw.request();
        self.settle();
    }

    /// Adopt the host's TOC list as the current truth
    pub fn set_toc(&mut self, items: Vec<TocItem>) {
        self.toc.set_from_host(items);
        self.settle();
    }

    pub fn set_show_snippets_collection(&mut self, show: bool) {
        self.panels.set_show_snippets_collection(show);
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.apply(Command::SetScale(scale));
        self.settle();
    }

    /// Apply any page renders that finished. Returns true if the current
    /// page surface changed.
    pub fn pump_render(&mut self) -> bool {
        let responses = match self.renderer.as_mut() {
            Some(renderer) => renderer.poll_responses(),
            None => return false,
        };
        let mut installed = false;
        for response in responses {
            installed |= self.handle_render_response(response);
        }
        self.settle();
        installed
    }

    /// Block until the pending page render finishes or `timeout` elapses.
    /// Returns true if the current page surface changed.
    pub fn wait_for_render(&mut self, timeout: Duration) -> bool {
        let response = match self.renderer.as_mut() {
            Some(renderer) => renderer.wait_response(timeout),
            None => None,
        };
        let installed = response.is_some_and(|r| self.handle_render_response(r));
        self.settle();
        installed
    }

    /// Frame boundary: redraw the overlay if anything changed, then release
    /// a pending readiness announcement
    pub fn on_frame(&mut self) {
        if self.redraw.take() {
            self.overlay = self.compose_overlay();
        }
        if let Some(info) = self.readiness.on_frame() {
            info!(
                "Document ready: {} pages, page {}",
                info.total_pages, info.current_page
            );
            self.events.push(HostEvent::Ready(info));
        }
        self.settle();
    }

    /// Take the notifications queued since the last call
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.session.current_page()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.session.total_pages()
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.session.scale()
    }

    #[must_use]
    pub fn status(&self) -> ViewStatus {
        if let Some(e) = self.session.error() {
            return ViewStatus::Error(e.clone());
        }
        if !self.has_document {
            ViewStatus::Empty
        } else if self.session.is_loading() {
            ViewStatus::Loading
        } else if self.session.total_pages() == 0 {
            ViewStatus::NoPages
        } else if self.surface.is_some() {
            ViewStatus::Page
        } else {
            ViewStatus::Rendering
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&SessionError> {
        self.session.error()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&Arc<PageSurface>> {
        self.surface.as_ref()
    }

    /// Overlay as of the last frame
    #[must_use]
    pub fn overlay(&self) -> &OverlayFrame {
        &self.overlay
    }

    /// Number of overlay redraws so far
    #[must_use]
    pub fn overlay_redraws(&self) -> u64 {
        self.redraw.redraws()
    }

    #[must_use]
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    #[must_use]
    pub fn toc(&self) -> &[TocItem] {
        self.toc.items()
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionMachine {
        &self.selection
    }

    #[must_use]
    pub fn hover(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    #[must_use]
    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    #[must_use]
    pub fn config(&self) -> &BoxCutterConfig {
        &self.config
    }

    pub(super) fn apply(&mut self, cmd: Command) {
        let effects = self.session.apply(cmd);
        self.execute_effects(effects);
    }

    fn execute_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CancelRender => {
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.cancel_in_flight();
                    }
                }

                Effect::ResetSurfaces => {
                    self.surface = None;
                    self.hover = None;
                    self.overlay = OverlayFrame::default();
                }

                Effect::RenderCurrentPage => {
                    let page = self.session.current_page();
                    let scale = self.session.scale();
                    if let Some(renderer) = self.renderer.as_mut() {
                        let id = renderer.request_page(page, scale);
                        debug!("Requested page {page} at scale {scale} ({})", id.0);
                    }
                }

                Effect::NotifyPageChanged(page) => {
                    self.events.push(HostEvent::PageChanged(page));
                }

                Effect::InvalidateOverlay => {
                    self.redraw.request();
                }
            }
        }
    }

    fn handle_render_response(&mut self, response: RenderResponse) -> bool {
        match response {
            RenderResponse::Page { page, surface, .. } => {
                if page != self.session.current_page() {
                    return false;
                }
                self.surface = Some(surface.clone());
                self.redraw.request();

                let total_pages = self.session.total_pages();
                let scale = self.session.scale();
                let jump_tx = self.jump_tx.clone();
                self.readiness.page_rendered(|generation| ReadyInfo {
                    total_pages,
                    current_page: page,
                    scale,
                    width: surface.width(),
                    height: surface.height(),
                    surface,
                    jump: PageJumper::new(jump_tx, generation),
                });
                true
            }

            RenderResponse::Cancelled(id) => {
                debug!("Render {} cancelled", id.0);
                false
            }

            RenderResponse::Error { page, error, .. } => {
                error!("Failed to render page {page}: {error}");
                self.apply(Command::RenderFailed {
                    page,
                    detail: error.to_string(),
                });
                false
            }
        }
    }

    fn compose_overlay(&self) -> OverlayFrame {
        let (width, height) = self
            .surface
            .as_ref()
            .map_or((0, 0), |s| (s.width(), s.height()));
        compose(&OverlayInput {
            width,
            height,
            snippets: &self.snippets,
            page_number: self.session.current_page(),
            scale: self.session.scale(),
            selection: self.selection.selection(),
            multi: self.selection.multi(),
            hover: self.hover.as_ref(),
        })
    }

    /// Run deferred work and forward local list changes to the host
    pub(super) fn settle(&mut self) {
        while let Ok(request) = self.jump_rx.try_recv() {
            if request.generation == self.readiness.generation() {
                self.apply(Command::JumpToPage(request.page));
            } else {
                debug!("Ignoring jump to page {} from an older document", request.page);
            }
        }

        while let Some(task) = self.deferred.pop_front() {
            match task {
                Deferred::ExtractSingle { rect, page, scale } => {
                    self.extract_single_now(&rect, page, scale);
                }
            }
        }

        if let Some(items) = self.toc.take_changes() {
            self.events.push(HostEvent::TocChanged(items));
        }
    }

    fn extract_single_now(&mut self, rect: &Rect, page: u32, scale: f64) {
        let surface = self.surface.as_deref().filter(|s| s.page_number == page);
        match extract_single(surface, rect, page, scale) {
            Ok(Some(snippet)) => {
                debug!("Extracted snippet {} on page {page}", snippet.id);
                self.publish_snippets(appended(&self.snippets, snippet));
            }
            Ok(None) => {}
            Err(e) => error!("Snippet extraction failed: {e}"),
        }
    }

    /// Union extraction of the accumulated multi-selection
    pub(super) fn extract_combined_now(&mut self) {
        let page = self.session.current_page();
        let scale = self.session.scale();
        let surface = self.surface.as_deref().filter(|s| s.page_number == page);
        let result = extract_combined(
            surface,
            &self.selection.multi().selections,
            page,
            scale,
            self.config.snippet_background,
        );
        match result {
            Ok(Some(snippet)) => {
                debug!("Extracted combined snippet {} on page {page}", snippet.id);
                self.selection.clear_multi();
                if matches!(self.hover, Some(HoverTarget::Multi { .. })) {
                    self.hover = None;
                }
                self.publish_snippets(appended(&self.snippets, snippet));
            }
            Ok(None) => {}
            Err(e) => error!("Combined snippet extraction failed: {e}"),
        }
    }

    /// Adopt `snippets` locally and hand the whole list to the host
    pub(super) fn publish_snippets(&mut self, snippets: Vec<Snippet>) {
        self.snippets = snippets.clone();
        self.events.push(HostEvent::SnippetsChanged(snippets));
        self.redraw.request();
    }
}
