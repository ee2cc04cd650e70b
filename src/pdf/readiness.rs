//! One-shot "document ready" announcement
//!
//! The flag is cleared when a load starts and set by the first successful
//! page render of that load. The snapshot is held until the next frame
//! boundary so the host only sees it once the page has been painted.

use std::sync::Arc;

use flume::Sender;
use log::debug;

use super::backend::PageSurface;
use super::page_sync::parse_page_request;

/// Page jump queued by a [`PageJumper`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JumpRequest {
    /// Load generation the jumper was issued for
    pub generation: u64,
    pub page: i64,
}

/// Jump capability handed to the host with the readiness snapshot.
///
/// The request is applied by the component on its next entry point, using
/// the usual clamping rule. Jumps issued for an older document are dropped.
#[derive(Clone, Debug)]
pub struct PageJumper {
    tx: Sender<JumpRequest>,
    generation: u64,
}

impl PageJumper {
    #[must_use]
    pub fn new(tx: Sender<JumpRequest>, generation: u64) -> Self {
        Self { tx, generation }
    }

    /// Returns false if the component is gone
    pub fn jump_to(&self, page: i64) -> bool {
        self.tx
            .send(JumpRequest {
                generation: self.generation,
                page,
            })
            .is_ok()
    }

    /// Like [`Self::jump_to`], unparsable input means page 1
    pub fn jump_to_str(&self, page: &str) -> bool {
        self.jump_to(parse_page_request(page))
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Snapshot handed to the host when a document becomes ready
#[derive(Clone, Debug)]
pub struct ReadyInfo {
    pub total_pages: usize,
    pub current_page: u32,
    pub scale: f64,
    /// Rendered surface size in pixels
    pub width: u32,
    pub height: u32,
    pub surface: Arc<PageSurface>,
    pub jump: PageJumper,
}

#[derive(Debug, Default)]
pub struct ReadinessSignal {
    generation: u64,
    announced: bool,
    pending: Option<ReadyInfo>,
}

impl ReadinessSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load. Drops any announcement not yet delivered.
    pub fn reset(&mut self) -> u64 {
        self.generation += 1;
        self.announced = false;
        if self.pending.take().is_some() {
            debug!("Dropping stale readiness announcement");
        }
        self.generation
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record a successful render. Only the first one per load is kept;
    /// `snapshot` is not called for later renders.
    pub fn page_rendered(&mut self, snapshot: impl FnOnce(u64) -> ReadyInfo) {
        if self.announced {
            return;
        }
        self.announced = true;
        self.pending = Some(snapshot(self.generation));
    }

    /// Frame boundary: release the pending announcement, if any
    pub fn on_frame(&mut self) -> Option<ReadyInfo> {
        self.pending.take()
    }
}
