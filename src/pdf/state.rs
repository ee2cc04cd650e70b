//! Document session state management

use super::page_sync::{PageSource, PageSync};

/// Smallest scale a page is rendered at
pub const MIN_SCALE: f64 = 0.1;

/// Errors shown to the user in place of the page
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("failed to load document: {0}")]
    Load(String),

    #[error("failed to render page {page}: {detail}")]
    Render { page: u32, detail: String },
}

/// Clamp a requested scale; non-finite input falls back to `default`
#[must_use]
pub fn clamp_scale(scale: f64, default: f64) -> f64 {
    let scale = if scale.is_finite() { scale } else { default };
    scale.max(MIN_SCALE)
}

/// State of the one loaded document
#[derive(Debug)]
pub struct SessionState {
    page: PageSync,

    /// Render scale, surface pixels per document unit
    scale: f64,
    default_scale: f64,

    loading: bool,
    error: Option<SessionError>,
}

impl SessionState {
    #[must_use]
    pub fn new(default_scale: f64) -> Self {
        let default_scale = clamp_scale(default_scale, 1.0);
        Self {
            page: PageSync::new(),
            scale: default_scale,
            default_scale,
            loading: false,
            error: None,
        }
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.page.current()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.page.total_pages()
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// Whether the current page can be rendered right now
    #[must_use]
    pub fn can_render(&self) -> bool {
        !self.loading
            && !matches!(self.error, Some(SessionError::Load(_)))
            && self.page.total_pages() > 0
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::BeginLoad => {
                self.loading = true;
                self.error = None;
                self.scale = self.default_scale;
                self.page.unload();
                vec![
                    Effect::CancelRender,
                    Effect::ResetSurfaces,
                    Effect::InvalidateOverlay,
                ]
            }

            Command::Loaded { page_count } => {
                self.loading = false;
                let changed = self.page.reset(page_count);
                let mut effects = vec![Effect::InvalidateOverlay];
                if self.can_render() {
                    effects.push(Effect::RenderCurrentPage);
                }
                if let Some(page) = changed {
                    effects.push(Effect::NotifyPageChanged(page));
                }
                effects
            }

            Command::LoadFailed(detail) => {
                self.loading = false;
                self.page.unload();
                self.error = Some(SessionError::Load(detail));
                vec![
                    Effect::CancelRender,
                    Effect::ResetSurfaces,
                    Effect::InvalidateOverlay,
                ]
            }

            Command::SetScale(scale) => {
                let clamped = clamp_scale(scale, self.default_scale);
                if (self.scale - clamped).abs() > f64::EPSILON {
                    self.scale = clamped;
                    self.rerender()
                } else {
                    vec![]
                }
            }

            Command::SyncPage(source) => {
                let changed = self.page.sync(source);
                self.page_changed(changed)
            }

            Command::NextPage => {
                let changed = self.page.next();
                self.page_changed(changed)
            }

            Command::PreviousPage => {
                let changed = self.page.previous();
                self.page_changed(changed)
            }

            Command::JumpToPage(target) => {
                let changed = self.page.jump(target);
                self.page_changed(changed)
            }

            Command::RenderFailed { page, detail } => {
                if page == self.page.current() {
                    self.error = Some(SessionError::Render { page, detail });
                    vec![Effect::ResetSurfaces, Effect::InvalidateOverlay]
                } else {
                    vec![]
                }
            }
        }
    }

    fn page_changed(&mut self, changed: Option<u32>) -> Vec<Effect> {
        let Some(page) = changed else {
            return vec![];
        };
        // A render error is scoped to the page it happened on
        if matches!(self.error, Some(SessionError::Render { .. })) {
            self.error = None;
        }
        let mut effects = self.rerender();
        effects.push(Effect::NotifyPageChanged(page));
        effects
    }

    fn rerender(&self) -> Vec<Effect> {
        let mut effects = vec![
            Effect::CancelRender,
            Effect::ResetSurfaces,
            Effect::InvalidateOverlay,
        ];
        if self.can_render() {
            effects.push(Effect::RenderCurrentPage);
        }
        effects
    }
}

/// Commands that modify session state
#[derive(Clone, Debug)]
pub enum Command {
    /// A new document reference was supplied
    BeginLoad,
    /// The document decoded successfully
    Loaded { page_count: usize },
    /// No bytes, or the backend rejected them
    LoadFailed(String),
    /// Set the render scale
    SetScale(f64),
    /// Reconcile against the host's page value
    SyncPage(PageSource),
    NextPage,
    PreviousPage,
    /// Jump to a page, clamped into range
    JumpToPage(i64),
    /// A page render failed for a reason other than cancellation
    RenderFailed { page: u32, detail: String },
}

/// Effects produced by state changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Cancel the in-flight page render
    CancelRender,
    /// Drop the page and overlay surfaces
    ResetSurfaces,
    /// Render the current page at the current scale
    RenderCurrentPage,
    /// Tell the host the current page changed
    NotifyPageChanged(u32),
    /// Schedule an overlay redraw
    InvalidateOverlay,
}
