//! Render request and response types

use std::sync::Arc;

use super::backend::{CancelToken, PageSurface, RenderError};

/// Unique identifier for render requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Request sent to the render worker
#[derive(Debug)]
pub enum RenderRequest {
    /// Render a page (1-based) at a scale
    Page {
        id: RequestId,
        page: u32,
        scale: f64,
        cancel: CancelToken,
    },

    /// Shutdown the worker
    Shutdown,
}

/// Response from the render worker
#[derive(Debug)]
pub enum RenderResponse {
    /// Rendered page surface
    Page {
        id: RequestId,
        page: u32,
        surface: Arc<PageSurface>,
    },

    /// Request was cancelled before or during rendering
    Cancelled(RequestId),

    /// Error during rendering
    Error {
        id: RequestId,
        page: u32,
        error: RenderError,
    },
}

impl RenderResponse {
    #[must_use]
    pub fn id(&self) -> RequestId {
        match self {
            Self::Page { id, .. } | Self::Error { id, .. } => *id,
            Self::Cancelled(id) => *id,
        }
    }
}
