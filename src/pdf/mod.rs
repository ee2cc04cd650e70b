//! Selection-and-extraction engine

mod backend;
mod cache;
pub mod extract;
pub mod geometry;
pub mod hit_test;
#[cfg(feature = "pdf")]
mod mupdf_backend;
pub mod overlay;
pub mod page_sync;
pub mod parsing;
pub mod readiness;
mod request;
pub mod selection;
mod service;
mod state;
mod worker;

pub use backend::{
    CancelToken, DestItem, Destination, DocumentBackend, DocumentError, DocumentHandle,
    OutlineNode, PageRef, PageSurface, RenderError,
};
pub use cache::{CacheKey, PageCache};
#[cfg(feature = "pdf")]
pub use mupdf_backend::{MupdfBackend, MupdfDocument};
pub use parsing::toc::{OutlineError, resolve_outline};
pub use request::{RenderRequest, RenderResponse, RequestId};
pub use service::RenderService;
pub use state::{Command, Effect, MIN_SCALE, SessionError, SessionState, clamp_scale};
