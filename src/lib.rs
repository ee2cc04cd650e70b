//! Region-to-snippet extraction and an outline-driven table of contents for
//! rendered PDF pages.
//!
//! [`widget::boxcutter::BoxCutter`] is the interactive component. Everything
//! it needs from a document goes through [`pdf::DocumentBackend`].

pub mod panic_handler;
pub mod pdf;
pub mod settings;
pub mod snippet;
pub mod table_of_contents;
pub mod widget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use snippet::Snippet;
pub use table_of_contents::{TocItem, TocKind};
pub use widget::boxcutter::{BoxCutter, BoxCutterConfig, HostEvent, PointerEvent, ViewStatus};
