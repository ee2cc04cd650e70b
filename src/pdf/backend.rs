//! Document collaborator seam
//!
//! The engine never decodes documents itself. A [`DocumentBackend`] turns
//! bytes into a [`DocumentHandle`], which can report its page count, render a
//! page to an RGBA surface, and expose its native outline tree.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;

/// Errors from the document collaborator
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("no document supplied")]
    Missing,

    #[error("failed to decode document: {0}")]
    Decode(String),

    #[error("page index {page} out of range for {count} pages")]
    PageOutOfRange { page: usize, count: usize },

    #[error("lookup failed: {0}")]
    Lookup(String),

    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),
}

/// Errors from a single page render
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The render was no longer wanted. Expected, never shown to the user.
    #[error("render cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(String),
}

impl RenderError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

impl From<DocumentError> for RenderError {
    fn from(e: DocumentError) -> Self {
        Self::Failed(e.to_string())
    }
}

/// Shared flag deciding whether a render result is still wanted
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Safe to call any number of times, including after completion
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once cancelled, for use with `?` between render steps
    pub fn check(&self) -> Result<(), RenderError> {
        if self.is_cancelled() {
            Err(RenderError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A rendered page raster at a given scale
#[derive(Clone, Debug)]
pub struct PageSurface {
    /// 1-based page number
    pub page_number: u32,
    pub scale: f64,
    pub image: RgbaImage,
}

impl PageSurface {
    #[must_use]
    pub fn new(page_number: u32, scale: f64, image: RgbaImage) -> Self {
        Self {
            page_number,
            scale,
            image,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Indirect reference to a page object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageRef {
    pub num: u32,
    pub generation: u32,
}

impl PageRef {
    #[must_use]
    pub const fn new(num: u32, generation: u32) -> Self {
        Self { num, generation }
    }
}

/// One element of an explicit destination array
#[derive(Clone, Debug, PartialEq)]
pub enum DestItem {
    Ref(PageRef),
    Name(String),
    Number(f64),
    Null,
}

/// Where an outline node points
#[derive(Clone, Debug, PartialEq)]
pub enum Destination {
    /// Explicit destination array; the first element names the page
    Explicit(Vec<DestItem>),
    /// Named destination, resolved through [`DocumentHandle::destination`]
    Named(String),
}

/// A node of the document's native outline tree
#[derive(Clone, Debug, PartialEq)]
pub struct OutlineNode {
    pub title: String,
    pub dest: Option<Destination>,
    pub items: Vec<OutlineNode>,
}

impl OutlineNode {
    #[must_use]
    pub fn new(title: impl Into<String>, dest: Option<Destination>) -> Self {
        Self {
            title: title.into(),
            dest,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<OutlineNode>) -> Self {
        self.items = items;
        self
    }
}

/// Turns raw bytes into documents. Shared with the render worker thread.
pub trait DocumentBackend: Send + Sync + 'static {
    type Document: DocumentHandle;

    fn load(&self, bytes: &[u8]) -> Result<Self::Document, DocumentError>;
}

/// A loaded document
pub trait DocumentHandle {
    fn page_count(&self) -> usize;

    /// Render page `index` (0-based) at `scale`.
    ///
    /// Implementations should check `cancel` between expensive steps and
    /// return [`RenderError::Cancelled`] once it is set.
    fn render_page(
        &self,
        index: usize,
        scale: f64,
        cancel: &CancelToken,
    ) -> Result<PageSurface, RenderError>;

    /// Native outline tree, `None` when the document has none
    fn outline(&self) -> Result<Option<Vec<OutlineNode>>, DocumentError>;

    /// Explicit destination array behind a named destination
    fn destination(&self, name: &str) -> Result<Option<Vec<DestItem>>, DocumentError>;

    /// 0-based page index of a page reference
    fn page_index(&self, page_ref: PageRef) -> Result<usize, DocumentError>;
}
