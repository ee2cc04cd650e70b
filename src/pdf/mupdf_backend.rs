//! MuPDF-backed document collaborator

use image::RgbaImage;
use mupdf::{Colorspace, Document, Matrix, Outline, Pixmap};

use super::backend::{
    CancelToken, DestItem, Destination, DocumentBackend, DocumentError, DocumentHandle,
    OutlineNode, PageRef, PageSurface, RenderError,
};

const PDF_MAGIC: &str = "application/pdf";

/// Decodes PDF bytes with MuPDF
#[derive(Clone, Copy, Debug, Default)]
pub struct MupdfBackend;

impl DocumentBackend for MupdfBackend {
    type Document = MupdfDocument;

    fn load(&self, bytes: &[u8]) -> Result<Self::Document, DocumentError> {
        if bytes.is_empty() {
            return Err(DocumentError::Missing);
        }
        let doc = Document::from_bytes(bytes, PDF_MAGIC)?;
        let page_count = doc.page_count()?.max(0) as usize;
        Ok(MupdfDocument { doc, page_count })
    }
}

pub struct MupdfDocument {
    doc: Document,
    page_count: usize,
}

impl DocumentHandle for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(
        &self,
        index: usize,
        scale: f64,
        cancel: &CancelToken,
    ) -> Result<PageSurface, RenderError> {
        if index >= self.page_count {
            return Err(DocumentError::PageOutOfRange {
                page: index,
                count: self.page_count,
            }
            .into());
        }
        cancel.check()?;

        let page = self.doc.load_page(index as i32).map_err(engine_fault)?;
        let transform = Matrix::new_scale(scale as f32, scale as f32);
        let rgb = Colorspace::device_rgb();
        cancel.check()?;

        let pixmap = page
            .to_pixmap(&transform, &rgb, false, false)
            .map_err(engine_fault)?;
        cancel.check()?;

        let image = pixmap_to_rgba(&pixmap)?;
        Ok(PageSurface::new(index as u32 + 1, scale, image))
    }

    fn outline(&self) -> Result<Option<Vec<OutlineNode>>, DocumentError> {
        let outlines = self.doc.outlines()?;
        if outlines.is_empty() {
            return Ok(None);
        }
        Ok(Some(outlines.iter().map(convert_outline).collect()))
    }

    fn destination(&self, _name: &str) -> Result<Option<Vec<DestItem>>, DocumentError> {
        // MuPDF resolves named destinations while reading the outline, so a
        // name that reaches this point has no target.
        Ok(None)
    }

    fn page_index(&self, page_ref: PageRef) -> Result<usize, DocumentError> {
        let index = page_ref.num as usize;
        if index >= self.page_count {
            return Err(DocumentError::Lookup(format!(
                "page reference {} beyond {} pages",
                page_ref.num, self.page_count
            )));
        }
        Ok(index)
    }
}

/// MuPDF hands out resolved locations: the reference carries the page index
fn convert_outline(outline: &Outline) -> OutlineNode {
    let dest = match (outline.dest, outline.uri.as_deref()) {
        (Some(dest), _) => Some(Destination::Explicit(vec![DestItem::Ref(PageRef::new(
            dest.loc.page_number as u32,
            0,
        ))])),
        (None, Some(uri)) => uri.strip_prefix('#').map(|name| {
            Destination::Named(name.trim_start_matches("nameddest=").to_string())
        }),
        (None, None) => None,
    };

    OutlineNode::new(outline.title.trim(), dest)
        .with_items(outline.down.iter().map(convert_outline).collect())
}

fn engine_fault(e: mupdf::error::Error) -> RenderError {
    RenderError::failed(format!("PDF engine: {e}"))
}

fn pixmap_to_rgba(pixmap: &Pixmap) -> Result<RgbaImage, RenderError> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(RenderError::failed(format!(
            "Unsupported pixmap format: {n} channels"
        )));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let stride = pixmap.stride() as usize;
    let samples = pixmap.samples();
    let row_bytes = width * n;
    let expected_min = stride.saturating_mul(height);
    if samples.len() < expected_min || row_bytes > stride {
        return Err(RenderError::failed("Pixmap buffer size mismatch"));
    }

    let mut out = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row_start = y * stride;
        let row = &samples[row_start..row_start + row_bytes];
        for px in row.chunks_exact(n) {
            out.extend_from_slice(&px[..3]);
            out.push(if n >= 4 { px[3] } else { u8::MAX });
        }
    }

    RgbaImage::from_raw(pixmap.width(), pixmap.height(), out)
        .ok_or_else(|| RenderError::failed("Pixmap size does not match its samples"))
}
