//! Snippet rasterization
//!
//! Single selections copy one window of the rendered page. Combined
//! selections build a bounding-box composite: the union's bounding box is
//! filled with an opaque background and each rectangle is blitted at its
//! offset, in accumulation order, so later rectangles overpaint earlier ones.
//! Parts of a window outside the page surface stay transparent.

use image::{Rgba, RgbaImage, imageops};
use log::debug;

use super::backend::PageSurface;
use super::geometry::{PixelRect, Rect};
use crate::snippet::{Snippet, encode_png};

/// Background of combined snippets
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to encode snippet: {0}")]
    Encode(#[from] image::ImageError),
}

/// Extract one surface-space rectangle from the page.
///
/// Returns `Ok(None)` when there is no surface or the rectangle covers no
/// whole pixel.
pub fn extract_single(
    surface: Option<&PageSurface>,
    selection: &Rect,
    page_number: u32,
    scale: f64,
) -> Result<Option<Snippet>, ExtractError> {
    let Some(surface) = surface else {
        debug!("No page surface, skipping extraction");
        return Ok(None);
    };
    let window = PixelRect::from_surface(selection);
    if window.is_empty() {
        return Ok(None);
    }

    let mut target = RgbaImage::new(window.width, window.height);
    blit(&surface.image, &window, &mut target, 0, 0);

    let png = encode_png(&target)?;
    Ok(Some(Snippet::new(
        page_number,
        selection.to_document_space(scale),
        png,
    )))
}

/// Extract the bounding-box composite of several surface-space rectangles.
///
/// Returns `Ok(None)` when `selections` is empty or there is no surface.
pub fn extract_combined(
    surface: Option<&PageSurface>,
    selections: &[Rect],
    page_number: u32,
    scale: f64,
    background: Rgba<u8>,
) -> Result<Option<Snippet>, ExtractError> {
    let Some(surface) = surface else {
        debug!("No page surface, skipping combined extraction");
        return Ok(None);
    };
    let Some(bounds) = Rect::bounding(selections) else {
        return Ok(None);
    };

    let frame = PixelRect::from_surface(&bounds);
    if frame.is_empty() {
        return Ok(None);
    }
    let mut target = RgbaImage::from_pixel(frame.width, frame.height, background);

    for rect in selections {
        let window = PixelRect::from_surface(rect);
        blit(
            &surface.image,
            &window,
            &mut target,
            window.x - frame.x,
            window.y - frame.y,
        );
    }

    let png = encode_png(&target)?;
    Ok(Some(Snippet::new(
        page_number,
        bounds.to_document_space(scale),
        png,
    )))
}

/// Copy the on-surface part of `window` into `target` at `(dx, dy)`
fn blit(source: &RgbaImage, window: &PixelRect, target: &mut RgbaImage, dx: i64, dy: i64) {
    let Some(visible) = window.clip_to(source.width(), source.height()) else {
        return;
    };
    let patch = imageops::crop_imm(
        source,
        visible.x as u32,
        visible.y as u32,
        visible.width,
        visible.height,
    )
    .to_image();
    imageops::replace(
        target,
        &patch,
        dx + (visible.x - window.x),
        dy + (visible.y - window.y),
    );
}
