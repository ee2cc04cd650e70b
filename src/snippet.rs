//! Snippet records and their image payload
//!
//! A snippet is owned by the host. The component never edits a list in
//! place; every change produces a whole new list for the host to adopt.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::pdf::geometry::Rect;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A page-anchored rectangular raster extract, geometry in document space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    /// 1-based page number
    pub page_number: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// PNG bytes; serialized as a data URL
    #[serde(with = "png_data_url")]
    pub image: Vec<u8>,
}

impl Snippet {
    #[must_use]
    pub fn new(page_number: u32, bounds: Rect, image: Vec<u8>) -> Self {
        Self {
            id: new_id(),
            page_number,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            image,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// `data:image/png;base64,...` form of the image
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(&self.image))
    }
}

/// Fresh opaque identifier for snippets and TOC entries
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Encode an RGBA raster as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// `snippets` with `snippet` appended
#[must_use]
pub fn appended(snippets: &[Snippet], snippet: Snippet) -> Vec<Snippet> {
    let mut next = Vec::with_capacity(snippets.len() + 1);
    next.extend_from_slice(snippets);
    next.push(snippet);
    next
}

/// `snippets` without the entry carrying `id`, or `None` if absent
#[must_use]
pub fn without_id(snippets: &[Snippet], id: &str) -> Option<Vec<Snippet>> {
    let index = snippets.iter().position(|s| s.id == id)?;
    without_index(snippets, index)
}

/// `snippets` without the entry at `index`, or `None` if out of range
#[must_use]
pub fn without_index(snippets: &[Snippet], index: usize) -> Option<Vec<Snippet>> {
    if index >= snippets.len() {
        return None;
    }
    let mut next = snippets.to_vec();
    next.remove(index);
    Some(next)
}

mod png_data_url {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::PNG_DATA_URL_PREFIX;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let payload = raw.strip_prefix(PNG_DATA_URL_PREFIX).unwrap_or(&raw);
        STANDARD.decode(payload).map_err(D::Error::custom)
    }
}
