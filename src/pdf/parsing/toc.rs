//! Outline resolution: native bookmark tree to flat TOC.
//!
//! Each node's destination is resolved to a page independently. A node that
//! cannot be resolved is logged and dropped; it never stops its siblings or
//! other branches. Children are visited only while the depth budget lasts.

use log::{debug, warn};

use crate::pdf::backend::{
    DestItem, Destination, DocumentError, DocumentHandle, OutlineNode, PageRef,
};
use crate::table_of_contents::TocItem;

/// Why a single outline node has no page
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    #[error("node has no destination")]
    NoDestination,

    #[error("named destination {0:?} does not exist")]
    UnknownName(String),

    #[error("destination does not start with a page reference")]
    NotAPageReference,

    #[error(transparent)]
    Lookup(#[from] DocumentError),
}

/// A node after destination lookup, before flattening
#[derive(Debug)]
struct ResolvedNode {
    title: String,
    page: Result<u32, OutlineError>,
    children: Vec<ResolvedNode>,
}

/// Resolve the document outline into TOC items.
///
/// `max_depth` counts levels: 1 keeps top-level nodes only. Returns `Ok(None)`
/// when the document has no outline at all.
pub fn resolve_outline<D: DocumentHandle + ?Sized>(
    doc: &D,
    max_depth: usize,
) -> Result<Option<Vec<TocItem>>, DocumentError> {
    let Some(outline) = doc.outline()? else {
        return Ok(None);
    };

    let resolved: Vec<ResolvedNode> = outline
        .iter()
        .map(|node| resolve_node(doc, node, 1, max_depth))
        .collect();

    let mut items = Vec::new();
    flatten(resolved, &mut items);
    Ok(Some(items))
}

fn resolve_node<D: DocumentHandle + ?Sized>(
    doc: &D,
    node: &OutlineNode,
    depth: usize,
    max_depth: usize,
) -> ResolvedNode {
    let page = resolve_page(doc, node.dest.as_ref());
    match &page {
        Err(OutlineError::NoDestination) => {
            debug!("Outline entry {:?} has no destination", node.title);
        }
        Err(e) => warn!("Failed to resolve outline entry {:?}: {e}", node.title),
        Ok(_) => {}
    }

    let children = if depth < max_depth {
        node.items
            .iter()
            .map(|child| resolve_node(doc, child, depth + 1, max_depth))
            .collect()
    } else {
        Vec::new()
    };

    ResolvedNode {
        title: node.title.clone(),
        page,
        children,
    }
}

fn resolve_page<D: DocumentHandle + ?Sized>(
    doc: &D,
    dest: Option<&Destination>,
) -> Result<u32, OutlineError> {
    let explicit = match dest.ok_or(OutlineError::NoDestination)? {
        Destination::Explicit(items) => items.clone(),
        Destination::Named(name) => doc
            .destination(name)?
            .ok_or_else(|| OutlineError::UnknownName(name.clone()))?,
    };

    let page_ref = first_page_ref(&explicit).ok_or(OutlineError::NotAPageReference)?;
    let index = doc.page_index(page_ref)?;
    Ok(index as u32 + 1)
}

fn first_page_ref(items: &[DestItem]) -> Option<PageRef> {
    match items.first()? {
        DestItem::Ref(r) => Some(*r),
        _ => None,
    }
}

/// Pre-order walk: a node comes before its children
fn flatten(nodes: Vec<ResolvedNode>, out: &mut Vec<TocItem>) {
    for node in nodes {
        if let Ok(page) = node.page {
            out.push(TocItem::bookmark(page, node.title));
        }
        flatten(node.children, out);
    }
}
