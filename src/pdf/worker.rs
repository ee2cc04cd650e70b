//! Page render worker - runs in a separate thread

use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use log::{debug, error};

use super::backend::{CancelToken, DocumentBackend, DocumentHandle, RenderError};
use super::cache::{CacheKey, PageCache};
use super::request::{RenderRequest, RenderResponse, RequestId};

/// Main worker function - runs in a dedicated thread
#[expect(
    clippy::needless_pass_by_value,
    reason = "Values moved into thread, need ownership"
)]
pub fn render_worker<B: DocumentBackend>(
    backend: Arc<B>,
    bytes: Arc<[u8]>,
    requests: Receiver<RenderRequest>,
    responses: Sender<RenderResponse>,
    cache: Arc<Mutex<PageCache>>,
) {
    let doc = match backend.load(&bytes) {
        Ok(d) => Some(d),
        Err(e) => {
            error!("Render worker failed to load document: {e}");
            None
        }
    };

    for request in requests {
        match request {
            RenderRequest::Page {
                id,
                page,
                scale,
                cancel,
            } => {
                let response = match &doc {
                    Some(doc) => handle_page_request(doc, id, page, scale, &cancel, &cache),
                    None => RenderResponse::Error {
                        id,
                        page,
                        error: RenderError::failed("document is not loaded"),
                    },
                };
                let _ = responses.send(response);
            }

            RenderRequest::Shutdown => break,
        }
    }
    debug!("Render worker stopped");
}

fn handle_page_request<D: DocumentHandle>(
    doc: &D,
    id: RequestId,
    page: u32,
    scale: f64,
    cancel: &CancelToken,
    cache: &Arc<Mutex<PageCache>>,
) -> RenderResponse {
    if cancel.is_cancelled() {
        return RenderResponse::Cancelled(id);
    }

    let key = CacheKey::new(page, scale);
    let cached = cache
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get(&key);
    if let Some(surface) = cached {
        return RenderResponse::Page { id, page, surface };
    }

    let index = (page as usize).saturating_sub(1);
    match doc.render_page(index, scale, cancel) {
        Ok(surface) => {
            let surface = cache
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(key, surface);
            // Finished, but no longer wanted
            if cancel.is_cancelled() {
                return RenderResponse::Cancelled(id);
            }
            RenderResponse::Page { id, page, surface }
        }
        Err(RenderError::Cancelled) => RenderResponse::Cancelled(id),
        Err(error) => RenderResponse::Error { id, page, error },
    }
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use super::*;
    use crate::pdf::backend::{
        DestItem, DocumentError, OutlineNode, PageRef, PageSurface,
    };

    struct Blank;

    impl DocumentHandle for Blank {
        fn page_count(&self) -> usize {
            2
        }

        fn render_page(
            &self,
            index: usize,
            scale: f64,
            cancel: &CancelToken,
        ) -> Result<PageSurface, RenderError> {
            cancel.check()?;
            if index >= 2 {
                return Err(DocumentError::PageOutOfRange {
                    page: index,
                    count: 2,
                }
                .into());
            }
            Ok(PageSurface::new(index as u32 + 1, scale, RgbaImage::new(3, 3)))
        }

        fn outline(&self) -> Result<Option<Vec<OutlineNode>>, DocumentError> {
            Ok(None)
        }

        fn destination(&self, _: &str) -> Result<Option<Vec<DestItem>>, DocumentError> {
            Ok(None)
        }

        fn page_index(&self, _: PageRef) -> Result<usize, DocumentError> {
            Ok(0)
        }
    }

    fn cache() -> Arc<Mutex<PageCache>> {
        Arc::new(Mutex::new(PageCache::new(4)))
    }

    #[test]
    fn renders_and_caches() {
        let cache = cache();
        let token = CancelToken::new();
        let response = handle_page_request(&Blank, RequestId::new(1), 2, 1.0, &token, &cache);
        assert!(matches!(response, RenderResponse::Page { page: 2, .. }));
        assert!(
            cache
                .lock()
                .unwrap()
                .contains(&CacheKey::new(2, 1.0))
        );
    }

    #[test]
    fn cancelled_request_is_not_an_error() {
        let token = CancelToken::new();
        token.cancel();
        let response = handle_page_request(&Blank, RequestId::new(5), 1, 1.0, &token, &cache());
        assert!(matches!(response, RenderResponse::Cancelled(RequestId(5))));
    }

    #[test]
    fn failures_are_reported_with_their_page() {
        let token = CancelToken::new();
        let response = handle_page_request(&Blank, RequestId::new(2), 9, 1.0, &token, &cache());
        assert!(matches!(
            response,
            RenderResponse::Error {
                page: 9,
                error: RenderError::Failed(_),
                ..
            }
        ));
    }
}
