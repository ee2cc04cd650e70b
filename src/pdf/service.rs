//! Render service - owns the worker thread and the page cache

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use flume::{Receiver, RecvTimeoutError, Sender};
use log::debug;

use super::backend::{CancelToken, DocumentBackend};
use super::cache::PageCache;
use super::request::{RenderRequest, RenderResponse, RequestId};
use super::worker::render_worker;

/// Page renders for one loaded document.
///
/// At most one render is wanted at a time: requesting a page cancels the
/// previous request first.
pub struct RenderService {
    request_tx: Sender<RenderRequest>,
    response_rx: Receiver<RenderResponse>,
    next_request_id: u64,
    in_flight: Option<(RequestId, CancelToken)>,
    worker: Option<JoinHandle<()>>,
}

impl RenderService {
    /// Spawn a worker that loads its own handle from `bytes`
    #[must_use]
    pub fn spawn<B: DocumentBackend>(backend: Arc<B>, bytes: Arc<[u8]>, cache_size: usize) -> Self {
        let cache = Arc::new(Mutex::new(PageCache::new(cache_size)));
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        let worker = std::thread::spawn(move || {
            render_worker(backend, bytes, request_rx, response_tx, cache);
        });

        Self {
            request_tx,
            response_rx,
            next_request_id: 1,
            in_flight: None,
            worker: Some(worker),
        }
    }

    /// Request a page, cancelling whatever was in flight
    pub fn request_page(&mut self, page: u32, scale: f64) -> RequestId {
        self.cancel_in_flight();

        let id = self.next_id();
        let cancel = CancelToken::new();
        let _ = self.request_tx.send(RenderRequest::Page {
            id,
            page,
            scale,
            cancel: cancel.clone(),
        });
        self.in_flight = Some((id, cancel));
        id
    }

    /// Cancel the in-flight request, if any. Safe after completion.
    pub fn cancel_in_flight(&mut self) {
        if let Some((id, token)) = self.in_flight.take() {
            debug!("Cancelling render request {}", id.0);
            token.cancel();
        }
    }

    /// The request whose result is still wanted
    #[must_use]
    pub fn latest(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|(id, _)| *id)
    }

    /// Poll for completed render responses to the latest request.
    ///
    /// Responses to superseded requests are dropped.
    pub fn poll_responses(&mut self) -> Vec<RenderResponse> {
        let mut responses = vec![];
        while let Ok(response) = self.response_rx.try_recv() {
            if self.settle(&response) {
                responses.push(response);
            }
        }
        responses
    }

    /// Block until the latest request is answered or `timeout` elapses
    pub fn wait_response(&mut self, timeout: Duration) -> Option<RenderResponse> {
        let deadline = Instant::now() + timeout;
        while self.in_flight.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.response_rx.recv_timeout(remaining) {
                Ok(response) => {
                    if self.settle(&response) {
                        return Some(response);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
        None
    }

    /// True when `response` answers the latest request, which is then done
    fn settle(&mut self, response: &RenderResponse) -> bool {
        if self.latest() == Some(response.id()) {
            self.in_flight = None;
            true
        } else {
            debug!("Dropping stale render response {}", response.id().0);
            false
        }
    }

    /// Stop the worker
    pub fn shutdown(&mut self) {
        self.cancel_in_flight();
        let _ = self.request_tx.send(RenderRequest::Shutdown);
    }

    fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        id
    }
}

impl Drop for RenderService {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
