pub mod test_helpers {
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use image::{Rgba, RgbaImage};

    use crate::pdf::geometry::Point;
    use crate::pdf::readiness::ReadyInfo;
    use crate::pdf::selection::PointerKind;
    use crate::pdf::{
        CancelToken, DestItem, DocumentBackend, DocumentError, DocumentHandle, OutlineNode,
        PageRef, PageSurface, RenderError,
    };
    use crate::snippet::Snippet;
    use crate::table_of_contents::TocItem;
    use crate::widget::boxcutter::{BoxCutter, BoxCutterConfig, HostEvent, PointerEvent};

    /// Bytes `MemoryBackend` refuses to decode
    pub const CORRUPT: &[u8] = b"%corrupt";

    const RENDER_TIMEOUT: Duration = Duration::from_secs(5);

    /// In-memory document.
    ///
    /// Every page is `page_size` document units; a pixel of a rendered
    /// surface is `[x % 256, y % 256, page index, 255]`. Page references are
    /// `PageRef::new(index + 1, 0)`.
    #[derive(Clone, Debug)]
    pub struct MemoryDocument {
        pub page_count: usize,
        pub page_size: (f64, f64),
        pub outline: Option<Vec<OutlineNode>>,
        pub named: HashMap<String, Vec<DestItem>>,
        pub failing_pages: HashSet<usize>,
        pub broken_outline: bool,
        pub render_delay: Duration,
    }

    impl MemoryDocument {
        pub fn new(page_count: usize) -> Self {
            Self {
                page_count,
                page_size: (200.0, 200.0),
                outline: None,
                named: HashMap::new(),
                failing_pages: HashSet::new(),
                broken_outline: false,
                render_delay: Duration::ZERO,
            }
        }

        pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
            self.page_size = (width, height);
            self
        }

        pub fn with_outline(mut self, outline: Vec<OutlineNode>) -> Self {
            self.outline = Some(outline);
            self
        }

        pub fn with_named(mut self, name: &str, dest: Vec<DestItem>) -> Self {
            self.named.insert(name.to_string(), dest);
            self
        }

        /// Rendering page `index` (0-based) fails
        pub fn with_failing_page(mut self, index: usize) -> Self {
            self.failing_pages.insert(index);
            self
        }

        pub fn with_broken_outline(mut self) -> Self {
            self.broken_outline = true;
            self
        }

        pub fn with_render_delay(mut self, delay: Duration) -> Self {
            self.render_delay = delay;
            self
        }

        /// Reference of page `index` (0-based)
        pub fn page_ref(index: usize) -> PageRef {
            PageRef::new(index as u32 + 1, 0)
        }

        /// Explicit destination for page `index` (0-based)
        pub fn dest(index: usize) -> Vec<DestItem> {
            vec![
                DestItem::Ref(Self::page_ref(index)),
                DestItem::Name("Fit".to_string()),
            ]
        }

        /// Expected pixel of page `index` at surface position `(x, y)`
        pub fn pixel(index: usize, x: u32, y: u32) -> Rgba<u8> {
            Rgba([(x % 256) as u8, (y % 256) as u8, index as u8, 255])
        }
    }

    impl DocumentHandle for MemoryDocument {
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
            if self.failing_pages.contains(&index) {
                return Err(RenderError::failed(format!("page {index} is damaged")));
            }

            let deadline = Instant::now() + self.render_delay;
            while Instant::now() < deadline {
                cancel.check()?;
                std::thread::sleep(Duration::from_millis(2));
            }
            cancel.check()?;

            let width = (self.page_size.0 * scale).round().max(1.0) as u32;
            let height = (self.page_size.1 * scale).round().max(1.0) as u32;
            let image = RgbaImage::from_fn(width, height, |x, y| Self::pixel(index, x, y));
            Ok(PageSurface::new(index as u32 + 1, scale, image))
        }

        fn outline(&self) -> Result<Option<Vec<OutlineNode>>, DocumentError> {
            if self.broken_outline {
                return Err(DocumentError::Lookup("outline dictionary is corrupt".into()));
            }
            Ok(self.outline.clone())
        }

        fn destination(&self, name: &str) -> Result<Option<Vec<DestItem>>, DocumentError> {
            Ok(self.named.get(name).cloned())
        }

        fn page_index(&self, page_ref: PageRef) -> Result<usize, DocumentError> {
            let index = (page_ref.num as usize)
                .checked_sub(1)
                .filter(|i| *i < self.page_count && page_ref.generation == 0);
            index.ok_or_else(|| DocumentError::Lookup(format!("no page for {page_ref:?}")))
        }
    }

    /// Backend that hands out copies of one in-memory document
    #[derive(Clone, Debug)]
    pub struct MemoryBackend {
        pub document: MemoryDocument,
    }

    impl MemoryBackend {
        pub fn new(document: MemoryDocument) -> Self {
            Self { document }
        }
    }

    impl DocumentBackend for MemoryBackend {
        type Document = MemoryDocument;

        fn load(&self, bytes: &[u8]) -> Result<Self::Document, DocumentError> {
            if bytes.is_empty() {
                return Err(DocumentError::Missing);
            }
            if bytes == CORRUPT {
                return Err(DocumentError::Decode("not a document".into()));
            }
            Ok(self.document.clone())
        }
    }

    /// Any non-corrupt bytes
    pub fn document_bytes() -> Arc<[u8]> {
        Arc::from(&b"%memory"[..])
    }

    pub fn mouse(x: f64, y: f64) -> PointerEvent {
        PointerEvent::at(PointerKind::Mouse, x, y)
    }

    /// A parent that owns the snippet and TOC lists and feeds every change
    /// back into the component, optionally controlling the page as well
    pub struct ControlledHost<B: DocumentBackend> {
        pub cutter: BoxCutter<B>,
        pub snippets: Vec<Snippet>,
        pub toc: Vec<TocItem>,
        /// `Some` when the host controls the page
        pub page: Option<i64>,
        pub page_changes: Vec<u32>,
        pub ready: Vec<ReadyInfo>,
        pub snippet_updates: usize,
        pub toc_updates: usize,
    }

    impl<B: DocumentBackend> ControlledHost<B> {
        pub fn new(backend: B, config: BoxCutterConfig) -> Self {
            Self {
                cutter: BoxCutter::new(backend, config),
                snippets: Vec::new(),
                toc: Vec::new(),
                page: None,
                page_changes: Vec::new(),
                ready: Vec::new(),
                snippet_updates: 0,
                toc_updates: 0,
            }
        }

        /// Take control of the page
        pub fn control_page(&mut self, page: i64) {
            self.page = Some(page);
            self.cutter.set_page(Some(page));
            self.process();
        }

        /// Apply the component's notifications the way a parent would
        pub fn process(&mut self) {
            loop {
                let events = self.cutter.drain_events();
                if events.is_empty() {
                    break;
                }
                for event in events {
                    match event {
                        HostEvent::SnippetsChanged(list) => {
                            self.snippet_updates += 1;
                            self.snippets = list.clone();
                            self.cutter.set_snippets(list);
                        }
                        HostEvent::TocChanged(list) => {
                            self.toc_updates += 1;
                            self.toc = list.clone();
                            self.cutter.set_toc(list);
                        }
                        HostEvent::PageChanged(page) => {
                            self.page_changes.push(page);
                            if self.page.is_some() {
                                self.page = Some(i64::from(page));
                                self.cutter.set_page(self.page);
                            }
                        }
                        HostEvent::Ready(info) => self.ready.push(info),
                    }
                }
            }
        }

        pub fn load(&mut self, bytes: Option<Arc<[u8]>>) {
            self.cutter.load_document(bytes);
            self.process();
        }

        /// Wait for the pending render, then run one frame
        pub fn render(&mut self) -> bool {
            let installed = self.cutter.wait_for_render(RENDER_TIMEOUT);
            self.frame();
            installed
        }

        pub fn frame(&mut self) {
            self.cutter.on_frame();
            self.process();
        }

        /// Mouse drag between two surface points
        pub fn drag(&mut self, from: (f64, f64), to: (f64, f64), shift: bool) {
            self.cutter.pointer_down(&mouse(from.0, from.1).with_shift(shift));
            self.cutter.pointer_move(&mouse(to.0, to.1).with_shift(shift));
            self.cutter.pointer_up(&mouse(to.0, to.1).with_shift(shift));
            self.process();
        }

        /// Hover `at`, then click there
        pub fn click(&mut self, at: Point) {
            let ev = mouse(at.x, at.y);
            self.cutter.pointer_move(&ev);
            self.cutter.pointer_down(&ev);
            self.cutter.pointer_up(&ev);
            self.process();
        }

        pub fn key_up(&mut self) {
            self.cutter.key_up();
            self.process();
        }
    }
}
