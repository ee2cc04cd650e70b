//! Current-page bookkeeping for controlled and uncontrolled hosts
//!
//! A host either drives the page (`PageSource::External`) or leaves it to the
//! component (`PageSource::Internal`). The external value is reconciled only
//! when it, or the page count, changes; internal navigation always clamps.

/// Who decides the current page for this render pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageSource {
    /// Host-supplied page number, not yet validated
    External(i64),
    #[default]
    Internal,
}

/// Clamp `value` into `[1, total_pages]`.
///
/// While the page count is unknown (zero) only the lower bound applies.
#[must_use]
pub fn clamp_page(value: i64, total_pages: usize) -> u32 {
    let upper = if total_pages > 0 {
        value.min(total_pages as i64)
    } else {
        value
    };
    upper.clamp(1, i64::from(u32::MAX)) as u32
}

/// Page the component should show given `source`, or `None` to keep `current`
#[must_use]
pub fn reconcile(source: PageSource, total_pages: usize, current: u32) -> Option<u32> {
    match source {
        PageSource::External(value) => {
            let next = clamp_page(value, total_pages);
            (next != current).then_some(next)
        }
        PageSource::Internal => None,
    }
}

/// Parse a loosely typed page request; anything unparsable means page 1
#[must_use]
pub fn parse_page_request(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(1)
}

/// Single source of truth for the page being rendered
#[derive(Debug)]
pub struct PageSync {
    current: u32,
    total_pages: usize,
    last_source: PageSource,
}

impl Default for PageSync {
    fn default() -> Self {
        Self {
            current: 1,
            total_pages: 0,
            last_source: PageSource::Internal,
        }
    }
}

impl PageSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Start over for a freshly loaded document: the host's page if it
    /// supplies one, page 1 otherwise
    pub fn reset(&mut self, total_pages: usize) -> Option<u32> {
        self.total_pages = total_pages;
        let initial = match self.last_source {
            PageSource::External(value) => clamp_page(value, total_pages),
            PageSource::Internal => 1,
        };
        self.set(initial)
    }

    /// Forget the page count while a new document loads
    pub fn unload(&mut self) {
        self.total_pages = 0;
    }

    /// Reconcile against the host's value for this pass
    pub fn sync(&mut self, source: PageSource) -> Option<u32> {
        if source == self.last_source {
            return None;
        }
        self.last_source = source;
        self.apply_source()
    }

    pub fn next(&mut self) -> Option<u32> {
        if self.total_pages == 0 || self.current as usize >= self.total_pages {
            return None;
        }
        self.set(self.current + 1)
    }

    pub fn previous(&mut self) -> Option<u32> {
        if self.total_pages == 0 || self.current <= 1 {
            return None;
        }
        self.set(self.current - 1)
    }

    pub fn jump(&mut self, target: i64) -> Option<u32> {
        if self.total_pages == 0 {
            return None;
        }
        self.set(clamp_page(target, self.total_pages))
    }

    fn apply_source(&mut self) -> Option<u32> {
        let next = reconcile(self.last_source, self.total_pages, self.current)?;
        self.set(next)
    }

    fn set(&mut self, page: u32) -> Option<u32> {
        if page == self.current {
            return None;
        }
        self.current = page;
        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_value_is_clamped_to_page_count() {
        assert_eq!(reconcile(PageSource::External(15), 10, 1), Some(10));
        assert_eq!(reconcile(PageSource::External(0), 10, 5), Some(1));
        assert_eq!(reconcile(PageSource::External(-3), 10, 5), Some(1));
        assert_eq!(reconcile(PageSource::External(4), 10, 4), None);
        assert_eq!(reconcile(PageSource::Internal, 10, 4), None);
    }

    #[test]
    fn unknown_page_count_enforces_lower_bound_only() {
        assert_eq!(clamp_page(15, 0), 15);
        assert_eq!(clamp_page(-1, 0), 1);
    }

    #[test]
    fn unchanged_external_value_does_not_snap_back() {
        let mut sync = PageSync::new();
        sync.reset(10);
        assert_eq!(sync.sync(PageSource::External(2)), Some(2));
        assert_eq!(sync.next(), Some(3));
        assert_eq!(sync.sync(PageSource::External(2)), None);
        assert_eq!(sync.current(), 3);
        assert_eq!(sync.sync(PageSource::External(7)), Some(7));
    }

    #[test]
    fn page_count_change_re_clamps_external_value() {
        let mut sync = PageSync::new();
        assert_eq!(sync.sync(PageSource::External(15)), Some(15));
        assert_eq!(sync.reset(10), Some(10));
    }

    #[test]
    fn reset_starts_from_host_page() {
        let mut sync = PageSync::new();
        sync.sync(PageSource::External(4));
        sync.reset(2);
        assert_eq!(sync.current(), 2);

        let mut uncontrolled = PageSync::new();
        uncontrolled.reset(8);
        assert_eq!(uncontrolled.jump(6), Some(6));
        assert_eq!(uncontrolled.reset(8), Some(1));
    }

    #[test]
    fn navigation_stops_at_bounds() {
        let mut sync = PageSync::new();
        sync.reset(3);
        assert_eq!(sync.previous(), None);
        assert_eq!(sync.next(), Some(2));
        assert_eq!(sync.next(), Some(3));
        assert_eq!(sync.next(), None);
        assert_eq!(sync.jump(99), None);
        assert_eq!(sync.jump(-4), Some(1));
    }

    #[test]
    fn zero_page_document_ignores_navigation() {
        let mut sync = PageSync::new();
        sync.reset(0);
        assert_eq!(sync.next(), None);
        assert_eq!(sync.previous(), None);
        assert_eq!(sync.jump(3), None);
        assert_eq!(sync.current(), 1);
    }

    #[test]
    fn loose_page_requests() {
        assert_eq!(parse_page_request(" 12 "), 12);
        assert_eq!(parse_page_request("twelve"), 1);
    }
}
