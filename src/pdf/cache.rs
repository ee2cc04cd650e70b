//! LRU cache of rendered page surfaces

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::backend::PageSurface;

/// Cache key for rendered pages
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Page number, 1-based
    pub page: u32,
    /// Scale factor (stored as millionths for stable hashing)
    pub scale_millionths: u32,
}

impl CacheKey {
    #[must_use]
    pub fn new(page: u32, scale: f64) -> Self {
        Self {
            page,
            scale_millionths: (scale * 1_000_000.0) as u32,
        }
    }
}

/// LRU cache for rendered surfaces
pub struct PageCache {
    cache: LruCache<CacheKey, Arc<PageSurface>>,
}

impl PageCache {
    /// Create a new cache with the given capacity (at least one page)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Get a cached page, promoting it in the LRU order
    #[must_use]
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<PageSurface>> {
        self.cache.get(key).cloned()
    }

    /// Check if a key is in the cache without promoting it
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.cache.contains(key)
    }

    /// Insert a page into the cache, returning an Arc to the surface
    pub fn insert(&mut self, key: CacheKey, surface: PageSurface) -> Arc<PageSurface> {
        let arc = Arc::new(surface);
        self.cache.put(key, arc.clone());
        arc
    }

    /// Number of cached pages
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use super::*;

    fn surface(page: u32, scale: f64) -> PageSurface {
        PageSurface::new(page, scale, RgbaImage::new(2, 2))
    }

    #[test]
    fn cache_insert_and_get() {
        let mut cache = PageCache::new(10);
        let key = CacheKey::new(1, 1.5);

        cache.insert(key.clone(), surface(1, 1.5));

        assert!(cache.contains(&key));
        assert_eq!(cache.get(&key).map(|s| s.page_number), Some(1));
        assert!(!cache.contains(&CacheKey::new(1, 2.0)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_lru_eviction() {
        let mut cache = PageCache::new(2);

        for page in 1..=3 {
            cache.insert(CacheKey::new(page, 1.0), surface(page, 1.0));
        }

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&CacheKey::new(1, 1.0)));
        assert!(cache.contains(&CacheKey::new(2, 1.0)));
        assert!(cache.contains(&CacheKey::new(3, 1.0)));
    }

    #[test]
    fn zero_capacity_holds_one_page() {
        let mut cache = PageCache::new(0);
        assert!(cache.is_empty());
        cache.insert(CacheKey::new(1, 1.0), surface(1, 1.0));
        cache.insert(CacheKey::new(2, 1.0), surface(2, 1.0));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&CacheKey::new(2, 1.0)));
    }
}
