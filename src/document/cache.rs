//! Rendered-page cache.
//!
//! Pages are keyed by 1-based page number. Once a page is cached every later
//! request gets the same `Rc`, so a page is rendered at most once while it
//! stays cached. The default cache is unbounded; a bounded cache evicts the
//! page farthest from the one just inserted.

use std::collections::BTreeMap;
use std::rc::Rc;

pub struct PageCache<T> {
    entries: BTreeMap<u32, Rc<T>>,
    limit: Option<usize>,
}

impl<T> Default for PageCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PageCache<T> {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            limit: None,
        }
    }

    /// Create a cache holding at most `limit` pages (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new()
        }
    }

    pub fn get(&self, page: u32) -> Option<Rc<T>> {
        self.entries.get(&page).cloned()
    }

    /// Insert a page unless one is already cached, and return the cached value.
    ///
    /// If two renders of the same page race, the first one to finish wins and
    /// the second result is dropped.
    pub fn get_or_insert(&mut self, page: u32, value: Rc<T>) -> Rc<T> {
        let cached = Rc::clone(self.entries.entry(page).or_insert(value));
        self.enforce_limit(page);
        cached
    }

    pub fn contains(&self, page: u32) -> bool {
        self.entries.contains_key(&page)
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached page numbers in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Evict the pages farthest from `anchor` until we're within the limit.
    fn enforce_limit(&mut self, anchor: u32) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.entries.len() > limit {
            let farthest = self
                .entries
                .keys()
                .copied()
                .filter(|&page| page != anchor)
                .max_by_key(|&page| page.abs_diff(anchor));
            match farthest {
                Some(page) => {
                    self.entries.remove(&page);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_insert_keeps_first_value() {
        let mut cache = PageCache::new();
        let first = cache.get_or_insert(3, Rc::new("first"));
        let second = cache.get_or_insert(3, Rc::new("second"));
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*second, "first");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_returns_same_rc() {
        let mut cache = PageCache::new();
        let inserted = cache.get_or_insert(1, Rc::new(10));
        let looked_up = cache.get(1).unwrap();
        assert!(Rc::ptr_eq(&inserted, &looked_up));
        assert!(cache.get(2).is_none());
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut cache = PageCache::new();
        for page in 1..=500 {
            cache.get_or_insert(page, Rc::new(page));
        }
        assert_eq!(cache.len(), 500);
    }

    #[test]
    fn test_bounded_evicts_farthest_from_anchor() {
        let mut cache = PageCache::with_limit(3);
        cache.get_or_insert(1, Rc::new(1));
        cache.get_or_insert(2, Rc::new(2));
        cache.get_or_insert(3, Rc::new(3));
        // page 1 is the farthest from the newly inserted page 4
        cache.get_or_insert(4, Rc::new(4));
        assert_eq!(cache.pages().collect::<Vec<_>>(), vec![2, 3, 4]);

        cache.get_or_insert(10, Rc::new(10));
        assert_eq!(cache.pages().collect::<Vec<_>>(), vec![3, 4, 10]);
        assert!(cache.contains(10));
    }

    #[test]
    fn test_zero_limit_still_caches_one_page() {
        let mut cache = PageCache::with_limit(0);
        cache.get_or_insert(1, Rc::new(1));
        cache.get_or_insert(2, Rc::new(2));
        assert_eq!(cache.pages().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_clear() {
        let mut cache = PageCache::new();
        cache.get_or_insert(1, Rc::new(()));
        cache.clear();
        assert!(cache.is_empty());
    }
}
