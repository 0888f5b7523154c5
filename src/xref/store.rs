// Tue Jan 13 2026 - Alex

use crate::xref::{AccessType, StatsCache, StoreSummary, XRef, XRefFilter, XRefStats};
use indexmap::IndexSet;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};

/// Reverse index from target address to every instruction referencing it.
///
/// Buckets, stats cache and running total share one mutex. Every accessor
/// copies out under the lock, so nothing returned here aliases live state.
pub struct XRefStore {
    inner: Mutex<Inner>,
}

pub(crate) struct Inner {
    pub(crate) buckets: BTreeMap<u16, Vec<XRef>>,
    pub(crate) cache: StatsCache,
    total: usize,
}

impl Inner {
    fn push(&mut self, target: u16, xref: XRef) {
        self.buckets.entry(target).or_default().push(xref);
        self.total += 1;
    }

    pub(crate) fn fresh_cache(&mut self) -> &StatsCache {
        self.cache.ensure_fresh(&self.buckets);
        &self.cache
    }
}

impl XRefStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                buckets: BTreeMap::new(),
                cache: StatsCache::new(),
                total: 0,
            }),
        }
    }

    pub(crate) fn with_inner<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock();
        f(&mut inner)
    }

    pub fn add(&self, target: u16, xref: XRef) {
        let mut inner = self.inner.lock();
        inner.push(target, xref);
        inner.cache.invalidate();
    }

    pub fn add_all<I>(&self, refs: I) -> usize
    where
        I: IntoIterator<Item = (u16, XRef)>,
    {
        let mut inner = self.inner.lock();
        let mut added = 0;
        for (target, xref) in refs {
            inner.push(target, xref);
            added += 1;
        }
        if added > 0 {
            inner.cache.invalidate();
        }
        added
    }

    pub fn get(&self, target: u16) -> Vec<XRef> {
        self.inner.lock().buckets.get(&target).cloned().unwrap_or_default()
    }

    pub fn get_of_type(&self, target: u16, access: AccessType) -> Vec<XRef> {
        let inner = self.inner.lock();
        inner
            .buckets
            .get(&target)
            .map(|refs| refs.iter().filter(|x| x.access() == access).cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_any(&self, target: u16) -> bool {
        self.inner
            .lock()
            .buckets
            .get(&target)
            .map(|refs| !refs.is_empty())
            .unwrap_or(false)
    }

    pub fn all_targets(&self) -> BTreeSet<u16> {
        self.inner.lock().buckets.keys().copied().collect()
    }

    pub fn all_of_type(&self, access: AccessType) -> Vec<XRef> {
        let inner = self.inner.lock();
        inner
            .buckets
            .values()
            .flat_map(|refs| refs.iter())
            .filter(|x| x.access() == access)
            .cloned()
            .collect()
    }

    /// Inclusive on both ends, concatenated in ascending target order.
    pub fn range_query(&self, start: u16, end: u16) -> Vec<XRef> {
        if start > end {
            return Vec::new();
        }
        let inner = self.inner.lock();
        inner
            .buckets
            .range(start..=end)
            .flat_map(|(_, refs)| refs.iter().cloned())
            .collect()
    }

    pub fn query(&self, target: u16, filter: &XRefFilter) -> Vec<XRef> {
        let inner = self.inner.lock();
        match inner.buckets.get(&target) {
            Some(refs) => filter.apply(refs),
            None => Vec::new(),
        }
    }

    pub fn query_all(&self, filter: &XRefFilter) -> Vec<(u16, XRef)> {
        let inner = self.inner.lock();
        inner
            .buckets
            .iter()
            .flat_map(|(target, refs)| {
                refs.iter()
                    .filter(|x| filter.matches(x))
                    .map(move |x| (*target, x.clone()))
            })
            .collect()
    }

    /// Everything the instruction at `source` refers to, by ascending target.
    pub fn references_from(&self, source: u16) -> Vec<(u16, XRef)> {
        let inner = self.inner.lock();
        inner
            .buckets
            .iter()
            .flat_map(|(target, refs)| {
                refs.iter()
                    .filter(move |x| x.source() == source)
                    .map(move |x| (*target, x.clone()))
            })
            .collect()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let removed = inner.total;
        inner.buckets.clear();
        inner.total = 0;
        inner.cache.invalidate();
        log::debug!("Cleared xref store ({} references removed)", removed);
    }

    pub fn clear_for(&self, target: u16) -> usize {
        let mut inner = self.inner.lock();
        let removed = inner.buckets.remove(&target).map(|refs| refs.len()).unwrap_or(0);
        inner.total -= removed;
        inner.cache.invalidate();
        removed
    }

    pub fn count(&self) -> usize {
        let inner = self.inner.lock();
        debug_assert_eq!(inner.total, inner.buckets.values().map(Vec::len).sum::<usize>());
        inner.total
    }

    pub fn target_count(&self) -> usize {
        self.inner.lock().buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn stats(&self, target: u16) -> XRefStats {
        let mut inner = self.inner.lock();
        inner.fresh_cache().get(target)
    }

    pub fn rebuild_count(&self) -> u64 {
        self.inner.lock().cache.rebuild_count()
    }

    /// Targets ordered by reference count, highest first; ties by address.
    pub fn most_referenced(&self, limit: usize) -> Vec<(u16, usize)> {
        let mut ranked: Vec<(u16, usize)> = {
            let inner = self.inner.lock();
            inner.buckets.iter().map(|(t, refs)| (*t, refs.len())).collect()
        };
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn summary(&self) -> StoreSummary {
        let mut inner = self.inner.lock();
        let target_count = inner.buckets.len();
        let xref_count = inner.total;
        let cache = inner.fresh_cache();

        let mut per_type = [0usize; AccessType::COUNT];
        let mut sources = IndexSet::new();
        for stats in cache.values() {
            for access in AccessType::ALL {
                per_type[access.index()] += stats.count(access);
            }
            sources.extend(stats.sources().iter().copied());
        }

        StoreSummary {
            target_count,
            xref_count,
            per_type,
            distinct_sources: sources.len(),
        }
    }
}

impl Default for XRefStore {
    fn default() -> Self {
        Self::new()
    }
}
