// Tue Jan 13 2026 - Alex

use crate::xref::{XRef, XRefStats};
use ahash::AHashMap;
use std::collections::BTreeMap;

/// Derived per-target stats, rebuilt wholesale when marked dirty.
///
/// The cache has no lock of its own; it lives inside the store's mutex so
/// that invalidation, rebuild and the bucket map always change together.
pub struct StatsCache {
    entries: AHashMap<u16, XRefStats>,
    dirty: bool,
    rebuilds: u64,
}

impl StatsCache {
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
            dirty: false,
            rebuilds: 0,
        }
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn ensure_fresh(&mut self, buckets: &BTreeMap<u16, Vec<XRef>>) {
        if !self.dirty {
            return;
        }
        self.entries.clear();
        for (target, refs) in buckets {
            self.entries.insert(*target, XRefStats::from_refs(refs));
        }
        self.dirty = false;
        self.rebuilds += 1;
        log::debug!("Rebuilt xref stats for {} targets (rebuild #{})", self.entries.len(), self.rebuilds);
    }

    /// Callers must run [`ensure_fresh`](Self::ensure_fresh) first.
    pub fn get(&self, target: u16) -> XRefStats {
        debug_assert!(!self.dirty, "stats read from a dirty cache");
        self.entries.get(&target).cloned().unwrap_or_default()
    }

    pub fn values(&self) -> impl Iterator<Item = &XRefStats> {
        self.entries.values()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xref::AccessType;

    #[test]
    fn test_rebuild_only_when_dirty() {
        let mut buckets = BTreeMap::new();
        buckets.insert(0x10u16, vec![XRef::new(0x0800, AccessType::Read, "LDA $10")]);

        let mut cache = StatsCache::new();
        cache.invalidate();
        cache.ensure_fresh(&buckets);
        cache.ensure_fresh(&buckets);
        assert_eq!(cache.rebuild_count(), 1);
        assert_eq!(cache.get(0x10).reads(), 1);
        assert_eq!(cache.size(), 1);

        cache.invalidate();
        assert!(cache.is_dirty());
        buckets.clear();
        cache.ensure_fresh(&buckets);
        assert_eq!(cache.rebuild_count(), 2);
        assert!(cache.get(0x10).is_empty());
    }
}
