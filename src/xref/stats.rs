// Tue Jan 13 2026 - Alex

use crate::xref::{AccessType, XRef};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Per-target aggregate: how often each access type occurs and which
/// instructions are involved, in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XRefStats {
    counts: [usize; AccessType::COUNT],
    sources: Vec<u16>,
}

impl XRefStats {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_refs<'a, I>(refs: I) -> Self
    where
        I: IntoIterator<Item = &'a XRef>,
    {
        let mut counts = [0usize; AccessType::COUNT];
        let mut sources = IndexSet::new();
        for xref in refs {
            counts[xref.access().index()] += 1;
            sources.insert(xref.source());
        }
        Self {
            counts,
            sources: sources.into_iter().collect(),
        }
    }

    pub fn count(&self, access: AccessType) -> usize {
        self.counts[access.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn sources(&self) -> &[u16] {
        &self.sources
    }

    pub fn unique_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn reads(&self) -> usize {
        self.count(AccessType::Read)
    }

    pub fn writes(&self) -> usize {
        self.count(AccessType::Write)
    }

    pub fn calls(&self) -> usize {
        self.count(AccessType::Call)
    }

    /// True when the target is only ever read, e.g. a constant table.
    pub fn is_read_only(&self) -> bool {
        self.reads() > 0 && self.writes() == 0 && self.count(AccessType::Modify) == 0
    }
}

/// Whole-store totals, see [`crate::xref::XRefStore::summary`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub target_count: usize,
    pub xref_count: usize,
    pub per_type: [usize; AccessType::COUNT],
    pub distinct_sources: usize,
}

impl StoreSummary {
    pub fn count(&self, access: AccessType) -> usize {
        self.per_type[access.index()]
    }
}
