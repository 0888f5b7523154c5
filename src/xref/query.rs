// Tue Jan 13 2026 - Alex

use crate::utils::format_address;
use crate::xref::{AccessType, XRefStore};
use itertools::Itertools;
use serde::Serialize;

pub const NO_XREFS: &str = "No cross-references";

/// Only these types appear in the short preview; the rest show up in the table.
const PREVIEW_TYPES: [AccessType; 5] = [
    AccessType::Read,
    AccessType::Write,
    AccessType::Call,
    AccessType::Jump,
    AccessType::Branch,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub access: AccessType,
    pub source: String,
    pub instruction: String,
    pub context: String,
}

impl XRefStore {
    pub fn preview(&self, target: u16) -> String {
        let stats = self.with_inner(|inner| {
            let present = inner.buckets.get(&target).map(|r| !r.is_empty()).unwrap_or(false);
            if present {
                Some(inner.fresh_cache().get(target))
            } else {
                None
            }
        });

        let stats = match stats {
            Some(s) => s,
            None => return NO_XREFS.to_string(),
        };

        let noun = if stats.unique_sources() == 1 { "location" } else { "locations" };
        let header = format!("Referenced from {} {}", stats.unique_sources(), noun);
        let lines = PREVIEW_TYPES
            .iter()
            .filter(|access| stats.count(**access) > 0)
            .map(|access| format!("{}: {}", access, stats.count(*access)));

        std::iter::once(header).chain(lines).join("\n")
    }

    pub fn table_rows(&self, target: u16) -> Vec<TableRow> {
        self.get(target)
            .into_iter()
            .sorted_by_key(|x| x.source())
            .map(|x| TableRow {
                access: x.access(),
                source: format_address(x.source()),
                instruction: x.instruction().to_string(),
                context: x.context().unwrap_or_default().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xref::XRef;

    #[test]
    fn test_preview_without_refs() {
        let store = XRefStore::new();
        assert_eq!(store.preview(0xD020), NO_XREFS);
    }

    #[test]
    fn test_preview_lists_nonzero_counts_only() {
        let store = XRefStore::new();
        store.add(0xD020, XRef::new(0x0810, AccessType::Read, "LDA $D020"));
        store.add(0xD020, XRef::new(0x0820, AccessType::Read, "LDA $D020"));
        store.add(0xD020, XRef::new(0x0830, AccessType::Write, "STA $D020"));
        store.add(0xD020, XRef::new(0x0840, AccessType::Modify, "INC $D020"));

        let preview = store.preview(0xD020);
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines, vec!["Referenced from 4 locations", "Read: 2", "Write: 1"]);
        assert!(!preview.contains("Modify"));
        assert!(!preview.contains("Call"));
    }

    #[test]
    fn test_table_rows_sorted_stably() {
        let store = XRefStore::new();
        store.add(0x20, XRef::new(0x0900, AccessType::Write, "STA $20"));
        store.add(
            0x20,
            XRef::new(0x0810, AccessType::Read, "EX (SP),HL").with_context(Some("exchange".to_string())),
        );
        store.add(0x20, XRef::new(0x0810, AccessType::Write, "EX (SP),HL"));

        let rows = store.table_rows(0x20);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].source, "$0810");
        assert_eq!(rows[0].access, AccessType::Read);
        assert_eq!(rows[0].context, "exchange");
        assert_eq!(rows[1].source, "$0810");
        assert_eq!(rows[1].access, AccessType::Write);
        assert_eq!(rows[1].context, "");
        assert_eq!(rows[2].source, "$0900");
        assert_eq!(rows[2].instruction, "STA $20");
    }

    #[test]
    fn test_table_rows_empty_target() {
        assert!(XRefStore::new().table_rows(0x1234).is_empty());
    }
}
