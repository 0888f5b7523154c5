// Tue Jan 13 2026 - Alex

use crate::xref::{AccessType, XRef};

/// Predicate builder over individual xrefs. An empty filter matches everything.
#[derive(Debug, Clone)]
pub struct XRefFilter {
    include_types: Vec<AccessType>,
    min_source: u16,
    max_source: u16,
    context_contains: Option<String>,
}

impl XRefFilter {
    pub fn new() -> Self {
        Self {
            include_types: Vec::new(),
            min_source: 0,
            max_source: u16::MAX,
            context_contains: None,
        }
    }

    pub fn with_type(mut self, access: AccessType) -> Self {
        if !self.include_types.contains(&access) {
            self.include_types.push(access);
        }
        self
    }

    pub fn with_types(mut self, types: &[AccessType]) -> Self {
        for access in types {
            self = self.with_type(*access);
        }
        self
    }

    pub fn with_source_range(mut self, min: u16, max: u16) -> Self {
        self.min_source = min;
        self.max_source = max;
        self
    }

    pub fn with_context(mut self, needle: &str) -> Self {
        self.context_contains = Some(needle.to_lowercase());
        self
    }

    pub fn control_flow() -> Self {
        Self::new().with_types(&[AccessType::Call, AccessType::Jump, AccessType::Branch])
    }

    pub fn matches(&self, xref: &XRef) -> bool {
        if !self.include_types.is_empty() && !self.include_types.contains(&xref.access()) {
            return false;
        }
        if xref.source() < self.min_source || xref.source() > self.max_source {
            return false;
        }
        match &self.context_contains {
            Some(needle) => xref
                .context()
                .map(|c| c.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
            None => true,
        }
    }

    pub fn apply<'a, I>(&self, refs: I) -> Vec<XRef>
    where
        I: IntoIterator<Item = &'a XRef>,
    {
        refs.into_iter().filter(|x| self.matches(x)).cloned().collect()
    }
}

impl Default for XRefFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<XRef> {
        vec![
            XRef::new(0x0800, AccessType::Read, "LDA $D020"),
            XRef::new(0x0900, AccessType::Call, "JSR $D020"),
            XRef::new(0x0A00, AccessType::Write, "STA ($FB),Y").with_context(Some("Indirect".to_string())),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert_eq!(XRefFilter::new().apply(&sample()).len(), 3);
    }

    #[test]
    fn test_type_and_range() {
        let refs = sample();
        let filter = XRefFilter::new()
            .with_types(&[AccessType::Read, AccessType::Write])
            .with_source_range(0x0850, 0x0AFF);
        let result = filter.apply(&refs);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source(), 0x0A00);
    }

    #[test]
    fn test_context_match_is_case_insensitive() {
        let result = XRefFilter::new().with_context("indirect").apply(&sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].access(), AccessType::Write);
    }

    #[test]
    fn test_control_flow_preset() {
        let result = XRefFilter::control_flow().apply(&sample());
        assert_eq!(result.len(), 1);
        assert!(result[0].is_call());
    }
}
