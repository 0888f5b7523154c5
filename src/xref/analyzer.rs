// Tue Jan 13 2026 - Alex

use crate::arch::{Classifier, DecodedInstruction};
use crate::config::EngineConfig;
use crate::utils::logging::ScopedTimer;
use crate::xref::{XRefError, XRefStore};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::Arc;

/// Feeds decoded instructions through one classifier into a shared store.
pub struct XRefAnalyzer {
    store: Arc<XRefStore>,
    classifier: Arc<dyn Classifier>,
    detailed: bool,
    pool: Option<ThreadPool>,
}

impl XRefAnalyzer {
    pub fn new(store: Arc<XRefStore>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            store,
            classifier,
            detailed: false,
            pool: None,
        }
    }

    pub fn from_config(config: &EngineConfig, store: Arc<XRefStore>) -> Result<Self, XRefError> {
        config.validate().map_err(XRefError::InvalidConfig)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .build()
            .map_err(|e| XRefError::ThreadPool(e.to_string()))?;
        Ok(Self {
            store,
            classifier: config.classifier(),
            detailed: config.detailed_classification,
            pool: Some(pool),
        })
    }

    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn store(&self) -> &Arc<XRefStore> {
        &self.store
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn process(&self, insn: &DecodedInstruction) -> usize {
        let refs = self.classifier.classify(insn);
        self.store
            .add_all(refs.into_iter().map(|r| r.into_xref(insn.address, &insn.text)))
    }

    pub fn process_detailed(&self, insn: &DecodedInstruction) -> usize {
        let refs = self.classifier.classify_detailed(insn);
        self.store
            .add_all(refs.into_iter().map(|r| r.into_xref(insn.address, &insn.text)))
    }

    pub fn process_operands(
        &self,
        address: u16,
        text: &str,
        destination: Option<i64>,
        source: Option<i64>,
    ) -> usize {
        let (mnemonic, _) = crate::arch::split_instruction(text);
        let refs = self.classifier.classify_operands(&mnemonic, destination, source);
        self.store.add_all(refs.into_iter().map(|r| r.into_xref(address, text)))
    }

    /// Classifies a region in program order and files the result under a
    /// single lock acquisition.
    pub fn analyze(&self, region: &[DecodedInstruction]) -> usize {
        let refs: Vec<_> = region
            .iter()
            .flat_map(|insn| {
                let classified = if self.detailed {
                    self.classifier.classify_detailed(insn)
                } else {
                    self.classifier.classify(insn)
                };
                classified
                    .into_iter()
                    .map(move |r| r.into_xref(insn.address, &insn.text))
            })
            .collect();
        self.store.add_all(refs)
    }

    pub fn analyze_regions(&self, regions: &[Vec<DecodedInstruction>]) -> usize {
        let _timer = ScopedTimer::new("xref analysis");
        let run = || regions.par_iter().map(|region| self.analyze(region)).sum::<usize>();
        let added = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };
        log::debug!(
            "{} pass over {} regions added {} references",
            self.classifier.architecture(),
            regions.len(),
            added
        );
        added
    }

    /// Drops everything from the previous pass.
    pub fn reset(&self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Architecture, Mos6502Classifier, Z80Classifier};
    use crate::xref::AccessType;

    fn mos6502() -> XRefAnalyzer {
        XRefAnalyzer::new(Arc::new(XRefStore::new()), Arc::new(Mos6502Classifier::new()))
    }

    #[test]
    fn test_process_files_under_target() {
        let analyzer = mos6502();
        let insn = DecodedInstruction::new(0x0810, "LDA $D020").with_resolved(0xD020);
        assert_eq!(analyzer.process(&insn), 1);

        let refs = analyzer.store().get(0xD020);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].source(), 0x0810);
        assert_eq!(refs[0].access(), AccessType::Read);
        assert_eq!(refs[0].instruction(), "LDA $D020");
    }

    #[test]
    fn test_analyze_region_in_program_order() {
        let analyzer = mos6502();
        let region = vec![
            DecodedInstruction::new(0x0800, "LDA $D020"),
            DecodedInstruction::new(0x0803, "NOP"),
            DecodedInstruction::new(0x0804, "INC $D020"),
            DecodedInstruction::new(0x0807, "JSR $FFD2"),
        ];
        assert_eq!(analyzer.analyze(&region), 3);
        let sources: Vec<u16> = analyzer.store().get(0xD020).iter().map(|x| x.source()).collect();
        assert_eq!(sources, vec![0x0800, 0x0804]);
        assert_eq!(analyzer.store().stats(0xFFD2).calls(), 1);
    }

    #[test]
    fn test_detailed_mode_for_z80() {
        let store = Arc::new(XRefStore::new());
        let analyzer = XRefAnalyzer::new(Arc::clone(&store), Arc::new(Z80Classifier::new())).with_detailed(true);
        let region = vec![
            DecodedInstruction::new(0x0100, "LD (HL),A"),
            DecodedInstruction::new(0x0101, "LD (HL),A").with_resolved(0x4000),
            DecodedInstruction::new(0x0102, "LD A,(HL)").with_resolved(0x4000),
        ];
        assert_eq!(analyzer.analyze(&region), 2);
        let accesses: Vec<AccessType> = store.get(0x4000).iter().map(|x| x.access()).collect();
        assert_eq!(accesses, vec![AccessType::Write, AccessType::Read]);
    }

    #[test]
    fn test_process_operands_heuristic() {
        let analyzer = XRefAnalyzer::new(Arc::new(XRefStore::new()), Arc::new(Z80Classifier::new()));
        assert_eq!(analyzer.process_operands(0x0200, "EX (SP),HL", Some(0xFFF0), None), 2);
        assert_eq!(analyzer.store().get(0xFFF0)[0].instruction(), "EX (SP),HL");

        let plain = mos6502();
        assert_eq!(plain.process_operands(0x0200, "LDA $10", Some(0x10), None), 0);
    }

    #[test]
    fn test_parallel_regions_and_reset() {
        let config = EngineConfig::new()
            .with_architecture(Architecture::Mos6502)
            .with_worker_threads(4);
        let analyzer = XRefAnalyzer::from_config(&config, Arc::new(XRefStore::new())).unwrap();

        let regions: Vec<Vec<DecodedInstruction>> = (0..16u16)
            .map(|r| {
                (0..32u16)
                    .map(|i| {
                        let address = 0x1000 + r * 0x100 + i * 3;
                        DecodedInstruction::new(address, format!("STA ${:04X}", 0xC000 + r))
                    })
                    .collect()
            })
            .collect();

        assert_eq!(analyzer.analyze_regions(&regions), 16 * 32);
        assert_eq!(analyzer.store().count(), 16 * 32);
        assert_eq!(analyzer.store().stats(0xC003).writes(), 32);

        analyzer.reset();
        assert!(analyzer.store().is_empty());
        assert!(!analyzer.store().has_any(0xC003));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = EngineConfig::new().with_worker_threads(0);
        assert!(XRefAnalyzer::from_config(&config, Arc::new(XRefStore::new())).is_err());
    }
}
