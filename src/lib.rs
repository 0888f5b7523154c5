// Tue Jan 13 2026 - Alex

pub mod arch;
pub mod config;
pub mod utils;
pub mod xref;

pub use arch::{Architecture, ClassifiedRef, Classifier, DecodedInstruction, Resolution};
pub use config::EngineConfig;
pub use xref::{AccessType, XRef, XRefAnalyzer, XRefFilter, XRefStats, XRefStore};
