// Tue Jan 13 2026 - Alex

pub mod analyzer;
pub mod cache;
pub mod error;
pub mod filter;
pub mod query;
pub mod reference;
pub mod stats;
pub mod store;

pub use analyzer::XRefAnalyzer;
pub use cache::StatsCache;
pub use error::XRefError;
pub use filter::XRefFilter;
pub use query::{TableRow, NO_XREFS};
pub use reference::{AccessType, XRef};
pub use stats::{StoreSummary, XRefStats};
pub use store::XRefStore;
