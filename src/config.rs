// Tue Jan 13 2026 - Alex

use crate::arch::{Architecture, Classifier, Z80Classifier};
use crate::utils::LoggingUtils;
use crate::xref::XRefError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub architecture: Architecture,
    pub detailed_classification: bool,
    pub z80_operand_heuristic: bool,
    pub worker_threads: usize,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            architecture: Architecture::Mos6502,
            detailed_classification: false,
            z80_operand_heuristic: true,
            worker_threads: num_cpus::get(),
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn with_detailed_classification(mut self, detailed: bool) -> Self {
        self.detailed_classification = detailed;
        self
    }

    pub fn with_z80_operand_heuristic(mut self, enabled: bool) -> Self {
        self.z80_operand_heuristic = enabled;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, XRefError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate().map_err(XRefError::InvalidConfig)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, XRefError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.worker_threads == 0 {
            return Err("worker_threads must be greater than 0".to_string());
        }
        let level = self.log_level.to_lowercase();
        if !matches!(level.as_str(), "off" | "error" | "warn" | "warning" | "info" | "debug" | "trace") {
            return Err(format!("unknown log_level: {}", self.log_level));
        }
        Ok(())
    }

    pub fn classifier(&self) -> Arc<dyn Classifier> {
        match self.architecture {
            Architecture::Z80 => Arc::new(Z80Classifier::new().with_operand_heuristic(self.z80_operand_heuristic)),
            other => other.classifier(),
        }
    }

    pub fn init_logging(&self) {
        LoggingUtils::init_logger(LoggingUtils::level_from_str(&self.log_level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.worker_threads > 0);
        assert_eq!(config.architecture, Architecture::Mos6502);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = EngineConfig::from_json(r#"{"architecture": "Z80", "worker_threads": 2}"#).unwrap();
        assert_eq!(config.architecture, Architecture::Z80);
        assert_eq!(config.worker_threads, 2);
        assert!(config.z80_operand_heuristic);
        assert_eq!(config.classifier().architecture(), Architecture::Z80);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"worker_threads": 0}"#),
            Err(XRefError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"log_level": "loud"}"#),
            Err(XRefError::InvalidConfig(_))
        ));
        assert!(matches!(EngineConfig::from_json("{not json"), Err(XRefError::Config(_))));
    }

    #[test]
    fn test_heuristic_flag_reaches_classifier() {
        let config = EngineConfig::new()
            .with_architecture(Architecture::Z80)
            .with_z80_operand_heuristic(false);
        assert!(config.classifier().classify_operands("LD", Some(0x4000), None).is_empty());

        let config = config.with_z80_operand_heuristic(true);
        assert_eq!(config.classifier().classify_operands("LD", Some(0x4000), None).len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = EngineConfig::load(Path::new("/nonexistent/xref-config.json"));
        assert!(matches!(result, Err(XRefError::Io(_))));
    }
}
