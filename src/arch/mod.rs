// Tue Jan 13 2026 - Alex

pub mod i8048;
pub mod mos6502;
pub mod operand;
pub mod z80;

pub use i8048::I8048Classifier;
pub use mos6502::Mos6502Classifier;
pub use operand::{parse_number, split_instruction, Resolution};
pub use z80::Z80Classifier;

use crate::xref::{AccessType, XRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One decoded instruction as handed over by the disassembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub address: u16,
    pub mnemonic: String,
    pub operands: Vec<String>,
    /// Operand address the decoder already knows, if any.
    pub resolved: Option<u16>,
    pub text: String,
}

impl DecodedInstruction {
    pub fn new(address: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        let (mnemonic, operands) = split_instruction(&text);
        Self {
            address,
            mnemonic,
            operands,
            resolved: None,
            text,
        }
    }

    pub fn with_resolved(mut self, address: u16) -> Self {
        self.resolved = Some(address);
        self
    }

    pub fn operand_refs(&self) -> Vec<&str> {
        self.operands.iter().map(String::as_str).collect()
    }
}

/// A classified operand access, before it is filed under its target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassifiedRef {
    pub target: u16,
    pub access: AccessType,
    pub context: Option<String>,
}

impl ClassifiedRef {
    pub fn new(target: u16, access: AccessType) -> Self {
        Self {
            target,
            access,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn into_xref(self, source: u16, instruction: &str) -> (u16, XRef) {
        let xref = XRef::new(source, self.access, instruction).with_context(self.context);
        (self.target, xref)
    }
}

pub trait Classifier: Send + Sync {
    fn architecture(&self) -> Architecture;

    /// Text-shape classification, falling back to `insn.resolved`.
    fn classify(&self, insn: &DecodedInstruction) -> Vec<ClassifiedRef>;

    /// Parse-then-classify over addressing modes. Architectures without a
    /// separate detailed path use [`classify`](Self::classify).
    fn classify_detailed(&self, insn: &DecodedInstruction) -> Vec<ClassifiedRef> {
        self.classify(insn)
    }

    /// For decoders that supply raw integer operands instead of text.
    fn classify_operands(&self, _mnemonic: &str, _destination: Option<i64>, _source: Option<i64>) -> Vec<ClassifiedRef> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    Mos6502,
    Z80,
    I8048,
}

impl Architecture {
    pub fn classifier(&self) -> Arc<dyn Classifier> {
        match self {
            Self::Mos6502 => Arc::new(Mos6502Classifier::new()),
            Self::Z80 => Arc::new(Z80Classifier::new()),
            Self::I8048 => Arc::new(I8048Classifier::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mos6502 => "6502",
            Self::Z80 => "Z80",
            Self::I8048 => "8048",
        }
    }
}

impl Default for Architecture {
    fn default() -> Self {
        Self::Mos6502
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
