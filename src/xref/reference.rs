// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// One classified reference from the instruction at `source` to some target.
/// The target is the key under which the store files the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XRef {
    source: u16,
    access: AccessType,
    instruction: String,
    context: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccessType {
    Read,
    Write,
    Call,
    Jump,
    Branch,
    Pointer,
    Compare,
    Modify,
    BitTest,
}

impl AccessType {
    pub const COUNT: usize = 9;

    pub const ALL: [AccessType; Self::COUNT] = [
        AccessType::Read,
        AccessType::Write,
        AccessType::Call,
        AccessType::Jump,
        AccessType::Branch,
        AccessType::Pointer,
        AccessType::Compare,
        AccessType::Modify,
        AccessType::BitTest,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Call => "Call",
            Self::Jump => "Jump",
            Self::Branch => "Branch",
            Self::Pointer => "Pointer",
            Self::Compare => "Compare",
            Self::Modify => "Modify",
            Self::BitTest => "Bit Test",
        }
    }

    pub fn is_control_flow(&self) -> bool {
        matches!(self, Self::Call | Self::Jump | Self::Branch)
    }

    pub fn is_data(&self) -> bool {
        !self.is_control_flow()
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl XRef {
    pub fn new(source: u16, access: AccessType, instruction: impl Into<String>) -> Self {
        Self {
            source,
            access,
            instruction: instruction.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn source(&self) -> u16 {
        self.source
    }

    pub fn access(&self) -> AccessType {
        self.access
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn is_call(&self) -> bool {
        matches!(self.access, AccessType::Call)
    }
}

impl fmt::Display for XRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from ${:04X}: {}", self.access, self.source, self.instruction)?;
        if let Some(context) = &self.context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}
