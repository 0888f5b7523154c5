// Tue Jan 13 2026 - Alex

use crate::arch::operand::{parse_number, split_instruction};
use crate::arch::{Architecture, ClassifiedRef, Classifier, DecodedInstruction};
use crate::xref::AccessType;

/// Mnemonic to access type for the NMOS 6502 plus the 65C02 additions.
/// Small enough that a linear scan is fine.
pub static ACCESS_TABLE: &[(&str, AccessType)] = &[
    ("LDA", AccessType::Read),
    ("LDX", AccessType::Read),
    ("LDY", AccessType::Read),
    ("LAX", AccessType::Read),
    ("ADC", AccessType::Read),
    ("SBC", AccessType::Read),
    ("AND", AccessType::Read),
    ("ORA", AccessType::Read),
    ("EOR", AccessType::Read),
    ("STA", AccessType::Write),
    ("STX", AccessType::Write),
    ("STY", AccessType::Write),
    ("STZ", AccessType::Write),
    ("SAX", AccessType::Write),
    ("JSR", AccessType::Call),
    ("JMP", AccessType::Jump),
    ("BCC", AccessType::Branch),
    ("BCS", AccessType::Branch),
    ("BEQ", AccessType::Branch),
    ("BNE", AccessType::Branch),
    ("BMI", AccessType::Branch),
    ("BPL", AccessType::Branch),
    ("BVC", AccessType::Branch),
    ("BVS", AccessType::Branch),
    ("BRA", AccessType::Branch),
    ("CMP", AccessType::Compare),
    ("CPX", AccessType::Compare),
    ("CPY", AccessType::Compare),
    ("INC", AccessType::Modify),
    ("DEC", AccessType::Modify),
    ("ASL", AccessType::Modify),
    ("LSR", AccessType::Modify),
    ("ROL", AccessType::Modify),
    ("ROR", AccessType::Modify),
    ("TSB", AccessType::Modify),
    ("TRB", AccessType::Modify),
    ("BIT", AccessType::BitTest),
];

pub fn access_for(mnemonic: &str) -> Option<AccessType> {
    ACCESS_TABLE
        .iter()
        .find(|(m, _)| m.eq_ignore_ascii_case(mnemonic))
        .map(|(_, access)| *access)
}

pub struct Mos6502Classifier;

impl Mos6502Classifier {
    pub fn new() -> Self {
        Self
    }

    /// Classifies one instruction given the decoder's operand value.
    /// Immediate and operand-less forms never reference memory.
    pub fn classify_operand(&self, mnemonic: &str, operand: Option<u16>, text: &str) -> Option<ClassifiedRef> {
        let access = match access_for(mnemonic) {
            Some(a) => a,
            None => {
                log::trace!("6502: no access class for {}", mnemonic);
                return None;
            }
        };

        let (_, operands) = split_instruction(text);
        let first = operands.first().map(String::as_str).unwrap_or("");
        if first.starts_with('#') {
            return None;
        }

        let target = operand.or_else(|| operand_address(first))?;

        if first.starts_with('(') {
            return Some(ClassifiedRef::new(target, AccessType::Pointer).with_context("indirect"));
        }

        let reference = ClassifiedRef::new(target, access);
        let index = operands.get(1).map(|s| s.to_uppercase());
        Some(match index.as_deref() {
            Some("X") => reference.with_context("indexed,X"),
            Some("Y") => reference.with_context("indexed,Y"),
            _ => reference,
        })
    }
}

fn operand_address(token: &str) -> Option<u16> {
    let token = token.trim_start_matches('(');
    let token = token.split(|c| c == ',' || c == ')').next().unwrap_or(token);
    parse_number(token)
}

impl Default for Mos6502Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for Mos6502Classifier {
    fn architecture(&self) -> Architecture {
        Architecture::Mos6502
    }

    fn classify(&self, insn: &DecodedInstruction) -> Vec<ClassifiedRef> {
        self.classify_operand(&insn.mnemonic, insn.resolved, &insn.text)
            .into_iter()
            .collect()
    }
}
