// Tue Jan 13 2026 - Alex

use crate::arch::operand::{parse_number, Resolution};
use crate::arch::{Architecture, ClassifiedRef, Classifier, DecodedInstruction};
use crate::xref::AccessType;
use once_cell::sync::Lazy;
use regex::Regex;

static INDIRECT_REG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^@R([01])$").unwrap());
static INDIRECT_ACC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^@A$").unwrap());
static REGISTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^R([0-7])$").unwrap());
static PORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^P([0-7])$").unwrap());
static BUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^BUS$").unwrap());

/// Sentinel used for the bus port. `@R0`, `@R1` and `P0`..`P2` map to their
/// own index. These collide with real low addresses.
pub const BUS_SENTINEL: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Move,
    External,
    ProgramRead,
    Exchange,
    Alu,
    Logic,
    Nibble,
    Increment,
    Input,
    Output,
    Expander,
    Call,
    Jump,
    Branch,
}

impl Category {
    fn of(mnemonic: &str) -> Option<Self> {
        let upper = mnemonic.to_uppercase();
        let category = match upper.as_str() {
            "MOV" => Self::Move,
            "MOVX" => Self::External,
            "MOVP" | "MOVP3" => Self::ProgramRead,
            "XCH" | "XCHD" => Self::Exchange,
            "ADD" | "ADDC" | "XRL" => Self::Alu,
            "ANL" | "ORL" => Self::Logic,
            "ANLD" | "ORLD" => Self::Nibble,
            "INC" => Self::Increment,
            "IN" | "INS" => Self::Input,
            "OUTL" => Self::Output,
            "MOVD" => Self::Expander,
            "CALL" => Self::Call,
            "JMP" | "JMPP" => Self::Jump,
            "JC" | "JNC" | "JZ" | "JNZ" | "JT0" | "JNT0" | "JT1" | "JNT1" | "JF0" | "JF1" | "JTF"
            | "JNI" | "DJNZ" => Self::Branch,
            other if other.len() == 3 && other.starts_with("JB") && other.as_bytes()[2].is_ascii_digit() => {
                if other.as_bytes()[2] <= b'7' {
                    Self::Branch
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        Some(category)
    }

    fn control_access(&self) -> Option<AccessType> {
        match self {
            Self::Call => Some(AccessType::Call),
            Self::Jump => Some(AccessType::Jump),
            Self::Branch => Some(AccessType::Branch),
            _ => None,
        }
    }

    fn data_access(&self, position: usize) -> &'static [AccessType] {
        match (self, position) {
            (Self::Move | Self::External | Self::Expander, 0) => &[AccessType::Write],
            (Self::Move | Self::External | Self::Expander, _) => &[AccessType::Read],
            (Self::ProgramRead, _) => &[AccessType::Read],
            (Self::Exchange, _) => &[AccessType::Read, AccessType::Write],
            (Self::Alu, 0) => &[],
            (Self::Alu, _) => &[AccessType::Read],
            (Self::Logic, 0) => &[AccessType::Modify],
            (Self::Logic, _) => &[AccessType::Read],
            (Self::Nibble, 0) => &[AccessType::Modify],
            (Self::Increment, _) => &[AccessType::Modify],
            (Self::Input, 0) => &[],
            (Self::Input, _) => &[AccessType::Read],
            (Self::Output, 0) => &[AccessType::Write],
            _ => &[],
        }
    }
}

/// Addressing mode of a single 8048 operand token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I8048Operand {
    Accumulator,
    Register(u8),
    IndirectRegister(u8),
    IndirectAccumulator,
    Port(u8),
    Bus,
    Immediate(u16),
    Direct(u16),
    Other(String),
}

impl I8048Operand {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("A") {
            return Self::Accumulator;
        }
        if let Some(c) = INDIRECT_REG.captures(token) {
            return Self::IndirectRegister(c[1].parse().unwrap_or(0));
        }
        if INDIRECT_ACC.is_match(token) {
            return Self::IndirectAccumulator;
        }
        if let Some(c) = REGISTER.captures(token) {
            return Self::Register(c[1].parse().unwrap_or(0));
        }
        if let Some(c) = PORT.captures(token) {
            return Self::Port(c[1].parse().unwrap_or(0));
        }
        if BUS.is_match(token) {
            return Self::Bus;
        }
        if let Some(value) = token.strip_prefix('#') {
            return match parse_number(value) {
                Some(v) => Self::Immediate(v),
                None => Self::Other(token.to_string()),
            };
        }
        match parse_number(token) {
            Some(addr) => Self::Direct(addr),
            None => Self::Other(token.to_string()),
        }
    }

    /// Operands that touch data memory or an I/O port.
    pub fn is_memory(&self) -> bool {
        matches!(
            self,
            Self::IndirectRegister(_) | Self::IndirectAccumulator | Self::Port(_) | Self::Bus
        )
    }

    pub fn address(&self) -> Resolution {
        match self {
            Self::Direct(addr) => Resolution::Resolved(*addr),
            Self::IndirectRegister(n) => Resolution::Resolved(*n as u16),
            Self::Port(n) if *n <= 2 => Resolution::Resolved(*n as u16),
            Self::Bus => Resolution::Resolved(BUS_SENTINEL),
            _ => Resolution::Unresolved,
        }
    }

    fn context(&self, category: Category) -> String {
        match self {
            Self::IndirectRegister(n) if category == Category::External => format!("external @R{} (approx.)", n),
            Self::IndirectRegister(n) => format!("indirect @R{} (approx.)", n),
            Self::IndirectAccumulator => "program memory @A".to_string(),
            Self::Port(n) => format!("port P{}", n),
            Self::Bus => "bus".to_string(),
            Self::Direct(_) => "direct".to_string(),
            _ => "operand".to_string(),
        }
    }
}

pub struct I8048Classifier;

impl I8048Classifier {
    pub fn new() -> Self {
        Self
    }

    /// Token-shape pass: finds the first `@Rn`, `@A`, `Pn` or `BUS` token and
    /// maps it to its sentinel, or uses `resolved` when there is none.
    pub fn classify_text(&self, mnemonic: &str, operands: &[&str], resolved: Option<u16>) -> Vec<ClassifiedRef> {
        let category = match Category::of(mnemonic) {
            Some(c) => c,
            None => {
                log::trace!("8048: no access class for {}", mnemonic);
                return Vec::new();
            }
        };

        if let Some(access) = category.control_access() {
            return control_flow(access, operands, resolved);
        }

        let memory = operands.iter().enumerate().find(|(_, token)| {
            let token = token.trim();
            INDIRECT_REG.is_match(token) || INDIRECT_ACC.is_match(token) || PORT.is_match(token) || BUS.is_match(token)
        });

        match memory {
            Some((position, token)) => {
                let token = token.trim();
                let sentinel = if let Some(c) = INDIRECT_REG.captures(token) {
                    c[1].parse::<u16>().ok()
                } else if let Some(c) = PORT.captures(token) {
                    c[1].parse::<u16>().ok().filter(|n| *n <= 2)
                } else if BUS.is_match(token) {
                    Some(BUS_SENTINEL)
                } else {
                    None
                };
                let target = match Resolution::from_option(sentinel).or(resolved).address() {
                    Some(t) => t,
                    None => return Vec::new(),
                };
                let context = I8048Operand::parse(token).context(category);
                emit(target, category.data_access(position), &context)
            }
            None => match resolved {
                Some(target) => emit(target, category.data_access(1), "operand"),
                None => Vec::new(),
            },
        }
    }

    /// Parses operands into addressing modes, then classifies by mnemonic and
    /// operand position. Control flow needs a resolved target.
    pub fn classify_parts(&self, mnemonic: &str, operands: &[&str], resolved: Option<u16>) -> Vec<ClassifiedRef> {
        let category = match Category::of(mnemonic) {
            Some(c) => c,
            None => return Vec::new(),
        };

        if let Some(access) = category.control_access() {
            let target = operands
                .last()
                .map(|t| I8048Operand::parse(t).address())
                .unwrap_or(Resolution::Unresolved)
                .or(resolved);
            let indirect = operands.last().map_or(false, |t| INDIRECT_ACC.is_match(t.trim()));
            return match target {
                Resolution::Resolved(t) if indirect => vec![ClassifiedRef::new(t, access).with_context("indirect @A")],
                Resolution::Resolved(t) => vec![ClassifiedRef::new(t, access)],
                Resolution::Unresolved => Vec::new(),
            };
        }

        let parsed: Vec<I8048Operand> = operands.iter().map(|t| I8048Operand::parse(t)).collect();
        let (position, operand) = match parsed.iter().enumerate().find(|(_, op)| op.is_memory()) {
            Some(found) => found,
            None => return Vec::new(),
        };

        match operand.address().or(resolved) {
            Resolution::Resolved(target) => emit(target, category.data_access(position), &operand.context(category)),
            Resolution::Unresolved => Vec::new(),
        }
    }
}

fn control_flow(access: AccessType, operands: &[&str], resolved: Option<u16>) -> Vec<ClassifiedRef> {
    let last = match operands.last() {
        Some(token) => token.trim(),
        None => return Vec::new(),
    };
    let indirect = INDIRECT_ACC.is_match(last);
    let literal = if indirect { None } else { parse_number(last) };
    match Resolution::from_option(literal).or(resolved) {
        Resolution::Resolved(target) => {
            let reference = ClassifiedRef::new(target, access);
            if indirect {
                vec![reference.with_context("indirect @A")]
            } else {
                vec![reference]
            }
        }
        Resolution::Unresolved => Vec::new(),
    }
}

fn emit(target: u16, accesses: &[AccessType], context: &str) -> Vec<ClassifiedRef> {
    accesses
        .iter()
        .map(|access| ClassifiedRef::new(target, *access).with_context(context))
        .collect()
}

impl Default for I8048Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for I8048Classifier {
    fn architecture(&self) -> Architecture {
        Architecture::I8048
    }

    fn classify(&self, insn: &DecodedInstruction) -> Vec<ClassifiedRef> {
        self.classify_text(&insn.mnemonic, &insn.operand_refs(), insn.resolved)
    }

    fn classify_detailed(&self, insn: &DecodedInstruction) -> Vec<ClassifiedRef> {
        self.classify_parts(&insn.mnemonic, &insn.operand_refs(), insn.resolved)
    }
}
