// Tue Jan 13 2026 - Alex

use crate::arch::operand::{parse_number, Resolution};
use crate::arch::{Architecture, ClassifiedRef, Classifier, DecodedInstruction};
use crate::xref::AccessType;
use once_cell::sync::Lazy;
use regex::Regex;

static MEMORY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\s*([^()]+?)\s*\)$").unwrap());
static REG_INDIRECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\(\s*(BC|DE|HL|SP)\s*\)$").unwrap());
static PORT_C: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\(\s*C\s*\)$").unwrap());
static INDEXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\(\s*(IX|IY)\s*(?:([+-])\s*([^)]+?))?\s*\)$").unwrap());
static REGISTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(A|B|C|D|E|H|L|I|R|AF'?|BC|DE|HL|SP|IX|IY|IXH|IXL|IYH|IYL)$").unwrap()
});
static CONDITION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(NZ|Z|NC|PO|PE|P|M)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Load,
    Exchange,
    ReadModifyWrite,
    BitTest,
    Compare,
    Alu,
    Input,
    Output,
    Call,
    Restart,
    Jump,
    Branch,
}

impl Category {
    fn of(mnemonic: &str) -> Option<Self> {
        let category = match mnemonic.to_uppercase().as_str() {
            "LD" => Self::Load,
            "EX" => Self::Exchange,
            "INC" | "DEC" | "RLC" | "RRC" | "RL" | "RR" | "SLA" | "SRA" | "SRL" | "SLL" | "SET" | "RES" => {
                Self::ReadModifyWrite
            }
            "BIT" => Self::BitTest,
            "CP" => Self::Compare,
            "ADD" | "ADC" | "SUB" | "SBC" | "AND" | "OR" | "XOR" => Self::Alu,
            "IN" => Self::Input,
            "OUT" => Self::Output,
            "CALL" => Self::Call,
            "RST" => Self::Restart,
            "JP" => Self::Jump,
            "JR" | "DJNZ" => Self::Branch,
            _ => return None,
        };
        Some(category)
    }

    fn control_access(&self) -> Option<AccessType> {
        match self {
            Self::Call | Self::Restart => Some(AccessType::Call),
            Self::Jump => Some(AccessType::Jump),
            Self::Branch => Some(AccessType::Branch),
            _ => None,
        }
    }

    fn is_port(&self) -> bool {
        matches!(self, Self::Input | Self::Output)
    }

    /// Access types for a memory operand at `position` (0 = destination).
    fn data_access(&self, position: usize) -> &'static [AccessType] {
        match (self, position) {
            (Self::Load, 0) => &[AccessType::Write],
            (Self::Load, _) => &[AccessType::Read],
            (Self::Exchange, _) => &[AccessType::Read, AccessType::Write],
            (Self::ReadModifyWrite, _) => &[AccessType::Modify],
            (Self::BitTest, _) => &[AccessType::BitTest],
            (Self::Compare, _) => &[AccessType::Compare],
            (Self::Alu, _) => &[AccessType::Read],
            (Self::Input, 0) => &[],
            (Self::Input, _) => &[AccessType::Read],
            (Self::Output, 0) => &[AccessType::Write],
            (Self::Output, _) => &[],
            _ => &[],
        }
    }
}

/// Addressing mode of a single Z80 operand token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Z80Operand {
    Register(String),
    Condition(String),
    RegisterIndirect(String),
    Indexed { base: String, displacement: i16 },
    Absolute(u16),
    PortIndirect,
    Immediate(u16),
    Unknown(String),
}

impl Z80Operand {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if PORT_C.is_match(token) {
            return Self::PortIndirect;
        }
        if let Some(c) = REG_INDIRECT.captures(token) {
            return Self::RegisterIndirect(c[1].to_uppercase());
        }
        if let Some(c) = INDEXED.captures(token) {
            let magnitude = match c.get(3) {
                Some(m) => parse_number(m.as_str()).and_then(|n| i16::try_from(n).ok()),
                None => Some(0),
            };
            let displacement = match magnitude {
                Some(n) if c.get(2).map(|m| m.as_str()) == Some("-") => n.checked_neg(),
                other => other,
            };
            return match displacement {
                Some(displacement) => Self::Indexed {
                    base: c[1].to_uppercase(),
                    displacement,
                },
                None => Self::Unknown(token.to_string()),
            };
        }
        if let Some(c) = MEMORY.captures(token) {
            return match parse_number(&c[1]) {
                Some(addr) => Self::Absolute(addr),
                None => Self::Unknown(token.to_string()),
            };
        }
        if REGISTER.is_match(token) {
            return Self::Register(token.to_uppercase());
        }
        if CONDITION.is_match(token) {
            return Self::Condition(token.to_uppercase());
        }
        match parse_number(token) {
            Some(value) => Self::Immediate(value),
            None => Self::Unknown(token.to_string()),
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Self::RegisterIndirect(_) | Self::Indexed { .. } | Self::Absolute(_))
    }

    /// Only literal numbers resolve; register-based forms need run-time state.
    pub fn address(&self) -> Resolution {
        match self {
            Self::Absolute(addr) | Self::Immediate(addr) => Resolution::Resolved(*addr),
            _ => Resolution::Unresolved,
        }
    }

    fn context(&self) -> String {
        match self {
            Self::RegisterIndirect(reg) => format!("register indirect ({})", reg),
            Self::Indexed { base, displacement } => format!("indexed ({}{:+})", base, displacement),
            Self::Absolute(_) => "absolute".to_string(),
            Self::PortIndirect => "port (C)".to_string(),
            _ => "operand".to_string(),
        }
    }
}

pub struct Z80Classifier {
    operand_heuristic: bool,
}

impl Z80Classifier {
    pub fn new() -> Self {
        Self {
            operand_heuristic: true,
        }
    }

    pub fn with_operand_heuristic(mut self, enabled: bool) -> Self {
        self.operand_heuristic = enabled;
        self
    }

    /// Token-shape classification over the operand text. `resolved` stands in
    /// whenever the text alone yields no address.
    pub fn classify_text(&self, mnemonic: &str, operands: &[&str], resolved: Option<u16>) -> Vec<ClassifiedRef> {
        let category = match Category::of(mnemonic) {
            Some(c) => c,
            None => {
                log::trace!("Z80: no access class for {}", mnemonic);
                return Vec::new();
            }
        };

        if let Some(access) = category.control_access() {
            return control_flow(category, access, operands, resolved, |token| {
                if MEMORY.is_match(token.trim()) {
                    Resolution::Unresolved
                } else {
                    Resolution::from_option(parse_number(token))
                }
            });
        }

        let memory = operands.iter().enumerate().find(|(_, token)| {
            let token = token.trim();
            MEMORY.is_match(token) && (category.is_port() || !PORT_C.is_match(token))
        });

        match memory {
            Some((position, token)) => {
                let token = token.trim();
                let literal = MEMORY.captures(token).and_then(|c| parse_number(&c[1]));
                let target = match Resolution::from_option(literal).or(resolved).address() {
                    Some(t) => t,
                    None => return Vec::new(),
                };
                let context = if category.is_port() {
                    "port".to_string()
                } else if category == Category::Exchange {
                    "exchange".to_string()
                } else if literal.is_some() {
                    "absolute".to_string()
                } else if INDEXED.is_match(token) {
                    "indexed".to_string()
                } else {
                    "register indirect".to_string()
                };
                emit(target, category.data_access(position), &context)
            }
            None => match resolved {
                // No memory-shaped token; trust the decoder's operand and
                // treat it as the source side of the instruction.
                Some(target) => emit(target, category.data_access(1), "operand"),
                None => Vec::new(),
            },
        }
    }

    /// Parses every operand into an addressing mode first and only emits
    /// when an address is known, literally or through `resolved`.
    pub fn classify_parts(&self, mnemonic: &str, operands: &[&str], resolved: Option<u16>) -> Vec<ClassifiedRef> {
        let category = match Category::of(mnemonic) {
            Some(c) => c,
            None => return Vec::new(),
        };
        if let Some(access) = category.control_access() {
            return control_flow(category, access, operands, resolved, |token| Z80Operand::parse(token).address());
        }

        let parsed: Vec<Z80Operand> = operands.iter().map(|t| Z80Operand::parse(t)).collect();

        let memory = parsed.iter().enumerate().find(|(_, op)| {
            op.is_memory() || (category.is_port() && matches!(op, Z80Operand::PortIndirect))
        });
        let (position, operand) = match memory {
            Some(found) => found,
            None => return Vec::new(),
        };

        match operand.address().or(resolved) {
            Resolution::Resolved(target) => {
                let context = if category.is_port() { "port".to_string() } else { operand.context() };
                emit(target, category.data_access(position), &context)
            }
            Resolution::Unresolved => Vec::new(),
        }
    }
}

fn control_flow<F>(
    category: Category,
    access: AccessType,
    operands: &[&str],
    resolved: Option<u16>,
    resolve: F,
) -> Vec<ClassifiedRef>
where
    F: Fn(&str) -> Resolution,
{
    let last = match operands.last() {
        Some(token) => *token,
        None => return Vec::new(),
    };
    let mut target = resolve(last).or(resolved);
    if category == Category::Restart {
        // `RST 7` style vector numbers
        if let Resolution::Resolved(n) = target {
            if n < 8 {
                target = Resolution::Resolved(n * 8);
            }
        }
    }
    let target = match target.address() {
        Some(t) => t,
        None => return Vec::new(),
    };
    let reference = ClassifiedRef::new(target, access);
    let reference = if category == Category::Restart {
        reference.with_context("restart")
    } else if operands.len() > 1 {
        reference.with_context("conditional")
    } else {
        reference
    };
    vec![reference]
}

fn emit(target: u16, accesses: &[AccessType], context: &str) -> Vec<ClassifiedRef> {
    accesses
        .iter()
        .map(|access| ClassifiedRef::new(target, *access).with_context(context))
        .collect()
}

impl Default for Z80Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for Z80Classifier {
    fn architecture(&self) -> Architecture {
        Architecture::Z80
    }

    fn classify(&self, insn: &DecodedInstruction) -> Vec<ClassifiedRef> {
        self.classify_text(&insn.mnemonic, &insn.operand_refs(), insn.resolved)
    }

    fn classify_detailed(&self, insn: &DecodedInstruction) -> Vec<ClassifiedRef> {
        self.classify_parts(&insn.mnemonic, &insn.operand_refs(), insn.resolved)
    }

    /// Heuristic for decoders that hand over integer operands instead of
    /// text. Any value that fits in 16 bits is taken as a memory address,
    /// which over-reports small immediates.
    fn classify_operands(&self, mnemonic: &str, destination: Option<i64>, source: Option<i64>) -> Vec<ClassifiedRef> {
        if !self.operand_heuristic {
            return Vec::new();
        }
        let category = match Category::of(mnemonic) {
            Some(c) => c,
            None => return Vec::new(),
        };
        let plausible = |value: Option<i64>| value.and_then(|v| u16::try_from(v).ok());
        let (dst, src) = (plausible(destination), plausible(source));

        if let Some(access) = category.control_access() {
            return dst
                .map(|t| vec![ClassifiedRef::new(t, access).with_context("heuristic")])
                .unwrap_or_default();
        }

        let mut refs = Vec::new();
        match category {
            Category::Load | Category::Exchange => {
                if let Some(t) = dst {
                    refs.extend(emit(t, category.data_access(0), "heuristic"));
                }
                if let Some(t) = src {
                    refs.extend(emit(t, category.data_access(1), "heuristic"));
                }
            }
            _ => match (dst, src) {
                (_, Some(t)) => refs.extend(emit(t, category.data_access(1), "heuristic")),
                (Some(t), None) => refs.extend(emit(t, category.data_access(0), "heuristic")),
                (None, None) => {}
            },
        }
        refs
    }
}
