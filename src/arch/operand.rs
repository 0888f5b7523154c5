// Tue Jan 13 2026 - Alex

use once_cell::sync::Lazy;
use regex::Regex;

static HEX_DOLLAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$([0-9A-Fa-f]+)$").unwrap());
static HEX_C: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0[xX]([0-9A-Fa-f]+)$").unwrap());
static HEX_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9][0-9A-Fa-f]*)[hH]$").unwrap());
static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Outcome of pulling a concrete address out of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Resolved(u16),
    Unresolved,
}

impl Resolution {
    pub fn from_option(value: Option<u16>) -> Self {
        match value {
            Some(addr) => Self::Resolved(addr),
            None => Self::Unresolved,
        }
    }

    /// Falls back to a caller-supplied address when extraction failed.
    pub fn or(self, fallback: Option<u16>) -> Self {
        match self {
            Self::Resolved(_) => self,
            Self::Unresolved => Self::from_option(fallback),
        }
    }

    pub fn address(&self) -> Option<u16> {
        match self {
            Self::Resolved(addr) => Some(*addr),
            Self::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Parses `$hex`, `0xhex`, `hexh` and plain decimal. Anything wider than
/// 16 bits is rejected.
pub fn parse_number(token: &str) -> Option<u16> {
    let token = token.trim();
    let (digits, radix) = if let Some(c) = HEX_DOLLAR.captures(token) {
        (c.get(1)?.as_str(), 16)
    } else if let Some(c) = HEX_C.captures(token) {
        (c.get(1)?.as_str(), 16)
    } else if DECIMAL.is_match(token) {
        (token, 10)
    } else if let Some(c) = HEX_SUFFIX.captures(token) {
        (c.get(1)?.as_str(), 16)
    } else {
        return None;
    };
    let value = u32::from_str_radix(digits, radix).ok()?;
    u16::try_from(value).ok()
}

/// Splits rendered assembly into an upper-cased mnemonic and its operands.
/// Commas inside parentheses do not split.
pub fn split_instruction(text: &str) -> (String, Vec<String>) {
    let text = text.trim();
    let text = match text.find(';') {
        Some(pos) => text[..pos].trim_end(),
        None => text,
    };
    let (mnemonic, rest) = match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], text[pos..].trim()),
        None => (text, ""),
    };
    (mnemonic.to_uppercase(), split_operands(rest))
}

pub fn split_operands(operands: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for ch in operands.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth <= 0 => {
                result.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        result.push(current.trim().to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("$D020"), Some(0xD020));
        assert_eq!(parse_number("0xea31"), Some(0xEA31));
        assert_eq!(parse_number("0FFh"), Some(0xFF));
        assert_eq!(parse_number("1234H"), Some(0x1234));
        assert_eq!(parse_number("4660"), Some(4660));
        assert_eq!(parse_number(" 12 "), Some(12));
    }

    #[test]
    fn test_parse_number_rejects() {
        assert_eq!(parse_number("HL"), None);
        assert_eq!(parse_number("$10000"), None);
        assert_eq!(parse_number("70000"), None);
        assert_eq!(parse_number("#$10"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_suffix_hex_needs_leading_digit() {
        assert_eq!(parse_number("BEACH"), None);
        assert_eq!(parse_number("CACH"), None);
        assert_eq!(parse_number("DEADH"), None);
        assert_eq!(parse_number("0BEACH"), Some(0xBEAC));
    }

    #[test]
    fn test_split_instruction() {
        let (m, ops) = split_instruction("ld (ix+5),a ; store");
        assert_eq!(m, "LD");
        assert_eq!(ops, vec!["(ix+5)", "a"]);

        let (m, ops) = split_instruction("LDA ($FB),Y");
        assert_eq!(m, "LDA");
        assert_eq!(ops, vec!["($FB)", "Y"]);

        let (m, ops) = split_instruction("RTS");
        assert_eq!(m, "RTS");
        assert!(ops.is_empty());
    }

    #[test]
    fn test_split_keeps_parenthesised_commas() {
        assert_eq!(split_operands("($20,X)"), vec!["($20,X)"]);
    }

    #[test]
    fn test_resolution_fallback() {
        assert_eq!(Resolution::Unresolved.or(Some(0x4000)), Resolution::Resolved(0x4000));
        assert_eq!(Resolution::Resolved(1).or(Some(0x4000)), Resolution::Resolved(1));
        assert!(!Resolution::Unresolved.or(None).is_resolved());
        assert_eq!(Resolution::Resolved(7).address(), Some(7));
    }
}
