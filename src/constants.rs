use std::collections::HashMap;

use once_cell::sync::OnceCell;
use regex::Regex;

/// SIC memory ceiling in bytes. Programs that grow past this are rejected.
pub const MSIZE: u32 = 32_768;

/// RSUB encodes with a zeroed operand field even when no operand resolves.
pub const RSUB_OPCODE: u8 = 0x4C;

/// A text record payload carries at most 30 bytes, i.e. 60 hex characters.
pub const TEXT_PAYLOAD_CHARS: usize = 60;

pub const INTERMEDIATE_FILE: &str = "intermediate.txt";
pub const LISTING_FILE: &str = "listing.txt";
pub const OBJECT_FILE: &str = "object.txt";

pub static OPCODES: OnceCell<HashMap<&'static str, u8>> = OnceCell::new();
pub static HEX_REGEX: OnceCell<Regex> = OnceCell::new();
static HEX_REGEX_PATTERN: &str = "^[0-9][0-9A-F]*$";

pub fn opcode_table() -> &'static HashMap<&'static str, u8> {
    OPCODES.get_or_init(|| {
        [
            ("ADD", 0x18),
            ("AND", 0x58),
            ("COMP", 0x28),
            ("DIV", 0x24),
            ("J", 0x3C),
            ("JEQ", 0x30),
            ("JGT", 0x34),
            ("JLT", 0x38),
            ("JSUB", 0x48),
            ("LDA", 0x00),
            ("LDCH", 0x50),
            ("LDL", 0x08),
            ("LDX", 0x04),
            ("MUL", 0x20),
            ("OR", 0x44),
            ("RD", 0xD8),
            ("RSUB", 0x4C),
            ("STA", 0x0C),
            ("STCH", 0x54),
            ("STL", 0x14),
            ("STX", 0x10),
            ("SUB", 0x1C),
            ("TD", 0xE0),
            ("TIX", 0x2C),
            ("WD", 0xDC),
        ]
        .into()
    })
}

/// A hex literal starts with a decimal digit and continues with hex digits.
/// Source text is upper-cased before this ever runs.
pub fn hex_regex() -> &'static Regex {
    HEX_REGEX.get_or_init(|| Regex::new(HEX_REGEX_PATTERN).expect("Invalid hex regex"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_table_covers_instruction_set() {
        assert_eq!(opcode_table().len(), 25);
        assert_eq!(opcode_table().get("LDA"), Some(&0x00));
        assert_eq!(opcode_table().get("RSUB"), Some(&RSUB_OPCODE));
        assert_eq!(opcode_table().get("WD"), Some(&0xDC));
        assert_eq!(opcode_table().get("LDB"), None);
    }

    #[test]
    fn hex_literals() {
        assert!(hex_regex().is_match("0"));
        assert!(hex_regex().is_match("0F1A"));
        assert!(hex_regex().is_match("9ABC"));
        assert!(!hex_regex().is_match("F1A"));
        assert!(!hex_regex().is_match("0F1G"));
        assert!(!hex_regex().is_match(""));
    }
}
