use std::fmt::Write;

use itertools::Itertools;
use thiserror::Error;

/// Diagnostics accumulated while analyzing a source line. The four-digit
/// wire form is what pass 1 writes to the intermediate file; the Display
/// text is what the listing reports.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    #[error("Invalid Operand")]
    InvalidOperand,
    #[error("Duplicate Symbol")]
    DuplicateSymbol,
    #[error("Invalid Opcode")]
    InvalidOpcode,
    #[error("Invalid Symbol")]
    InvalidSymbol,
    #[error("Missing Quotes")]
    MissingQuotes,
    #[error("Odd number of hex digits")]
    OddHexCount,
    #[error("String too long")]
    StringTooLong,
    #[error("Hex too long")]
    HexTooLong,
    #[error("Specifier must be C or X")]
    BadSpecifier,
    #[error("Symbol too long")]
    SymbolTooLong,
    #[error("Symbol starts with a non-letter character")]
    NonLetterSymbolStart,
    #[error("Symbol contains non-alphanumeric characters")]
    NonAlphanumericSymbol,
    #[error("Operand contains non-alphanumeric characters")]
    NonAlphanumericOperand,
    #[error("Missing START operand")]
    MissingStartOperand,
    #[error("Misplaced/Duplicate START")]
    MisplacedStart,
    #[error("Illegal START Operand")]
    IllegalStartOperand,
    #[error("Illegal END operand")]
    IllegalEndOperand,
}

impl ErrorCode {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::InvalidOperand => "0001",
            ErrorCode::DuplicateSymbol => "0002",
            ErrorCode::InvalidOpcode => "0003",
            ErrorCode::InvalidSymbol => "0004",
            ErrorCode::MissingQuotes => "0005",
            ErrorCode::OddHexCount => "0006",
            ErrorCode::StringTooLong => "0007",
            ErrorCode::HexTooLong => "0008",
            ErrorCode::BadSpecifier => "0009",
            ErrorCode::SymbolTooLong => "0010",
            ErrorCode::NonLetterSymbolStart => "0011",
            ErrorCode::NonAlphanumericSymbol => "0012",
            ErrorCode::NonAlphanumericOperand => "0013",
            ErrorCode::MissingStartOperand => "0014",
            ErrorCode::MisplacedStart => "0015",
            ErrorCode::IllegalStartOperand => "0016",
            ErrorCode::IllegalEndOperand => "0017",
        }
    }

    pub fn from_code(code: &str) -> Option<ErrorCode> {
        Some(match code {
            "0001" => ErrorCode::InvalidOperand,
            "0002" => ErrorCode::DuplicateSymbol,
            "0003" => ErrorCode::InvalidOpcode,
            "0004" => ErrorCode::InvalidSymbol,
            "0005" => ErrorCode::MissingQuotes,
            "0006" => ErrorCode::OddHexCount,
            "0007" => ErrorCode::StringTooLong,
            "0008" => ErrorCode::HexTooLong,
            "0009" => ErrorCode::BadSpecifier,
            "0010" => ErrorCode::SymbolTooLong,
            "0011" => ErrorCode::NonLetterSymbolStart,
            "0012" => ErrorCode::NonAlphanumericSymbol,
            "0013" => ErrorCode::NonAlphanumericOperand,
            "0014" => ErrorCode::MissingStartOperand,
            "0015" => ErrorCode::MisplacedStart,
            "0016" => ErrorCode::IllegalStartOperand,
            "0017" => ErrorCode::IllegalEndOperand,
            _ => return None,
        })
    }
}

/// Error codes collected for one source line, in detection order. A code
/// repeats only when its condition triggers twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorLog {
    codes: Vec<ErrorCode>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: ErrorCode) {
        self.codes.push(code);
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The concatenated wire form written to the intermediate file.
    pub fn to_field(&self) -> String {
        self.codes.iter().map(|code| code.code()).collect()
    }
}

/// Expands a concatenated code field back into listing messages. A trailing
/// fragment shorter than one code is dropped; codes outside the registry go
/// through the defensive channel.
pub fn describe_field(field: &str) -> String {
    let mut described = String::new();
    for chunk in &field.chars().chunks(4) {
        let code: String = chunk.collect();
        if code.len() < 4 {
            break;
        }
        match ErrorCode::from_code(&code) {
            Some(error) => {
                let _ = write!(described, "{}, ", error);
            }
            None => described
                .push_str("Unknown error reported. Something went wrong in the intermediate file.\t"),
        }
    }
    described
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 17] = [
        ErrorCode::InvalidOperand,
        ErrorCode::DuplicateSymbol,
        ErrorCode::InvalidOpcode,
        ErrorCode::InvalidSymbol,
        ErrorCode::MissingQuotes,
        ErrorCode::OddHexCount,
        ErrorCode::StringTooLong,
        ErrorCode::HexTooLong,
        ErrorCode::BadSpecifier,
        ErrorCode::SymbolTooLong,
        ErrorCode::NonLetterSymbolStart,
        ErrorCode::NonAlphanumericSymbol,
        ErrorCode::NonAlphanumericOperand,
        ErrorCode::MissingStartOperand,
        ErrorCode::MisplacedStart,
        ErrorCode::IllegalStartOperand,
        ErrorCode::IllegalEndOperand,
    ];

    #[test]
    fn codes_round_trip() {
        for error in ALL {
            assert_eq!(error.code().len(), 4);
            assert_eq!(ErrorCode::from_code(error.code()), Some(error));
        }
        assert_eq!(ErrorCode::from_code("0018"), None);
        assert_eq!(ErrorCode::from_code("9999"), None);
    }

    #[test]
    fn log_concatenates_in_order() {
        let mut log = ErrorLog::new();
        assert!(log.is_empty());
        log.push(ErrorCode::NonAlphanumericOperand);
        log.push(ErrorCode::InvalidOperand);
        assert_eq!(log.to_field(), "00130001");
    }

    #[test]
    fn field_descriptions() {
        assert_eq!(describe_field(""), "");
        assert_eq!(
            describe_field("00010002"),
            "Invalid Operand, Duplicate Symbol, "
        );
        assert_eq!(
            describe_field("9999"),
            "Unknown error reported. Something went wrong in the intermediate file.\t"
        );
        // A trailing partial code is ignored.
        assert_eq!(describe_field("000100"), "Invalid Operand, ");
    }
}
