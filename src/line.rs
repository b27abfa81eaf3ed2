use crate::constants::hex_regex;
use crate::errors::{ErrorCode, ErrorLog};

/// Column delimiters for source lines.
const DELIMS: &[char] = &[' ', '\t'];

/// The three meaningful columns of a source line. Anything past the operand
/// column is comment text and is dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Columns {
    pub label: String,
    pub mnemonic: String,
    pub operand: String,
}

impl Columns {
    pub fn is_empty(&self) -> bool {
        self.label.is_empty() && self.mnemonic.is_empty() && self.operand.is_empty()
    }
}

/// Splits an upper-cased source line into label, mnemonic, and operand.
/// A line that opens with a delimiter has an empty label column.
pub fn columns(line: &str) -> Columns {
    let mut fields = line.split(DELIMS).filter(|field| !field.is_empty());

    let label = if line.starts_with(DELIMS) {
        String::new()
    } else {
        fields.next().unwrap_or_default().to_owned()
    };

    Columns {
        label,
        mnemonic: fields.next().unwrap_or_default().to_owned(),
        operand: fields.next().unwrap_or_default().to_owned(),
    }
}

/// A symbol is at most six characters, starts with a letter, and contains
/// only alphanumerics. Pushes the specific failure code; the caller decides
/// whether a generic code follows.
pub fn validate_symbol(symbol: &str, errors: &mut ErrorLog) -> bool {
    if symbol.len() > 6 {
        errors.push(ErrorCode::SymbolTooLong);
        return false;
    }
    if !symbol
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic())
    {
        errors.push(ErrorCode::NonLetterSymbolStart);
        return false;
    }
    if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(ErrorCode::NonAlphanumericSymbol);
        return false;
    }
    true
}

/// Shape check for instruction operands; BYTE/WORD/RESW/RESB operands are
/// validated by their own handlers. An operand that opens with a zero must
/// be hex over its whole text, so an indexed hex operand never passes.
pub fn validate_operand(operand: &str, errors: &mut ErrorLog) -> bool {
    if operand.is_empty() {
        return false;
    }
    if operand.starts_with('0') && !is_hex_literal(operand) {
        return false;
    }

    // ",X" alone is not an indexed operand, there must be something before it.
    let body = if operand.len() >= 3 {
        operand.strip_suffix(",X").unwrap_or(operand)
    } else {
        operand
    };
    if !body.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(ErrorCode::NonAlphanumericOperand);
        return false;
    }
    true
}

/// A hex literal starts with a decimal digit and continues with hex digits.
pub fn is_hex_literal(text: &str) -> bool {
    hex_regex().is_match(text)
}

/// Unsigned digit-only integer parse; signs are not accepted.
pub fn parse_int(text: &str, radix: u32) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    u32::from_str_radix(text, radix).ok()
}

/// Size contribution of a BYTE operand, in bytes. Failure paths push their
/// specific code where one exists; the caller adds the generic invalid
/// operand code whenever this returns None.
pub fn byte_constant_length(operand: &str, errors: &mut ErrorLog) -> Option<u32> {
    if operand.len() < 4 {
        return None;
    }
    let bytes = operand.as_bytes();
    if bytes[0] != b'C' && bytes[0] != b'X' {
        errors.push(ErrorCode::BadSpecifier);
        return None;
    }
    if bytes[1] != b'\'' || bytes[bytes.len() - 1] != b'\'' {
        errors.push(ErrorCode::MissingQuotes);
        return None;
    }

    let inner = &operand[2..operand.len() - 1];
    if bytes[0] == b'C' {
        if inner.len() > 30 {
            errors.push(ErrorCode::StringTooLong);
            return None;
        }
        return Some(inner.len() as u32);
    }

    if !inner.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    if inner.len() > 32 {
        errors.push(ErrorCode::HexTooLong);
        return None;
    }
    if inner.len() % 2 == 1 {
        errors.push(ErrorCode::OddHexCount);
        return None;
    }
    Some(inner.len() as u32 / 2)
}
