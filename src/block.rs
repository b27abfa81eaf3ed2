use std::fmt::{self, Display};
use std::io;

use anyhow::{Context, Result};

use crate::errors::ErrorLog;

/// One five-line block of the intermediate file: the upper-cased source
/// line, the mnemonic (instructions as their two-digit opcode), the
/// location counter in hex, the operand, and the accumulated error codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub source: String,
    pub mnemonic: String,
    pub address: String,
    pub operand: String,
    pub errors: String,
}

impl Block {
    pub fn new(
        source: &str,
        mnemonic: String,
        address: u32,
        operand: &str,
        errors: &ErrorLog,
    ) -> Self {
        Self {
            source: source.to_owned(),
            mnemonic,
            address: format!("{:x}", address),
            operand: operand.to_owned(),
            errors: errors.to_field(),
        }
    }

    /// Reads the next block, if any. A block cut short mid-way is an error.
    pub fn read(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<Block>> {
        let Some(source) = lines.next() else {
            return Ok(None);
        };
        Ok(Some(Block {
            source: source?,
            mnemonic: next_line(lines)?,
            address: next_line(lines)?,
            operand: next_line(lines)?,
            errors: next_line(lines)?,
        }))
    }
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<String> {
    Ok(lines.next().context("truncated intermediate block")??)
}

impl Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.source)?;
        writeln!(f, "{}", self.mnemonic)?;
        writeln!(f, "{}", self.address)?;
        writeln!(f, "{}", self.operand)?;
        writeln!(f, "{}", self.errors)
    }
}
