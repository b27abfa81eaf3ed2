use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use strum::EnumString;

use crate::block::Block;
use crate::constants::{opcode_table, INTERMEDIATE_FILE};
use crate::errors::{ErrorCode, ErrorLog};
use crate::line::{
    byte_constant_length, columns, is_hex_literal, parse_int, validate_operand, validate_symbol,
};
use crate::Assembler;

/// Assembler directives. Anything else in the mnemonic column is either an
/// instruction or an error.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Directive {
    START,
    END,
    BYTE,
    WORD,
    RESB,
    RESW,
}

impl Assembler {
    /// Pass 1: lex and validate every source line, assign addresses through
    /// the location counter, build the symbol table, and stream a five-line
    /// block per processed line to the intermediate file.
    ///
    /// # Errors
    ///
    /// Only for I/O failures; diagnostics in the source are accumulated
    /// into the intermediate file instead.
    pub fn pass1(&mut self, source: impl AsRef<Path>) -> Result<()> {
        let source = source.as_ref();
        let reader = BufReader::new(
            File::open(source)
                .with_context(|| format!("failed to load {}", source.display()))?,
        );
        let mut intermediate = BufWriter::new(
            File::create(self.artifact(INTERMEDIATE_FILE))
                .context("creating the intermediate file")?,
        );

        let mut start_found = false;

        for source_line in reader.lines() {
            let source_line = source_line?;
            if source_line.is_empty() || source_line.starts_with('.') {
                continue;
            }

            let source_line = source_line.to_uppercase();
            let cols = columns(&source_line);
            if cols.is_empty() {
                continue;
            }

            let mut errors = ErrorLog::new();
            let directive = Directive::from_str(&cols.mnemonic).ok();

            if directive == Some(Directive::START) {
                if start_found {
                    errors.push(ErrorCode::MisplacedStart);
                    self.any_errors = true;
                }
                start_found = true;

                if !cols.label.is_empty() && !validate_symbol(&cols.label, &mut errors) {
                    errors.push(ErrorCode::InvalidSymbol);
                }

                self.locctr = 0;
                if cols.operand.is_empty() {
                    errors.push(ErrorCode::MissingStartOperand);
                } else if let Some(address) = parse_int(&cols.operand, 16) {
                    self.locctr = address;
                } else {
                    errors.push(ErrorCode::IllegalStartOperand);
                }
                self.starting_address = self.locctr;

                let block = Block::new(
                    &source_line,
                    cols.mnemonic.clone(),
                    self.locctr,
                    &cols.operand,
                    &errors,
                );
                write!(intermediate, "{block}")?;
                continue;
            }

            // The program simply begins at address zero without a START.
            if !start_found {
                start_found = true;
                self.locctr = 0;
                self.starting_address = 0;
            }

            if !matches!(
                directive,
                Some(Directive::BYTE | Directive::WORD | Directive::RESW | Directive::RESB)
            ) && !validate_operand(&cols.operand, &mut errors)
            {
                errors.push(ErrorCode::InvalidOperand);
            }

            if directive == Some(Directive::END) {
                if !validate_symbol(&cols.operand, &mut errors) && !is_hex_literal(&cols.operand) {
                    errors.push(ErrorCode::IllegalEndOperand);
                }
                let block = Block::new(
                    &source_line,
                    cols.mnemonic.clone(),
                    self.locctr,
                    &cols.operand,
                    &errors,
                );
                write!(intermediate, "{block}")?;
                self.program_length = self.locctr - self.starting_address;
                break;
            }

            if !cols.label.is_empty() {
                if self.symbols.contains(&cols.label) {
                    errors.push(ErrorCode::DuplicateSymbol);
                } else {
                    if !validate_symbol(&cols.label, &mut errors) {
                        errors.push(ErrorCode::InvalidSymbol);
                    }
                    // The address is assigned even when the name is bad.
                    self.symbols.add(cols.label.clone(), self.locctr);
                }
            }

            let mut opcode = None;
            let size = match directive {
                Some(Directive::WORD) => {
                    if parse_int(&cols.operand, 10).is_none() {
                        errors.push(ErrorCode::InvalidOperand);
                    }
                    3
                }
                Some(Directive::RESW) => match parse_int(&cols.operand, 10) {
                    Some(count) => count.saturating_mul(3),
                    None => {
                        errors.push(ErrorCode::InvalidOperand);
                        0
                    }
                },
                Some(Directive::RESB) => match parse_int(&cols.operand, 10) {
                    Some(count) => count,
                    None => {
                        errors.push(ErrorCode::InvalidOperand);
                        0
                    }
                },
                Some(Directive::BYTE) => match byte_constant_length(&cols.operand, &mut errors) {
                    Some(length) => length,
                    None => {
                        errors.push(ErrorCode::InvalidOperand);
                        0
                    }
                },
                _ => match opcode_table().get(cols.mnemonic.as_str()) {
                    Some(&op) => {
                        opcode = Some(op);
                        3
                    }
                    None => {
                        errors.push(ErrorCode::InvalidOpcode);
                        0
                    }
                },
            };

            let mnemonic = match opcode {
                Some(op) => format!("{op:02x}"),
                None => cols.mnemonic.clone(),
            };
            let block = Block::new(&source_line, mnemonic, self.locctr, &cols.operand, &errors);
            write!(intermediate, "{block}")?;

            self.locctr = self.locctr.saturating_add(size);
        }

        intermediate.flush()?;
        Ok(())
    }
}
