use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};

use crate::block::Block;
use crate::constants::{
    INTERMEDIATE_FILE, LISTING_FILE, MSIZE, OBJECT_FILE, RSUB_OPCODE, TEXT_PAYLOAD_CHARS,
};
use crate::errors::describe_field;
use crate::line::{is_hex_literal, parse_int};
use crate::record::{Record, Text};
use crate::Assembler;

/// Packs object code into text records. A record's address is fixed when it
/// is opened; a reservation directive forces the next record to open at the
/// next line that actually produces code.
#[derive(Default)]
struct TextPacker {
    current: Option<Text>,
    make_new: bool,
}

impl TextPacker {
    fn open(&mut self, address: &str) {
        self.current = Some(Text::new(address));
        self.make_new = false;
    }

    fn defer(&mut self) {
        self.current = None;
        self.make_new = true;
    }

    fn pending_open(&self) -> bool {
        self.make_new
    }

    fn would_overflow(&self, code_len: usize) -> bool {
        self.current
            .as_ref()
            .map_or(false, |text| text.len() + code_len > TEXT_PAYLOAD_CHARS)
    }

    fn push(&mut self, object_code: &str) {
        if let Some(text) = self.current.as_mut() {
            text.push(object_code);
        }
    }

    /// Takes the record if it holds payload; an empty open record stays open.
    fn take_nonempty(&mut self) -> Option<Text> {
        if self.current.as_ref().map_or(false, |text| !text.is_empty()) {
            self.current.take()
        } else {
            None
        }
    }
}

impl Assembler {
    /// Pass 2: replay the intermediate file into the listing and the object
    /// program. The object file is removed again when any line carried
    /// diagnostics, the program overran memory, or END never appeared.
    ///
    /// # Errors
    ///
    /// Only for I/O failures; pass 1 must have produced the intermediate
    /// file first.
    pub fn pass2(&mut self) -> Result<()> {
        let intermediate = File::open(self.artifact(INTERMEDIATE_FILE))
            .context("failed to load the intermediate file")?;
        let mut lines = BufReader::new(intermediate).lines();

        let mut listing = BufWriter::new(
            File::create(self.artifact(LISTING_FILE)).context("creating the listing file")?,
        );
        let object_path = self.artifact(OBJECT_FILE);
        let mut object =
            BufWriter::new(File::create(&object_path).context("creating the object file")?);

        let mut packer = TextPacker::default();
        let mut start_set = false;
        let mut end_found = false;

        while let Some(block) = Block::read(&mut lines)? {
            if !block.errors.is_empty() {
                self.any_errors = true;
            }

            if block.mnemonic == "START" {
                write_listing_line(&mut listing, &block.address, "", &block.source, &block.errors)?;
                if !start_set {
                    // The program is named by the label of the START line.
                    let name: String = block.source.chars().take_while(|&c| c != ' ').collect();
                    let header = Record::Header {
                        name,
                        start: block.address.clone(),
                        length: self.program_length,
                    };
                    writeln!(object, "{header}")?;
                    packer.open(&block.address);
                }
                start_set = true;
                continue;
            }

            if !start_set {
                start_set = true;
                let header = Record::Header {
                    name: "NONAME".to_owned(),
                    start: "00000".to_owned(),
                    length: self.program_length,
                };
                writeln!(object, "{header}")?;
                packer.open(&block.address);
            }

            if block.mnemonic == "END" {
                if let Some(text) = packer.take_nonempty() {
                    writeln!(object, "{}", Record::Text(text))?;
                }
                write_listing_line(&mut listing, "", "", &block.source, &block.errors)?;
                let end = Record::End {
                    first_instruction: self.starting_address,
                };
                writeln!(object, "{end}")?;
                end_found = true;
                break;
            }

            let object_code = if block.errors.is_empty() {
                self.create_object_code(&block.mnemonic, &block.operand)
            } else {
                String::new()
            };
            let shown = if block.errors.is_empty() {
                object_code.as_str()
            } else {
                "------"
            };
            write_listing_line(&mut listing, &block.address, shown, &block.source, &block.errors)?;

            if !object_code.is_empty() && packer.pending_open() {
                packer.open(&block.address);
            }
            if object_code.is_empty() || packer.would_overflow(object_code.len()) {
                if let Some(text) = packer.take_nonempty() {
                    writeln!(object, "{}", Record::Text(text))?;
                    if !object_code.is_empty() {
                        packer.open(&block.address);
                    } else {
                        packer.defer();
                    }
                }
            }
            if !object_code.is_empty() {
                packer.push(&object_code);
            }
        }

        if self.locctr > MSIZE {
            writeln!(
                listing,
                "\nFATAL ERROR\nProgram exceeds maximum memory capacity of {MSIZE} bytes"
            )?;
            writeln!(listing, "Last program address is: {}", self.locctr)?;
            self.any_errors = true;
        }
        if !end_found {
            writeln!(listing, "Error: Missing END directive")?;
            self.any_errors = true;
        }

        listing.flush()?;
        object.flush()?;
        drop(object);
        if self.any_errors {
            fs::remove_file(&object_path).context("removing the failed object file")?;
        }
        Ok(())
    }

    /// Object code for one error-free line, as lowercase hex. Instructions
    /// arrive as their two-digit opcode, directives by name. An empty
    /// result means the line contributes no bytes.
    fn create_object_code(&self, mnemonic: &str, operand: &str) -> String {
        if mnemonic == "RESB" || mnemonic == "RESW" {
            return String::new();
        }

        let indexed = is_indexed(operand);
        let operand = if indexed {
            operand.split(',').next().unwrap_or(operand)
        } else {
            operand
        };

        if mnemonic == "BYTE" {
            return byte_object_code(operand);
        }
        if mnemonic == "WORD" {
            return parse_int(operand, 10)
                .map(|value| format!("{:06x}", value & 0x00FF_FFFF))
                .unwrap_or_default();
        }

        if is_hex_literal(operand) {
            if let Some(value) = parse_int(operand, 16) {
                return format!("{mnemonic:0>2}{value:04x}");
            }
        }
        if let Some(mut address) = self.symbols.get(operand) {
            // Indexed addressing rides on bit 15 of the operand field.
            if indexed {
                address |= 1 << 15;
            }
            return format!("{mnemonic:0>2}{address:04x}");
        }
        if parse_int(mnemonic, 16) == Some(RSUB_OPCODE.into()) {
            return format!("{mnemonic:0<6}");
        }

        String::new()
    }
}

/// Trailing ",X" requests indexed addressing; there must be something
/// before the comma.
fn is_indexed(operand: &str) -> bool {
    operand.len() >= 3 && operand.ends_with(",X")
}

/// BYTE payloads carry no opcode prefix: characters render as two hex
/// digits each, hex constants pass through verbatim.
fn byte_object_code(operand: &str) -> String {
    let bytes = operand.as_bytes();
    if operand.len() < 4 || bytes[1] != b'\'' || bytes[bytes.len() - 1] != b'\'' {
        return String::new();
    }
    let inner = &operand[2..operand.len() - 1];
    match bytes[0] {
        b'C' => inner.bytes().map(|b| format!("{b:02x}")).collect(),
        b'X' => inner.to_owned(),
        _ => String::new(),
    }
}

fn write_listing_line(
    listing: &mut impl Write,
    address: &str,
    object_code: &str,
    source: &str,
    errors: &str,
) -> Result<()> {
    let address = address.to_uppercase();
    let object_code = object_code.to_uppercase();
    if address.is_empty() {
        write!(listing, "{address: >4} ")?;
    } else {
        write!(listing, "{address:0>4} ")?;
    }
    write!(listing, "{object_code: >8} {source}")?;
    if !errors.is_empty() {
        write!(listing, "\tErrors: {}", describe_field(errors))?;
    }
    writeln!(listing)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler_with_symbols(symbols: &[(&str, u32)]) -> Assembler {
        let mut assembler = Assembler::new();
        for (name, address) in symbols {
            assembler.symbols.add((*name).to_owned(), *address);
        }
        assembler
    }

    #[test]
    fn reservations_have_no_code() {
        let assembler = assembler_with_symbols(&[]);
        assert_eq!(assembler.create_object_code("RESB", "10"), "");
        assert_eq!(assembler.create_object_code("RESW", "2"), "");
    }

    #[test]
    fn symbol_operands() {
        let assembler = assembler_with_symbols(&[("TABLE", 0x1234)]);
        assert_eq!(assembler.create_object_code("00", "TABLE"), "001234");
        assert_eq!(assembler.create_object_code("3c", "TABLE"), "3c1234");
    }

    #[test]
    fn indexing_sets_bit_fifteen() {
        let assembler = assembler_with_symbols(&[("TABLE", 0x1234)]);
        assert_eq!(assembler.create_object_code("00", "TABLE,X"), "009234");
    }

    #[test]
    fn hex_operands_encode_directly() {
        let assembler = assembler_with_symbols(&[]);
        assert_eq!(assembler.create_object_code("50", "0F1A"), "500f1a");
    }

    #[test]
    fn rsub_encodes_without_an_operand() {
        let assembler = assembler_with_symbols(&[]);
        assert_eq!(assembler.create_object_code("4c", "NOP"), "4c0000");
        // Any other opcode with an unresolvable operand yields nothing.
        assert_eq!(assembler.create_object_code("00", "NOP"), "");
    }

    #[test]
    fn word_and_byte_constants() {
        let assembler = assembler_with_symbols(&[]);
        assert_eq!(assembler.create_object_code("WORD", "7"), "000007");
        assert_eq!(assembler.create_object_code("WORD", "255"), "0000ff");
        assert_eq!(assembler.create_object_code("BYTE", "C'AB'"), "4142");
        assert_eq!(assembler.create_object_code("BYTE", "X'F1F2'"), "F1F2");
    }

    #[test]
    fn packer_splits_at_sixty_characters() {
        let mut packer = TextPacker::default();
        packer.open("0");
        assert!(!packer.would_overflow(60));
        packer.push(&"0".repeat(60));
        assert!(packer.would_overflow(6));
        let text = packer.take_nonempty().expect("payload");
        assert_eq!(text.len(), 60);
        assert!(packer.take_nonempty().is_none());
    }
}
