use std::path::PathBuf;

pub mod block;
pub mod constants;
pub mod errors;
pub mod labels;
pub mod line;
mod pass_one;
mod pass_two;
pub mod record;

pub use labels::SymbolTable;
pub use pass_one::Directive;

/// A two-pass assembler for the SIC machine.
///
/// Pass 1 reads the assembly source, assigns an address to every line,
/// builds the symbol table, and streams per-line blocks to an intermediate
/// file. Pass 2 replays the intermediate file into a listing annotated with
/// addresses, object code, and diagnostics, and into an object program of
/// header, text, and end records. Diagnostics never abort a pass; any
/// diagnostic at all removes the object file again at the end of pass 2.
pub struct Assembler {
    work_dir: PathBuf,
    symbols: SymbolTable,
    locctr: u32,
    starting_address: u32,
    program_length: u32,
    any_errors: bool,
}

impl Assembler {
    /// An assembler writing its artifacts to the current directory.
    pub fn new() -> Self {
        Self::in_dir(".")
    }

    /// An assembler writing its artifacts to the given directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: dir.into(),
            symbols: SymbolTable::new(),
            locctr: 0,
            starting_address: 0,
            program_length: 0,
            any_errors: false,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn starting_address(&self) -> u32 {
        self.starting_address
    }

    pub fn program_length(&self) -> u32 {
        self.program_length
    }

    /// Prints the symbol table to standard output, sorted by name.
    pub fn display_symbol_table(&self) {
        println!("Symbol Table: ");
        for (name, address) in self.symbols.iter_sorted() {
            println!("{}\t{}", name, address);
        }
    }

    pub(crate) fn artifact(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}
