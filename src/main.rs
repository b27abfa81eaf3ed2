use anyhow::Result;
use sicasm::Assembler;
use std::env;

fn main() -> Result<()> {
    let source: String = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::Error::msg("Need an assembly source filename"))?;

    let mut assembler = Assembler::new();
    assembler.pass1(&source)?;
    assembler.pass2()?;
    assembler.display_symbol_table();

    Ok(())
}
