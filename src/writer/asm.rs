//! Emit GNU assembler data blocks, wrapped in grit-style `@{{BLOCK` markers.

use std::io::{self, Write};

use crate::model::SCREENBLOCK_ENTRIES;
use crate::writer::{ArrayDecl, Layout, hex_word};

fn block_header<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "@{{{{BLOCK({name})")?;
    writeln!(out, ".section .rodata")?;
    writeln!(out, ".align\t2")?;
    writeln!(out, ".global {name}")?;
    writeln!(out, ".hidden {name}")?;
    writeln!(out, "{name}:")?;
    Ok(())
}

/// Data file for the assembler dialect: one block per array, one `.hword`
/// line per screenblock (or per map row for logic arrays).
pub fn source<W: Write>(out: &mut W, layers: &[Vec<ArrayDecl<'_>>]) -> io::Result<()> {
    for a in layers.iter().flatten() {
        block_header(out, &a.symbol)?;

        let per_line = match a.layout {
            Layout::Screenblocks => SCREENBLOCK_ENTRIES,
            Layout::Rows(width) => width.max(1) as usize,
        };
        for line in a.words.chunks(per_line) {
            let words: Vec<String> = line.iter().copied().map(hex_word).collect();
            writeln!(out, ".hword {}", words.join(","))?;
        }

        writeln!(out, "@}}}}BLOCK({})", a.symbol)?;
        writeln!(out)?;
    }
    Ok(())
}
