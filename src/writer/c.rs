//! Emit the C header, and the C source for the array-literal dialect.

use std::io::{self, Write};

use crate::model::SCREENBLOCK_W;
use crate::writer::{ArrayDecl, Layout, hex_word};

/// Declarations file shared by both dialects.
pub fn header<W: Write>(h: &mut W, guard: &str, layers: &[Vec<ArrayDecl<'_>>]) -> io::Result<()> {
    writeln!(h, "#ifndef {guard}")?;
    writeln!(h, "#define {guard}")?;
    writeln!(h)?;

    for arrays in layers {
        for a in arrays {
            writeln!(
                h,
                "    extern const unsigned short {}{};",
                a.symbol,
                a.dims_suffix()
            )?;
            writeln!(h, "    #define {}Len {}", a.symbol, a.byte_len())?;
        }
        writeln!(h)?;
    }

    writeln!(h, "#endif // {guard}")?;
    Ok(())
}

/// Data file for the array-literal dialect.
pub fn source<W: Write>(
    out: &mut W,
    header_name: &str,
    layers: &[Vec<ArrayDecl<'_>>],
) -> io::Result<()> {
    writeln!(out, "// Auto-generated – DO NOT EDIT")?;
    writeln!(out, "#include \"{header_name}\"")?;
    writeln!(out)?;

    for a in layers.iter().flatten() {
        writeln!(
            out,
            "const unsigned short {}{} = {{",
            a.symbol,
            a.dims_suffix()
        )?;

        let per_line = match a.layout {
            Layout::Screenblocks => SCREENBLOCK_W as usize,
            Layout::Rows(width) => width.max(1) as usize,
        };
        for line in a.words.chunks(per_line) {
            let words: Vec<String> = line.iter().copied().map(hex_word).collect();
            writeln!(out, "    {},", words.join(", "))?;
        }

        writeln!(out, "}};")?;
        writeln!(out)?;
    }

    Ok(())
}
