//! Serialize an [`EncodedMap`] into a data file and a declarations header.
pub mod asm;
pub mod c;
pub mod naming;
pub mod sink;

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Dialect;
use crate::error::EncodeError;
use crate::model::SCREENBLOCK_W;
use crate::processor::EncodedMap;
use crate::processor::screenblock::BufferShape;
use naming::{LOGIC_SUFFIX, SymbolTable};
use sink::{Sink, SinkProvider};

/// How an array's words are grouped into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Consecutive 32×32 screenblocks.
    Screenblocks,
    /// Row-major map rows of the given width.
    Rows(u32),
}

/// One array as it appears in both output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDecl<'a> {
    pub symbol: String,
    pub dims: Vec<u32>,
    pub words: &'a [u16],
    pub layout: Layout,
}

impl ArrayDecl<'_> {
    /// `[a][b]...` suffix of the declaration.
    pub fn dims_suffix(&self) -> String {
        self.dims.iter().map(|d| format!("[{d}]")).collect()
    }

    pub fn byte_len(&self) -> usize {
        self.words.len() * 2
    }
}

/// Arrays grouped per source layer, tile data first, then its logic array.
pub fn declarations(encoded: &EncodedMap) -> Result<Vec<Vec<ArrayDecl<'_>>>, EncodeError> {
    let mut table = SymbolTable::default();
    let mut out = Vec::with_capacity(encoded.layers.len());

    for layer in &encoded.layers {
        let symbol = table.claim(naming::symbol(&layer.name)?)?;
        let dims = match layer.buffer.shape {
            BufferShape::Fixed(size) => vec![size.capacity() as u32],
            BufferShape::Blocks { blocks_x, blocks_y } => {
                vec![blocks_y, blocks_x, SCREENBLOCK_W, SCREENBLOCK_W]
            }
        };

        let mut arrays = vec![ArrayDecl {
            symbol: symbol.clone(),
            dims,
            words: &layer.buffer.entries,
            layout: Layout::Screenblocks,
        }];

        if let Some(logic) = &layer.logic {
            arrays.push(ArrayDecl {
                symbol: table.claim(format!("{symbol}{LOGIC_SUFFIX}"))?,
                dims: vec![logic.height, logic.width],
                words: &logic.entries,
                layout: Layout::Rows(logic.width),
            });
        }
        out.push(arrays);
    }

    Ok(out)
}

/// `0x` and four lowercase hex digits.
pub fn hex_word(w: u16) -> String {
    format!("0x{w:04x}")
}

/// Write both files for `encoded` through `sinks`.
///
/// Both outputs are fully staged before either is committed, so any error
/// before the commit step leaves the destination paths untouched.
pub fn emit<P: SinkProvider>(
    encoded: &EncodedMap,
    dialect: Dialect,
    base: &Path,
    sinks: &P,
) -> Result<(PathBuf, PathBuf), EncodeError> {
    let (data_path, header_path) = naming::output_files(base, dialect);
    let arrays = declarations(encoded)?;
    let guard = naming::include_guard(&naming::base_name(&data_path));
    let header_name = header_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut data = sinks
        .open(&data_path)
        .map_err(|e| EncodeError::sink(&data_path, e))?;
    let written = match dialect {
        Dialect::ArrayLiteral => c::source(&mut data, &header_name, &arrays),
        Dialect::AssemblerBlocks => asm::source(&mut data, &arrays),
    };
    written
        .and_then(|()| data.flush())
        .map_err(|e| EncodeError::sink(&data_path, e))?;

    let mut header = sinks
        .open(&header_path)
        .map_err(|e| EncodeError::sink(&header_path, e))?;
    c::header(&mut header, &guard, &arrays)
        .and_then(|()| header.flush())
        .map_err(|e| EncodeError::sink(&header_path, e))?;

    data.commit().map_err(|e| EncodeError::sink(&data_path, e))?;
    header
        .commit()
        .map_err(|e| EncodeError::sink(&header_path, e))?;

    info!(
        "wrote {} and {} ({} arrays)",
        data_path.display(),
        header_path.display(),
        arrays.iter().map(Vec::len).sum::<usize>()
    );
    Ok((data_path, header_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::background::BackgroundSize;
    use crate::processor::layer::{EncodedLayer, LogicArray};
    use crate::processor::screenblock::PackedBuffer;

    fn layer(name: &str, logic: bool) -> EncodedLayer {
        EncodedLayer {
            name: name.into(),
            buffer: PackedBuffer::new(BufferShape::Blocks {
                blocks_x: 2,
                blocks_y: 1,
            }),
            logic: logic.then(|| LogicArray {
                width: 3,
                height: 2,
                entries: vec![0; 6],
            }),
            truncated: 0,
        }
    }

    #[test]
    fn test_declarations_dims_and_symbols() {
        let encoded = EncodedMap {
            layers: vec![layer("Foo Bar!1", true)],
        };
        let decls = declarations(&encoded).unwrap();

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0][0].symbol, "FooBar1");
        assert_eq!(decls[0][0].dims_suffix(), "[1][2][32][32]");
        assert_eq!(decls[0][0].byte_len(), 4096);
        assert_eq!(decls[0][1].symbol, "FooBar1_logic");
        assert_eq!(decls[0][1].dims_suffix(), "[2][3]");
        assert_eq!(decls[0][1].layout, Layout::Rows(3));
    }

    #[test]
    fn test_fixed_buffer_is_one_dimensional() {
        let encoded = EncodedMap {
            layers: vec![EncodedLayer {
                name: "bg".into(),
                buffer: PackedBuffer::new(BufferShape::Fixed(BackgroundSize::Bg64x32)),
                logic: None,
                truncated: 0,
            }],
        };
        let decls = declarations(&encoded).unwrap();
        assert_eq!(decls[0].len(), 1);
        assert_eq!(decls[0][0].dims_suffix(), "[2048]");
    }

    #[test]
    fn test_sanitized_names_may_collide() {
        let encoded = EncodedMap {
            layers: vec![layer("sky", false), layer("s-k-y", false)],
        };
        let err = declarations(&encoded).unwrap_err();
        assert!(matches!(err, EncodeError::DuplicateSymbol { ref symbol } if symbol == "sky"));
    }

    #[test]
    fn test_failed_header_leaves_nothing_behind() {
        let encoded = EncodedMap {
            layers: vec![layer("bg", true)],
        };
        let sinks = sink::MemorySinks::failing_on("out/map.h");
        let err = emit(&encoded, Dialect::AssemblerBlocks, Path::new("out/map"), &sinks)
            .unwrap_err();

        assert!(matches!(err, EncodeError::SinkWriteFailure { ref path, .. } if path == Path::new("out/map.h")));
        assert!(sinks.paths().is_empty(), "data file must not be published");
    }

    #[test]
    fn test_invalid_symbol_fails_before_any_sink_opens() {
        let encoded = EncodedMap {
            layers: vec![layer("???", false)],
        };
        let sinks = sink::MemorySinks::failing_on("out/map.s");
        let err = emit(&encoded, Dialect::AssemblerBlocks, Path::new("out/map"), &sinks)
            .unwrap_err();
        assert!(matches!(err, EncodeError::InvalidSymbol { .. }));
    }
}
