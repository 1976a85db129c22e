//! Encoder configuration.
//!
//! Every exporter flavour is one combination of these switches. The struct
//! round-trips through JSON so a project can pin its flavour in a file and
//! hand it to `--config`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a cell's tile index becomes a hardware tile index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Addressing {
    /// Hardware tileset is pre-expanded: every source tile owns a run of
    /// scale² consecutive hardware tiles.
    #[default]
    Sequential,
    /// Hardware tileset keeps the source image's rows and columns.
    Positional,
}

/// Shape of the destination buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SizePolicy {
    /// One regular background (32x32 up to 64x64 tiles), error beyond that.
    FixedCapacity,
    /// As many 32x32 screenblocks as the map needs, plus a logic array.
    #[default]
    OpenEnded,
}

/// Text format of the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// C source with `const unsigned short` arrays (`.c`).
    ArrayLiteral,
    /// GNU assembler `.hword` blocks with grit-style markers (`.s`).
    #[default]
    AssemblerBlocks,
}

impl Dialect {
    pub fn extension(self) -> &'static str {
        match self {
            Self::ArrayLiteral => "c",
            Self::AssemblerBlocks => "s",
        }
    }
}

/// What an empty cell turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyCells {
    /// The tile right after the last tileset tile, mapped like any other.
    #[default]
    TileCount,
    /// Entry 0 on every hardware sub-tile.
    Zero,
    /// Reject the map.
    Forbid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EncoderConfig {
    pub addressing: Addressing,
    pub size_policy: SizePolicy,
    pub dialect: Dialect,
    pub empty_cells: EmptyCells,
    /// Mask tile indices to 10 bits instead of failing. Lossy.
    pub truncate_tile_ids: bool,
}
