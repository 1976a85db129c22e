use std::io;
use std::path::PathBuf;

/// Everything that can stop an export.
///
/// All of these are deterministic for a given map and configuration, so
/// nothing is ever retried.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("only orthogonal maps are supported (map orientation is `{found}`)")]
    UnsupportedOrientation { found: String },

    #[error(
        "tile size must be a multiple of {expected_divisor}x{expected_divisor}, got {width}x{height}"
    )]
    InvalidTileSize {
        width: u32,
        height: u32,
        expected_divisor: u32,
    },

    #[error("tiles must be square, got {width}x{height}")]
    NonSquareTile { width: u32, height: u32 },

    #[error("map has no tileset")]
    MissingTileset,

    #[error("unusable tileset: {reason}")]
    InvalidTileset { reason: String },

    /// Largest background is 64x64 hardware tiles, 512x512 px.
    #[error("map is {width_px}x{height_px} px, larger than the biggest background (512x512 px)")]
    MapTooLarge { width_px: u32, height_px: u32 },

    #[error("layer `{layer}` has no cells")]
    EmptyLayer { layer: String },

    #[error("layer `{layer}` has an empty cell at ({col}, {row})")]
    EmptyCellNotAllowed { layer: String, col: u32, row: u32 },

    #[error("layer `{layer}` cell ({col}, {row}) needs tile {index}, above the limit of {limit}")]
    TileIndexOverflow {
        layer: String,
        col: u32,
        row: u32,
        index: u32,
        limit: u32,
    },

    #[error("`{raw}` does not yield a valid C symbol")]
    InvalidSymbol { raw: String },

    #[error("symbol `{symbol}` would be emitted twice")]
    DuplicateSymbol { symbol: String },

    #[error("could not write \"{}\": {source}", path.display())]
    SinkWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EncodeError {
    pub(crate) fn sink(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SinkWriteFailure {
            path: path.into(),
            source,
        }
    }
}
