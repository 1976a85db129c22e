//! Background size selection.

use crate::error::EncodeError;
use crate::model::{HARDWARE_TILE_SIZE, SCREENBLOCK_ENTRIES, SCREENBLOCK_W};

/// Regular background sizes, width x height in hardware tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundSize {
    Bg32x32,
    Bg32x64,
    Bg64x32,
    Bg64x64,
}

impl BackgroundSize {
    /// Smallest background covering `width_px` x `height_px`.
    ///
    /// Each axis is chosen on its own, 32 tiles if they suffice and 64
    /// otherwise.
    pub fn select(width_px: u32, height_px: u32) -> Result<Self, EncodeError> {
        let too_large = || EncodeError::MapTooLarge {
            width_px,
            height_px,
        };
        let wide = axis_is_wide(width_px).ok_or_else(too_large)?;
        let tall = axis_is_wide(height_px).ok_or_else(too_large)?;

        Ok(match (wide, tall) {
            (false, false) => Self::Bg32x32,
            (false, true) => Self::Bg32x64,
            (true, false) => Self::Bg64x32,
            (true, true) => Self::Bg64x64,
        })
    }

    pub fn tiles_wide(self) -> u32 {
        match self {
            Self::Bg32x32 | Self::Bg32x64 => 32,
            Self::Bg64x32 | Self::Bg64x64 => 64,
        }
    }

    pub fn tiles_high(self) -> u32 {
        match self {
            Self::Bg32x32 | Self::Bg64x32 => 32,
            Self::Bg32x64 | Self::Bg64x64 => 64,
        }
    }

    /// Screenblocks per background row.
    pub fn pitch(self) -> u32 {
        self.tiles_wide() / SCREENBLOCK_W
    }

    pub fn screenblocks(self) -> usize {
        self.capacity() / SCREENBLOCK_ENTRIES
    }

    /// Number of 16-bit entries in the background.
    pub fn capacity(self) -> usize {
        (self.tiles_wide() * self.tiles_high()) as usize
    }
}

/// `Some(false)` fits in 32 tiles, `Some(true)` needs 64, `None` fits nowhere.
fn axis_is_wide(px: u32) -> Option<bool> {
    let tiles = px.div_ceil(HARDWARE_TILE_SIZE);
    match tiles {
        0..=32 => Some(false),
        33..=64 => Some(true),
        _ => None,
    }
}

/// Screenblock counts for the open-ended layout: `(blocks_x, blocks_y)`.
///
/// There is no upper bound; a map with zero cells needs zero blocks.
pub fn block_counts(cells_w: u32, cells_h: u32, scale: u32) -> (u32, u32) {
    (
        (cells_w * scale).div_ceil(SCREENBLOCK_W),
        (cells_h * scale).div_ceil(SCREENBLOCK_W),
    )
}
