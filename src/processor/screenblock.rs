//! Screenblock addressing and the packed output buffer.
//!
//! A background is stored as consecutive 32×32 screenblocks, each one
//! row-major. `pitch` is the number of screenblocks per background row.

use crate::model::{SCREENBLOCK_ENTRIES, SCREENBLOCK_H, SCREENBLOCK_W};
use crate::processor::background::BackgroundSize;

/// Linear offset of hardware tile `(x, y)`.
pub fn offset(x: u32, y: u32, pitch: u32) -> usize {
    let block = (y / SCREENBLOCK_H) * pitch + x / SCREENBLOCK_W;
    block as usize * SCREENBLOCK_ENTRIES + ((y % SCREENBLOCK_H) * SCREENBLOCK_W + x % SCREENBLOCK_W) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferShape {
    /// A single regular background.
    Fixed(BackgroundSize),
    /// `blocks_y` rows of `blocks_x` screenblocks.
    Blocks { blocks_x: u32, blocks_y: u32 },
}

impl BufferShape {
    pub fn pitch(self) -> u32 {
        match self {
            Self::Fixed(size) => size.pitch(),
            Self::Blocks { blocks_x, .. } => blocks_x,
        }
    }

    pub fn entry_count(self) -> usize {
        match self {
            Self::Fixed(size) => size.capacity(),
            Self::Blocks { blocks_x, blocks_y } => (blocks_x * blocks_y) as usize * SCREENBLOCK_ENTRIES,
        }
    }
}

/// Encoded entries of one layer, laid out screenblock by screenblock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBuffer {
    pub shape: BufferShape,
    pub entries: Vec<u16>,
}

impl PackedBuffer {
    pub fn new(shape: BufferShape) -> Self {
        Self {
            shape,
            entries: vec![0; shape.entry_count()],
        }
    }

    pub fn set(&mut self, x: u32, y: u32, entry: u16) {
        let idx = offset(x, y, self.shape.pitch());
        self.entries[idx] = entry;
    }

    pub fn get(&self, x: u32, y: u32) -> u16 {
        self.entries[offset(x, y, self.shape.pitch())]
    }

    /// Entry at `(row, col)` of the screenblock at `(block_row, block_col)`.
    pub fn block_entry(&self, block_row: u32, block_col: u32, row: u32, col: u32) -> u16 {
        self.get(block_col * SCREENBLOCK_W + col, block_row * SCREENBLOCK_H + row)
    }

    /// Screenblocks in memory order.
    pub fn screenblocks(&self) -> std::slice::Chunks<'_, u16> {
        self.entries.chunks(SCREENBLOCK_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bijective(size: BackgroundSize) {
        let mut seen = vec![0u8; size.capacity()];
        for y in 0..size.tiles_high() {
            for x in 0..size.tiles_wide() {
                let o = offset(x, y, size.pitch());
                assert!(o < size.capacity(), "{size:?} ({x},{y}) -> {o}");
                seen[o] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1), "{size:?} is not a bijection");
    }

    #[test]
    fn test_offset_is_bijective_for_every_background() {
        assert_bijective(BackgroundSize::Bg32x32);
        assert_bijective(BackgroundSize::Bg32x64);
        assert_bijective(BackgroundSize::Bg64x32);
        assert_bijective(BackgroundSize::Bg64x64);
    }

    #[test]
    fn test_offset_screenblock_order() {
        assert_eq!(offset(0, 0, 2), 0);
        assert_eq!(offset(31, 0, 2), 31);
        assert_eq!(offset(0, 1, 2), 32);
        // second screenblock starts right of the first one
        assert_eq!(offset(32, 0, 2), 1024);
        assert_eq!(offset(0, 32, 2), 2048);
        assert_eq!(offset(63, 63, 2), 4095);
        // 32-wide backgrounds stack screenblocks vertically
        assert_eq!(offset(0, 32, 1), 1024);
    }

    #[test]
    fn test_block_grid_addressing() {
        let mut buf = PackedBuffer::new(BufferShape::Blocks {
            blocks_x: 3,
            blocks_y: 2,
        });
        assert_eq!(buf.entries.len(), 6 * 1024);

        buf.set(70, 40, 0x1234);
        assert_eq!(buf.block_entry(1, 2, 8, 6), 0x1234);
        assert_eq!(buf.entries[(3 + 2) * 1024 + 8 * 32 + 6], 0x1234);
        assert_eq!(buf.screenblocks().count(), 6);
    }
}
