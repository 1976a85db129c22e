//! Source cell → hardware tile index, and the 16-bit map entry itself.

use crate::config::Addressing;
use crate::model::{HFLIP_SHIFT, TILE_ID_MASK, VFLIP_SHIFT};

/// Largest index that fits the entry's tile field.
pub const MAX_TILE_ID: u32 = TILE_ID_MASK as u32;

/// Maps source tiles onto the hardware tileset for one export.
#[derive(Debug, Clone, Copy)]
pub struct TileMapper {
    pub addressing: Addressing,
    /// Hardware tiles per source tile along one axis.
    pub scale: u32,
    /// Source tileset columns; only read by positional addressing.
    pub columns: u32,
}

impl TileMapper {
    /// Index of the hardware tile covering sub-tile `(k, l)` (row, column)
    /// of source tile `tile`.
    ///
    /// Flips only change which sub-tile is read. The flip bits themselves
    /// are applied by [`entry`].
    pub fn index(&self, tile: u32, k: u32, l: u32, flip_h: bool, flip_v: bool) -> u32 {
        let s = u64::from(self.scale);
        let kk = u64::from(if flip_v { self.scale - 1 - k } else { k });
        let ll = u64::from(if flip_h { self.scale - 1 - l } else { l });
        let tile = u64::from(tile);

        let index = match self.addressing {
            Addressing::Sequential => tile * s * s + s * kk + ll,
            Addressing::Positional => {
                let columns = u64::from(self.columns);
                let tile_x = (tile % columns) * s;
                let tile_y = (tile / columns) * s;
                (tile_y + kk) * columns * s + tile_x + ll
            }
        };
        // never below `tile`, so saturating keeps overflow detectable
        u32::try_from(index).unwrap_or(u32::MAX)
    }
}

/// Pack an index and flip flags into a screen entry. Bits above the tile
/// field are masked off; callers decide beforehand whether that is allowed.
pub fn entry(index: u32, flip_h: bool, flip_v: bool) -> u16 {
    let mut id = (index & MAX_TILE_ID) as u16;
    id |= u16::from(flip_h) << HFLIP_SHIFT;
    id |= u16::from(flip_v) << VFLIP_SHIFT;
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(addressing: Addressing, scale: u32, columns: u32) -> TileMapper {
        TileMapper {
            addressing,
            scale,
            columns,
        }
    }

    #[test]
    fn test_scale_one_is_identity() {
        for addressing in [Addressing::Sequential, Addressing::Positional] {
            let m = mapper(addressing, 1, 16);
            for tile in [0, 1, 5, 17, 255, 1023] {
                assert_eq!(m.index(tile, 0, 0, false, false), tile);
                assert_eq!(m.index(tile, 0, 0, true, true), tile);
            }
        }
    }

    #[test]
    fn test_sequential_block_is_contiguous() {
        let m = mapper(Addressing::Sequential, 3, 8);
        let ids: Vec<u32> = (0..3)
            .flat_map(|k| (0..3).map(move |l| (k, l)))
            .map(|(k, l)| m.index(4, k, l, false, false))
            .collect();
        let expected: Vec<u32> = (36..45).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_positional_block_follows_tileset_rows() {
        // tileset 4 columns wide at scale 2 -> hardware tileset 8 tiles wide
        let m = mapper(Addressing::Positional, 2, 4);
        // tile 5 sits at column 1, row 1 → top-left hardware tile (2, 2)
        assert_eq!(m.index(5, 0, 0, false, false), 2 * 8 + 2);
        assert_eq!(m.index(5, 0, 1, false, false), 2 * 8 + 3);
        assert_eq!(m.index(5, 1, 0, false, false), 3 * 8 + 2);
        assert_eq!(m.index(5, 1, 1, false, false), 3 * 8 + 3);
    }

    #[test]
    fn test_horizontal_flip_reverses_columns_only() {
        let m = mapper(Addressing::Sequential, 2, 4);
        for k in 0..2 {
            for l in 0..2 {
                assert_eq!(m.index(1, k, l, true, false), m.index(1, k, 1 - l, false, false));
            }
        }
    }

    #[test]
    fn test_vertical_flip_reverses_rows_only() {
        let m = mapper(Addressing::Positional, 2, 4);
        for k in 0..2 {
            for l in 0..2 {
                assert_eq!(m.index(3, k, l, false, true), m.index(3, 1 - k, l, false, false));
            }
        }
    }

    #[test]
    fn test_entry_bits() {
        assert_eq!(entry(0x155, false, false), 0x0155);
        assert_eq!(entry(0x155, true, false), 0x0555);
        assert_eq!(entry(0x155, false, true), 0x0955);
        assert_eq!(entry(0x155, true, true), 0x0D55);
        // reserved bits stay clear even for an oversized index
        assert_eq!(entry(0xFFFF, false, false) & 0xF000, 0);
    }
}
