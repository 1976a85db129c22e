//! Encoder for a single tile layer.

use tracing::{debug, warn};

use crate::config::{EmptyCells, SizePolicy};
use crate::error::EncodeError;
use crate::model::{Cell, TileLayerSource};
use crate::processor::screenblock::{BufferShape, PackedBuffer};
use crate::processor::tile_index::{MAX_TILE_ID, TileMapper, entry};

/// One plain tile index per source cell, row-major, for gameplay lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicArray {
    pub width: u32,
    pub height: u32,
    pub entries: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLayer {
    /// Layer name as found in the map, unsanitized.
    pub name: String,
    pub buffer: PackedBuffer,
    /// Only produced for the open-ended size policy.
    pub logic: Option<LogicArray>,
    /// Entries whose tile index was masked to fit.
    pub truncated: usize,
}

/// Settings shared by every layer of one export.
#[derive(Debug, Clone, Copy)]
pub struct LayerEncoder {
    pub mapper: TileMapper,
    pub size_policy: SizePolicy,
    pub empty_cells: EmptyCells,
    pub truncate_tile_ids: bool,
    /// Source tileset size; doubles as the empty-cell sentinel.
    pub tile_count: u32,
}

/// What a cell resolves to once the empty-cell policy has been applied.
enum Resolved {
    Tile { tile: u32, flip_h: bool, flip_v: bool },
    Blank,
}

impl LayerEncoder {
    pub fn encode(
        &self,
        layer: &dyn TileLayerSource,
        shape: BufferShape,
    ) -> Result<EncodedLayer, EncodeError> {
        let scale = self.mapper.scale;
        let mut buffer = PackedBuffer::new(shape);
        let mut truncated = 0usize;

        for row in 0..layer.height() {
            for col in 0..layer.width() {
                let cell = layer.cell_at(col, row);
                let (tile, flip_h, flip_v) = match self.resolve(layer, cell, col, row)? {
                    Resolved::Tile {
                        tile,
                        flip_h,
                        flip_v,
                    } => (tile, flip_h, flip_v),
                    Resolved::Blank => {
                        for k in 0..scale {
                            for l in 0..scale {
                                buffer.set(col * scale + l, row * scale + k, 0);
                            }
                        }
                        continue;
                    }
                };

                for k in 0..scale {
                    for l in 0..scale {
                        let index = self.mapper.index(tile, k, l, flip_h, flip_v);
                        if index > MAX_TILE_ID {
                            if !self.truncate_tile_ids {
                                return Err(EncodeError::TileIndexOverflow {
                                    layer: layer.name().to_string(),
                                    col,
                                    row,
                                    index,
                                    limit: MAX_TILE_ID,
                                });
                            }
                            truncated += 1;
                        }
                        buffer.set(col * scale + l, row * scale + k, entry(index, flip_h, flip_v));
                    }
                }
            }
        }

        if truncated > 0 {
            warn!(
                "layer `{}`: {} entries had their tile index truncated to 10 bits",
                layer.name(),
                truncated
            );
        }

        let logic = match self.size_policy {
            SizePolicy::OpenEnded => Some(self.logic(layer)?),
            SizePolicy::FixedCapacity => None,
        };

        debug!(
            "layer `{}` encoded: {} entries, logic array: {}",
            layer.name(),
            buffer.entries.len(),
            logic.is_some()
        );

        Ok(EncodedLayer {
            name: layer.name().to_string(),
            buffer,
            logic,
            truncated,
        })
    }

    fn resolve(
        &self,
        layer: &dyn TileLayerSource,
        cell: Cell,
        col: u32,
        row: u32,
    ) -> Result<Resolved, EncodeError> {
        if let Some(tile) = cell.tile {
            return Ok(Resolved::Tile {
                tile,
                flip_h: cell.flip_h,
                flip_v: cell.flip_v,
            });
        }
        match self.empty_cells {
            EmptyCells::TileCount => Ok(Resolved::Tile {
                tile: self.tile_count,
                flip_h: false,
                flip_v: false,
            }),
            EmptyCells::Zero => Ok(Resolved::Blank),
            EmptyCells::Forbid => Err(EncodeError::EmptyCellNotAllowed {
                layer: layer.name().to_string(),
                col,
                row,
            }),
        }
    }

    /// Unscaled, flip-free copy of the layer's tile indices.
    fn logic(&self, layer: &dyn TileLayerSource) -> Result<LogicArray, EncodeError> {
        let (width, height) = (layer.width(), layer.height());
        let mut entries = Vec::with_capacity((width * height) as usize);

        for row in 0..height {
            for col in 0..width {
                let cell = layer.cell_at(col, row);
                let index = match self.resolve(layer, cell, col, row)? {
                    Resolved::Tile { tile, .. } => tile,
                    Resolved::Blank => 0,
                };
                let value = u16::try_from(index).map_err(|_| EncodeError::TileIndexOverflow {
                    layer: layer.name().to_string(),
                    col,
                    row,
                    index,
                    limit: u32::from(u16::MAX),
                })?;
                entries.push(value);
            }
        }

        Ok(LogicArray {
            width,
            height,
            entries,
        })
    }
}
