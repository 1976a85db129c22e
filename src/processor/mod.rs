//! The functional core: map in, packed hardware buffers out.
pub mod background;
pub mod geometry;
pub mod layer;
pub mod screenblock;
pub mod tile_index;

use tracing::{debug, info};

use crate::config::{EncoderConfig, SizePolicy};
use crate::error::EncodeError;
use crate::model::{LayerRef, MapSource, TileLayerSource};
use background::BackgroundSize;
use layer::{EncodedLayer, LayerEncoder};
use screenblock::BufferShape;
use tile_index::TileMapper;

/// Fully encoded map handed to `writer`, one entry per tile layer in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMap {
    pub layers: Vec<EncodedLayer>,
}

/// Runs every encoding pass and returns a read-only structure for writers.
pub fn encode<M: MapSource + ?Sized>(
    map: &M,
    config: &EncoderConfig,
) -> Result<EncodedMap, EncodeError> {
    let scale = geometry::validate(map.orientation(), map.tileset(), config.addressing)?;
    let tileset = map.tileset().ok_or(EncodeError::MissingTileset)?;

    info!(
        "encoding {}x{} map, {}px tiles (scale {}), {:?} / {:?}",
        map.width(),
        map.height(),
        tileset.tile_width,
        scale,
        config.addressing,
        config.size_policy
    );

    let encoder = LayerEncoder {
        mapper: TileMapper {
            addressing: config.addressing,
            scale,
            columns: tileset.columns,
        },
        size_policy: config.size_policy,
        empty_cells: config.empty_cells,
        truncate_tile_ids: config.truncate_tile_ids,
        tile_count: tileset.tile_count,
    };

    let mut layers = Vec::new();
    for layer in map.layers() {
        let tiles = match layer {
            LayerRef::Tiles(tiles) => tiles,
            LayerRef::Other { name } => {
                debug!("skipping non-tile layer `{name}`");
                continue;
            }
        };

        // a zero-length array is not valid C
        if tiles.width() == 0 || tiles.height() == 0 {
            return Err(EncodeError::EmptyLayer {
                layer: tiles.name().to_string(),
            });
        }
        let shape = buffer_shape(tiles, config.size_policy, scale, tileset.tile_width)?;
        debug!("layer `{}` -> {:?}", tiles.name(), shape);
        layers.push(encoder.encode(tiles, shape)?);
    }

    info!("encoded {} tile layers", layers.len());
    Ok(EncodedMap { layers })
}

fn buffer_shape(
    layer: &dyn TileLayerSource,
    policy: SizePolicy,
    scale: u32,
    tile_size: u32,
) -> Result<BufferShape, EncodeError> {
    Ok(match policy {
        SizePolicy::FixedCapacity => BufferShape::Fixed(BackgroundSize::select(
            layer.width() * tile_size,
            layer.height() * tile_size,
        )?),
        SizePolicy::OpenEnded => {
            let (blocks_x, blocks_y) = background::block_counts(layer.width(), layer.height(), scale);
            BufferShape::Blocks { blocks_x, blocks_y }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Layer, Map, Orientation, TileGrid, TilesetInfo};

    fn map(cells_w: u32, cells_h: u32, tile_size: u32) -> Map {
        let mut grid = TileGrid::new("ground", cells_w, cells_h);
        grid.set(0, 0, Cell::tile(1));
        Map {
            orientation: Orientation::Orthogonal,
            width: cells_w,
            height: cells_h,
            tileset: Some(TilesetInfo {
                tile_width: tile_size,
                tile_height: tile_size,
                columns: 8,
                tile_count: 64,
            }),
            layers: vec![
                Layer::Other {
                    name: "objects".into(),
                },
                Layer::Tiles(grid),
            ],
        }
    }

    fn fixed() -> EncoderConfig {
        EncoderConfig {
            size_policy: SizePolicy::FixedCapacity,
            ..EncoderConfig::default()
        }
    }

    #[test]
    fn test_skips_object_layers() {
        let out = encode(&map(4, 4, 8), &EncoderConfig::default()).expect("encodes");
        assert_eq!(out.layers.len(), 1);
        assert_eq!(out.layers[0].name, "ground");
    }

    #[test]
    fn test_fixed_capacity_picks_background() {
        let out = encode(&map(30, 20, 8), &fixed()).expect("encodes");
        assert_eq!(
            out.layers[0].buffer.shape,
            BufferShape::Fixed(BackgroundSize::Bg32x32)
        );

        // 16px tiles double the hardware footprint
        let out = encode(&map(30, 20, 16), &fixed()).expect("encodes");
        assert_eq!(
            out.layers[0].buffer.shape,
            BufferShape::Fixed(BackgroundSize::Bg64x64)
        );
    }

    #[test]
    fn test_fixed_capacity_boundary() {
        assert!(encode(&map(64, 64, 8), &fixed()).is_ok());

        let err = encode(&map(64, 65, 8), &fixed()).unwrap_err();
        assert!(matches!(err, EncodeError::MapTooLarge { .. }));
        let err = encode(&map(65, 64, 8), &fixed()).unwrap_err();
        assert!(matches!(err, EncodeError::MapTooLarge { .. }));
    }

    #[test]
    fn test_open_ended_has_no_cap() {
        let out = encode(&map(100, 70, 16), &EncoderConfig::default()).expect("encodes");
        assert_eq!(
            out.layers[0].buffer.shape,
            BufferShape::Blocks {
                blocks_x: 7,
                blocks_y: 5
            }
        );
    }

    #[test]
    fn test_rejects_layer_without_cells() {
        let mut m = map(4, 4, 8);
        m.layers.push(Layer::Tiles(TileGrid::new("void", 0, 3)));
        let err = encode(&m, &EncoderConfig::default()).unwrap_err();
        assert!(matches!(err, EncodeError::EmptyLayer { ref layer } if layer == "void"));

        m.layers.pop();
        m.layers.push(Layer::Tiles(TileGrid::new("void", 0, 0)));
        let err = encode(&m, &fixed()).unwrap_err();
        assert!(matches!(err, EncodeError::EmptyLayer { .. }));
    }

    #[test]
    fn test_validation_runs_first() {
        let mut m = map(4, 4, 8);
        m.orientation = Orientation::parse("hexagonal");
        let err = encode(&m, &EncoderConfig::default()).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedOrientation { .. }));
    }

    #[test]
    fn test_same_input_same_output() {
        let m = map(40, 12, 16);
        let a = encode(&m, &EncoderConfig::default()).expect("encodes");
        let b = encode(&m, &EncoderConfig::default()).expect("encodes");
        assert_eq!(a, b);
    }
}
