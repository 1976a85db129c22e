//! Up-front checks that every map has to pass before encoding starts.

use crate::config::Addressing;
use crate::error::EncodeError;
use crate::model::{HARDWARE_TILE_SIZE, Orientation, TilesetInfo};

/// Reject non-orthogonal grids and tile sizes the hardware cannot express.
///
/// Returns the scale factor: how many 8 px hardware tiles one source tile
/// spans along each axis.
pub fn validate(
    orientation: &Orientation,
    tileset: Option<&TilesetInfo>,
    addressing: Addressing,
) -> Result<u32, EncodeError> {
    if let Orientation::Other(found) = orientation {
        return Err(EncodeError::UnsupportedOrientation {
            found: found.clone(),
        });
    }

    let tileset = tileset.ok_or(EncodeError::MissingTileset)?;
    let (w, h) = (tileset.tile_width, tileset.tile_height);

    if w == 0 || h == 0 || w % HARDWARE_TILE_SIZE != 0 || h % HARDWARE_TILE_SIZE != 0 {
        return Err(EncodeError::InvalidTileSize {
            width: w,
            height: h,
            expected_divisor: HARDWARE_TILE_SIZE,
        });
    }
    if w != h {
        return Err(EncodeError::NonSquareTile {
            width: w,
            height: h,
        });
    }
    if addressing == Addressing::Positional && tileset.columns == 0 {
        return Err(EncodeError::InvalidTileset {
            reason: "positional addressing needs the tileset column count".into(),
        });
    }

    Ok(w / HARDWARE_TILE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset(w: u32, h: u32, columns: u32) -> TilesetInfo {
        TilesetInfo {
            tile_width: w,
            tile_height: h,
            columns,
            tile_count: 16,
        }
    }

    #[test]
    fn test_scale_factor() {
        let o = Orientation::Orthogonal;
        let seq = Addressing::Sequential;
        assert_eq!(validate(&o, Some(&tileset(8, 8, 4)), seq).unwrap(), 1);
        assert_eq!(validate(&o, Some(&tileset(16, 16, 4)), seq).unwrap(), 2);
        assert_eq!(validate(&o, Some(&tileset(32, 32, 4)), seq).unwrap(), 4);
    }

    #[test]
    fn test_rejects_isometric() {
        let err = validate(
            &Orientation::parse("isometric"),
            Some(&tileset(8, 8, 4)),
            Addressing::Sequential,
        )
        .unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedOrientation { ref found } if found == "isometric"));
    }

    #[test]
    fn test_rejects_tile_size_not_multiple_of_eight() {
        let err = validate(
            &Orientation::Orthogonal,
            Some(&tileset(12, 12, 4)),
            Addressing::Sequential,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::InvalidTileSize {
                expected_divisor: 8,
                ..
            }
        ));

        let err = validate(
            &Orientation::Orthogonal,
            Some(&tileset(0, 0, 4)),
            Addressing::Sequential,
        )
        .unwrap_err();
        assert!(matches!(err, EncodeError::InvalidTileSize { .. }));
    }

    #[test]
    fn test_rejects_non_square_tiles() {
        let err = validate(
            &Orientation::Orthogonal,
            Some(&tileset(16, 8, 4)),
            Addressing::Sequential,
        )
        .unwrap_err();
        assert!(matches!(err, EncodeError::NonSquareTile { width: 16, height: 8 }));
    }

    #[test]
    fn test_missing_tileset_and_columns() {
        let err = validate(&Orientation::Orthogonal, None, Addressing::Sequential).unwrap_err();
        assert!(matches!(err, EncodeError::MissingTileset));

        // column count only matters to positional addressing
        let ts = tileset(8, 8, 0);
        assert!(validate(&Orientation::Orthogonal, Some(&ts), Addressing::Sequential).is_ok());
        let err = validate(&Orientation::Orthogonal, Some(&ts), Addressing::Positional).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidTileset { .. }));
    }
}
