use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use tracing::{debug, info};

use crate::model::{Cell, Layer, Map, Orientation, TileGrid, TilesetInfo};

// Tiled stores flip flags in the top bits of every GID.
pub const FLIPPED_HORIZONTALLY: u32 = 0x8000_0000;
pub const FLIPPED_VERTICALLY: u32 = 0x4000_0000;
pub const FLIPPED_DIAGONALLY: u32 = 0x2000_0000;
pub const ROTATED_HEXAGONAL_120: u32 = 0x1000_0000;
const GID_MASK: u32 = !(FLIPPED_HORIZONTALLY
    | FLIPPED_VERTICALLY
    | FLIPPED_DIAGONALLY
    | ROTATED_HEXAGONAL_120);

// ─────────────────────────────────────────────────────
// Raw Tiled JSON, only the fields the exporter reads
// ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawMap {
    orientation: String,
    width: u32,
    height: u32,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    layers: Vec<RawLayer>,
    #[serde(default)]
    tilesets: Vec<RawTileset>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawLayer {
    TileLayer(RawTileLayer),
    ObjectGroup { name: String },
    ImageLayer { name: String },
    Group { name: String },
}

#[derive(Debug, Deserialize)]
struct RawTileLayer {
    name: String,
    width: u32,
    height: u32,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    data: Option<LayerData>,
}

/// CSV layers hold a GID array, base64 layers a (possibly compressed) string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayerData {
    Gids(Vec<u32>),
    Encoded(String),
}

#[derive(Debug, Deserialize)]
struct RawTileset {
    #[serde(default = "one")]
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    columns: u32,
    #[serde(default)]
    tilecount: u32,
}

fn one() -> u32 {
    1
}

/// Parse a Tiled JSON map (`.tmj` / `.json`) into a [`Map`].
///
/// Only the first tileset is used; tile indices are relative to its
/// `firstgid`, and a GID outside its range is an error. Object, image and
/// group layers are kept by name only.
pub fn load_from_json(json: &str) -> Result<Map> {
    debug!("map document: {} bytes", json.len());
    let raw: RawMap = serde_json::from_str(json)?;

    if raw.infinite {
        bail!("infinite maps are not supported");
    }

    let first = raw.tilesets.first();
    if let Some(src) = first.and_then(|ts| ts.source.as_ref()) {
        bail!("external tileset `{src}` is not supported, embed it in the map");
    }
    if raw.tilesets.len() > 1 {
        info!(
            "map has {} tilesets, only the first one is exported",
            raw.tilesets.len()
        );
    }

    if let Some(ts) = first {
        // the scale factor comes from the tileset, so both grids must agree
        let map_tile = (raw.tilewidth, raw.tileheight);
        if map_tile != (0, 0) && map_tile != (ts.tilewidth, ts.tileheight) {
            bail!(
                "map grid is {}x{} px but tileset tiles are {}x{} px",
                raw.tilewidth,
                raw.tileheight,
                ts.tilewidth,
                ts.tileheight
            );
        }
    }

    let tileset = first.map(|ts| TilesetInfo {
        tile_width: ts.tilewidth,
        tile_height: ts.tileheight,
        columns: ts.columns,
        tile_count: ts.tilecount,
    });
    let firstgid = first.map_or(1, |ts| ts.firstgid);
    let tile_count = first.map(|ts| ts.tilecount);

    let mut layers = Vec::with_capacity(raw.layers.len());
    for raw_layer in raw.layers {
        let layer = match raw_layer {
            RawLayer::TileLayer(tiles) => Layer::Tiles(parse_tile_layer(tiles, firstgid, tile_count)?),
            RawLayer::ObjectGroup { name }
            | RawLayer::ImageLayer { name }
            | RawLayer::Group { name } => Layer::Other { name },
        };
        layers.push(layer);
    }

    info!(
        "loaded {}x{} {} map with {} layers",
        raw.width,
        raw.height,
        raw.orientation,
        layers.len()
    );

    Ok(Map {
        orientation: Orientation::parse(&raw.orientation),
        width: raw.width,
        height: raw.height,
        tileset,
        layers,
    })
}

// ─────────────────────────────────────────────────────
/// Helper: decode one tile layer's GID array into cells.
fn parse_tile_layer(raw: RawTileLayer, firstgid: u32, tile_count: Option<u32>) -> Result<TileGrid> {
    let data = match raw.data {
        Some(LayerData::Gids(gids)) => gids,
        Some(LayerData::Encoded(_)) => bail!(
            "layer `{}` uses `{}` encoding, export it with CSV layer format",
            raw.name,
            raw.encoding.as_deref().unwrap_or("base64")
        ),
        None => bail!("layer `{}` has no `data` array", raw.name),
    };

    let expected = u64::from(raw.width) * u64::from(raw.height);
    if u64::try_from(data.len()).ok() != Some(expected) {
        bail!(
            "layer `{}` has {} cells, expected {}x{} = {}",
            raw.name,
            data.len(),
            raw.width,
            raw.height,
            expected
        );
    }

    let mut cells = Vec::with_capacity(data.len());
    for (i, gid) in data.into_iter().enumerate() {
        let cell = decode_gid(gid, firstgid).ok_or_else(|| {
            anyhow!(
                "layer `{}` cell {} references gid {} below the tileset's firstgid {}",
                raw.name,
                i,
                gid & GID_MASK,
                firstgid
            )
        })?;
        match (cell.tile, tile_count) {
            (Some(tile), Some(count)) if tile >= count => bail!(
                "layer `{}` cell {} references gid {}, outside the first tileset \
                 (gids {}..{}); only one tileset can be exported",
                raw.name,
                i,
                gid & GID_MASK,
                firstgid,
                u64::from(firstgid) + u64::from(count)
            ),
            _ => {}
        }
        if gid & FLIPPED_DIAGONALLY != 0 {
            debug!(
                "layer `{}` cell {}: diagonal flip has no hardware equivalent, ignored",
                raw.name, i
            );
        }
        cells.push(cell);
    }

    debug!("tile layer `{}` parsed", raw.name);
    Ok(TileGrid {
        name: raw.name,
        width: raw.width,
        height: raw.height,
        cells,
    })
}

/// Split a GID into tile index and flags. `None` when the GID does not
/// belong to the tileset starting at `firstgid`.
pub fn decode_gid(gid: u32, firstgid: u32) -> Option<Cell> {
    let id = gid & GID_MASK;
    if id == 0 {
        return Some(Cell::EMPTY);
    }
    let tile = id.checked_sub(firstgid)?;
    Some(Cell::tile(tile).flipped(
        gid & FLIPPED_HORIZONTALLY != 0,
        gid & FLIPPED_VERTICALLY != 0,
    ))
}
