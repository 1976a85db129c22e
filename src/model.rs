// numeric constants that describe the hardware background layout
pub const HARDWARE_TILE_SIZE: u32 = 8;

pub const SCREENBLOCK_W: u32 = 32;
pub const SCREENBLOCK_H: u32 = 32;
pub const SCREENBLOCK_ENTRIES: usize = (SCREENBLOCK_W * SCREENBLOCK_H) as usize; // 1024

pub const TILE_ID_MASK: u16 = 0x03FF;
pub const HFLIP_SHIFT: u16 = 10;
pub const VFLIP_SHIFT: u16 = 11;

/// Grid orientation as reported by the map document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Orientation {
    Orthogonal,
    /// Anything else (isometric, staggered, hexagonal, ...). Kept verbatim
    /// so the error can name it.
    Other(String),
}

impl Orientation {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "orthogonal" => Self::Orthogonal,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One map cell. `tile` is the index inside the tileset, `None` when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub tile: Option<u32>,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        tile: None,
        flip_h: false,
        flip_v: false,
    };

    pub fn tile(index: u32) -> Self {
        Self {
            tile: Some(index),
            ..Self::EMPTY
        }
    }

    pub fn flipped(self, flip_h: bool, flip_v: bool) -> Self {
        Self {
            flip_h,
            flip_v,
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }
}

/// Hardware-relevant facts about the source tileset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetInfo {
    pub tile_width: u32,
    pub tile_height: u32,
    /// Tiles per tileset image row.
    pub columns: u32,
    pub tile_count: u32,
}

/// A rectangular layer of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Cell>,
}

impl TileGrid {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            cells: vec![Cell::EMPTY; width as usize * height as usize],
        }
    }

    pub fn set(&mut self, col: u32, row: u32, cell: Cell) {
        let idx = (row * self.width + col) as usize;
        self.cells[idx] = cell;
    }
}

/// Map layers in document order. Only tile layers are encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    Tiles(TileGrid),
    /// Object, image and group layers; kept by name only.
    Other { name: String },
}

/// Entire map as it comes out of the JSON loader.
#[derive(Debug, Clone)]
pub struct Map {
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
    pub tileset: Option<TilesetInfo>,
    pub layers: Vec<Layer>,
}

// ─────────────────────────────────────────────────────
// Host capabilities the encoder relies on
// ─────────────────────────────────────────────────────

/// Read-only view of one tile layer.
pub trait TileLayerSource {
    fn name(&self) -> &str;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Cell at `(col, row)`. Out-of-range coordinates read as empty.
    fn cell_at(&self, col: u32, row: u32) -> Cell;
}

/// A layer as seen through [`MapSource::layers`].
pub enum LayerRef<'a> {
    Tiles(&'a dyn TileLayerSource),
    Other { name: &'a str },
}

/// Read-only view of a whole map document.
pub trait MapSource {
    fn orientation(&self) -> &Orientation;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn tileset(&self) -> Option<&TilesetInfo>;
    fn layers(&self) -> Box<dyn Iterator<Item = LayerRef<'_>> + '_>;
}

impl TileLayerSource for TileGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn cell_at(&self, col: u32, row: u32) -> Cell {
        if col >= self.width || row >= self.height {
            return Cell::EMPTY;
        }
        self.cells
            .get((row * self.width + col) as usize)
            .copied()
            .unwrap_or(Cell::EMPTY)
    }
}

impl MapSource for Map {
    fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn tileset(&self) -> Option<&TilesetInfo> {
        self.tileset.as_ref()
    }

    fn layers(&self) -> Box<dyn Iterator<Item = LayerRef<'_>> + '_> {
        Box::new(self.layers.iter().map(|layer| match layer {
            Layer::Tiles(grid) => LayerRef::Tiles(grid as &dyn TileLayerSource),
            Layer::Other { name } => LayerRef::Other {
                name: name.as_str(),
            },
        }))
    }
}
