//! Tileset descriptor
//!
//! A tileset pairs each tile family with a sprite-sheet slot and carries the
//! per-id flag table. The descriptor is pure configuration: actual pixel
//! data is loaded and owned by the render layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::tile_id::{Family, TileId, TILE_ID_MAX};

/// Flag bit marking an A2 tile as an elevated (table) surface.
pub const FLAG_ELEVATED: u16 = 0x80;

/// Errors from descriptor validation.
#[derive(Debug, Error)]
pub enum TilesetError {
    #[error("tile size must be a positive even number, got {0}")]
    InvalidTileSize(u32),
    #[error("flag table has {0} entries, more than the {TILE_ID_MAX} id space")]
    FlagTableTooLong(usize),
}

/// Per-tileset configuration: sheet slot per family plus the per-id flag
/// table consulted by the compositor and external collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetDescriptor {
    pub id: Uuid,
    pub name: String,
    /// Tile size in pixels (square tiles; quadrants are half this).
    pub tile_size: u32,
    /// Sheet image path per family, in [`Family::ALL`] order.
    #[serde(default)]
    pub sheet_paths: [Option<String>; 9],
    /// Per-id flag words. Ids past the end of the table read as 0.
    #[serde(default)]
    pub flags: Vec<u16>,
}

impl TilesetDescriptor {
    /// Create a descriptor with no sheets and an empty flag table.
    pub fn new(name: String, tile_size: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tile_size,
            sheet_paths: Default::default(),
            flags: Vec::new(),
        }
    }

    /// Assign the sheet path for one family.
    pub fn set_sheet_path(&mut self, family: Family, path: String) {
        self.sheet_paths[family.index()] = Some(path);
    }

    /// Sheet path for a family, if assigned.
    pub fn sheet_path(&self, family: Family) -> Option<&str> {
        self.sheet_paths[family.index()].as_deref()
    }

    /// Flag word for a tile id, 0 when the table does not cover it.
    pub fn flag(&self, id: TileId) -> u16 {
        self.flags.get(id as usize).copied().unwrap_or(0)
    }

    /// Whether `id` is an elevated (table) surface: A2 family with the
    /// elevated flag bit set.
    pub fn is_table(&self, id: TileId) -> bool {
        Family::of(id) == Some(Family::A2) && self.flag(id) & FLAG_ELEVATED != 0
    }

    /// Check descriptor-level invariants the render layer relies on.
    pub fn validate(&self) -> Result<(), TilesetError> {
        if self.tile_size == 0 || self.tile_size % 2 != 0 {
            return Err(TilesetError::InvalidTileSize(self.tile_size));
        }
        if self.flags.len() > TILE_ID_MAX as usize {
            return Err(TilesetError::FlagTableTooLong(self.flags.len()));
        }
        Ok(())
    }
}
