//! The six-layer map grid
//!
//! Layers 0/1 hold lower terrain (autotile stacking), 2/3 upper decoration
//! stacking, 4 the 4-bit shadow quadrant mask and 5 the region tag. Cells
//! live in one flat buffer addressed `layer * h * w + y * w + x`, which is
//! also the persisted form: the grid serializes as dimensions plus a flat
//! numeric array, ready to nest inside a larger per-map record.

use serde::{Deserialize, Serialize};

use crate::tile_id::TileId;

/// Number of grid layers.
pub const LAYER_COUNT: usize = 6;

/// Layer holding the 4-bit shadow quadrant mask.
pub const LAYER_SHADOW: usize = 4;

/// Layer holding the raw 0-255 region tag.
pub const LAYER_REGION: usize = 5;

/// A width x height x 6 numeric grid.
///
/// All accessors are bounds-safe: out-of-range reads return 0 and
/// out-of-range writes are no-ops, so neighbor scans never need to
/// pre-clamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapGrid {
    width: u32,
    height: u32,
    data: Vec<u16>,
}

impl MapGrid {
    /// Create an empty (all-zero) grid.
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize * LAYER_COUNT;
        Self {
            width,
            height,
            data: vec![0; size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32, layer: usize) -> Option<usize> {
        if !self.in_bounds(x, y) || layer >= LAYER_COUNT {
            return None;
        }
        let plane = (self.width * self.height) as usize;
        Some(layer * plane + (y as u32 * self.width + x as u32) as usize)
    }

    /// Read one cell. 0 when `(x, y)` or `layer` is out of range.
    pub fn get(&self, x: i32, y: i32, layer: usize) -> u16 {
        self.index(x, y, layer).map(|i| self.data[i]).unwrap_or(0)
    }

    /// Overwrite one cell. Out-of-range writes are dropped. Never triggers
    /// shape propagation; that is the edit engine's job.
    pub fn set(&mut self, x: i32, y: i32, layer: usize, value: u16) {
        if let Some(i) = self.index(x, y, layer) {
            self.data[i] = value;
        }
    }

    /// The four content-layer tile ids at `(x, y)`, bottom-up.
    pub fn content_tiles(&self, x: i32, y: i32) -> [TileId; 4] {
        [
            self.get(x, y, 0),
            self.get(x, y, 1),
            self.get(x, y, 2),
            self.get(x, y, 3),
        ]
    }

    /// The 4-bit shadow quadrant mask at `(x, y)`.
    pub fn shadow_bits(&self, x: i32, y: i32) -> u8 {
        (self.get(x, y, LAYER_SHADOW) & 0x0f) as u8
    }

    /// The region tag at `(x, y)`.
    pub fn region_id(&self, x: i32, y: i32) -> u8 {
        (self.get(x, y, LAYER_REGION) & 0xff) as u8
    }

    /// Reallocate to `new_width` x `new_height`, copying the overlapping
    /// top-left rectangle of every layer and zero-filling the rest.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        let size = (new_width * new_height) as usize * LAYER_COUNT;
        let mut data = vec![0u16; size];

        let copy_w = self.width.min(new_width);
        let copy_h = self.height.min(new_height);
        let old_plane = (self.width * self.height) as usize;
        let new_plane = (new_width * new_height) as usize;

        for layer in 0..LAYER_COUNT {
            for y in 0..copy_h {
                for x in 0..copy_w {
                    let old = layer * old_plane + (y * self.width + x) as usize;
                    let new = layer * new_plane + (y * new_width + x) as usize;
                    data[new] = self.data[old];
                }
            }
        }

        self.width = new_width;
        self.height = new_height;
        self.data = data;
    }
}
