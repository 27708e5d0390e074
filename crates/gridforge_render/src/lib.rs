//! Software raster compositor for gridforge maps
//!
//! Reads a [`MapGrid`](gridforge_core::MapGrid) and draws composed tiles
//! into an RGBA frame buffer: four quadrant blits per autotile, one
//! full-tile blit per plain tile, then the shadow mask and the table-edge
//! overlay. Sprite sheets are loaded once into a [`TilesetAtlas`] and
//! treated as immutable afterwards.

mod atlas;
mod compositor;
mod frame;

pub use atlas::{RenderError, TilesetAtlas};
pub use compositor::Compositor;
pub use frame::Frame;
