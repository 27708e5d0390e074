//! Core data structures for gridforge
//!
//! This crate provides the fundamental types for a layered autotile map:
//! - `Family` and the tile id codec - nine disjoint id ranges over [0, 8192)
//! - `MapGrid` - a six-layer numeric grid with bounds-safe access
//! - `TilesetDescriptor` - per-family sheet slots and the per-id flag table
//!
//! Tile ids encode terrain identity: autotile families (A1-A4) pack a kind
//! (terrain variety) and a shape (connectivity variant) into each id, while
//! plain families (A5, B-E) address a cell in a fixed sheet grid.

mod grid;
mod tile_id;
mod tileset;

pub use grid::{MapGrid, LAYER_COUNT, LAYER_REGION, LAYER_SHADOW};
pub use tile_id::{
    autotile_kind, autotile_shape, base_id, is_autotile, is_floor_type_autotile, is_ground,
    is_roof, is_shadowing, is_wall, is_wall_side, is_wall_top, is_wall_type_autotile, is_water,
    is_waterfall, make_autotile_id, same_terrain, sheet_cell, Family, TileId, SHAPES_PER_KIND,
    TILE_ID_MAX,
};
pub use tileset::{TilesetDescriptor, TilesetError, FLAG_ELEVATED};
