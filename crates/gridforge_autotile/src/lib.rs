//! Autotile shape resolution and editing
//!
//! This crate turns neighbor connectivity into concrete tile shapes and
//! applies edits to a [`MapGrid`](gridforge_core::MapGrid):
//! - [`mask`] builds the 8-neighbor connectivity bitmask
//! - [`tables`] holds the fixed quadrant tables (floor 48, wall 16,
//!   waterfall 4)
//! - [`resolver`] maps bitmask + table kind to a shape index
//! - [`edit`] places and erases tiles, choosing layers and propagating
//!   shape updates one ring outward

pub mod edit;
pub mod mask;
pub mod resolver;
pub mod tables;

pub use edit::{EditConfig, EditEngine, EraseSpec, LayerMode, LayerOverride, PlaceSpec};
pub use mask::{collect_mask, neighbors, NeighborMask};
pub use resolver::{shape_index, style_of, style_of_id, AutotileStyle, TableKind};
pub use tables::{quadrant_table, QuadrantEntry, FLOOR, WALL, WATERFALL};
