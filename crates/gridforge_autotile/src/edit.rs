//! The placement/erase engine
//!
//! [`EditEngine`] is the only mutator of a [`MapGrid`]: it writes tile
//! values, chooses target layers and keeps every affected autotile's shape
//! consistent with its neighborhood. Propagation is exactly one ring (a
//! shape depends only on immediate connectivity), and every call completes
//! synchronously before returning.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use gridforge_core::{
    autotile_kind, base_id, is_autotile, make_autotile_id, same_terrain, Family, MapGrid,
    LAYER_COUNT, LAYER_REGION,
};

use crate::mask::collect_mask;
use crate::resolver::style_of;

/// Layer targeting: automatic stacking or one explicit layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayerMode {
    /// Pick the layer from family and current occupancy.
    #[default]
    Auto,
    /// Write exactly this layer (0-5).
    Layer(u8),
}

/// What to place at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceSpec {
    /// An autotile terrain; the shape is resolved from neighbors, never
    /// given by the caller.
    Autotile { family: Family, kind: u16 },
    /// A plain sheet tile (A5, B-E) by offset within its family range.
    Sheet { family: Family, offset: u16 },
    /// A raw region tag. Always targets the region layer.
    Region { value: u8 },
}

/// Which stack an automatic erase works down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EraseSpec {
    /// Lower terrain stacking (layers 1 then 0).
    Terrain,
    /// Upper decoration stacking (layers 3 then 2).
    Decoration,
    /// The region layer.
    Region,
}

/// Forces one autotile kind onto a fixed layer regardless of occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerOverride {
    pub family: Family,
    pub kind: u16,
    pub layer: u8,
}

/// Per-project edit configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditConfig {
    /// Per-kind forced layers, consulted before the occupancy rules.
    #[serde(default)]
    pub layer_overrides: Vec<LayerOverride>,
}

impl EditConfig {
    fn forced_layer(&self, family: Family, kind: u16) -> Option<u8> {
        self.layer_overrides
            .iter()
            .find(|o| o.family == family && o.kind == kind)
            .map(|o| o.layer)
    }
}

/// Placement and erase over an exclusively borrowed grid.
#[derive(Debug, Clone, Default)]
pub struct EditEngine {
    config: EditConfig,
}

impl EditEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditConfig) -> Self {
        Self { config }
    }

    /// Place `spec` at `(x, y)`. Out-of-bounds calls are no-ops.
    pub fn place(&self, grid: &mut MapGrid, x: i32, y: i32, spec: PlaceSpec, mode: LayerMode) {
        if !grid.in_bounds(x, y) {
            return;
        }
        match spec {
            PlaceSpec::Region { value } => {
                // Region ignores the layer mode entirely.
                grid.set(x, y, LAYER_REGION, u16::from(value));
            }
            PlaceSpec::Autotile { family, kind } => {
                let Some(base) = make_autotile_id(family, kind, 0) else {
                    warn!("invalid autotile spec: {:?} kind {}", family, kind);
                    return;
                };
                let Some(layer) = self.place_layer(grid, x, y, base, mode) else {
                    return;
                };
                grid.set(x, y, layer, base);
                self.refresh_ring(grid, x, y, layer);
            }
            PlaceSpec::Sheet { family, offset } => {
                let in_range =
                    u32::from(family.base()) + u32::from(offset) < u32::from(family.end());
                if family.is_autotile() || !in_range {
                    warn!("invalid sheet spec: {:?} offset {}", family, offset);
                    return;
                }
                let id = family.base() + offset;
                let Some(layer) = self.place_layer(grid, x, y, id, mode) else {
                    return;
                };
                grid.set(x, y, layer, id);
                // The overwritten cell may have connected neighbors.
                self.refresh_ring(grid, x, y, layer);
            }
        }
    }

    /// Erase at `(x, y)`, working down the stack given by `spec` in auto
    /// mode or clearing exactly the given layer otherwise.
    pub fn erase(&self, grid: &mut MapGrid, x: i32, y: i32, spec: EraseSpec, mode: LayerMode) {
        if !grid.in_bounds(x, y) {
            return;
        }
        let layer = match mode {
            LayerMode::Layer(n) => {
                let Some(layer) = check_layer(n) else {
                    return;
                };
                layer
            }
            LayerMode::Auto => match spec {
                EraseSpec::Region => LAYER_REGION,
                EraseSpec::Terrain => {
                    if grid.get(x, y, 1) != 0 {
                        1
                    } else {
                        0
                    }
                }
                EraseSpec::Decoration => {
                    if grid.get(x, y, 3) != 0 {
                        3
                    } else {
                        2
                    }
                }
            },
        };
        let held_autotile = is_autotile(grid.get(x, y, layer));
        grid.set(x, y, layer, 0);
        if held_autotile {
            // Former neighbors must drop the connection.
            self.refresh_ring(grid, x, y, layer);
        }
    }

    /// Place over a rectangle, cell by cell in row-major scan order.
    pub fn place_rect(
        &self,
        grid: &mut MapGrid,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        spec: PlaceSpec,
        mode: LayerMode,
    ) {
        debug!("place_rect {}x{} at ({}, {})", width, height, x, y);
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                self.place(grid, x + dx, y + dy, spec, mode);
            }
        }
    }

    /// Erase over a rectangle, cell by cell in row-major scan order.
    pub fn erase_rect(
        &self,
        grid: &mut MapGrid,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        spec: EraseSpec,
        mode: LayerMode,
    ) {
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                self.erase(grid, x + dx, y + dy, spec, mode);
            }
        }
    }

    /// Recompute the shape of the autotile at `(x, y)` from its current
    /// neighbors. No-op for empty or plain cells.
    pub fn refresh_shape(&self, grid: &mut MapGrid, x: i32, y: i32, layer: usize) {
        let id = grid.get(x, y, layer);
        let (Some(family), Some(kind)) = (Family::of(id), autotile_kind(id)) else {
            return;
        };
        let Some(style) = style_of(family, kind) else {
            return;
        };
        let mask = collect_mask(x, y, |nx, ny| same_terrain(id, grid.get(nx, ny, layer)));
        let new_id = base_id(id) + u16::from(style.resolve(mask));
        if new_id != id {
            grid.set(x, y, layer, new_id);
        }
    }

    /// Target layer for a placement; `None` drops the call.
    fn place_layer(
        &self,
        grid: &MapGrid,
        x: i32,
        y: i32,
        id: u16,
        mode: LayerMode,
    ) -> Option<usize> {
        if let LayerMode::Layer(n) = mode {
            return check_layer(n);
        }
        if let (Some(family), Some(kind)) = (Family::of(id), autotile_kind(id)) {
            if let Some(forced) = self.config.forced_layer(family, kind) {
                return check_layer(forced);
            }
        }
        let family = Family::of(id)?;
        let layer = match family {
            // A families stack on the lower terrain pair.
            Family::A1 | Family::A2 | Family::A3 | Family::A4 | Family::A5 => {
                let below = grid.get(x, y, 0);
                if below == 0 || same_terrain(id, below) {
                    0
                } else {
                    1
                }
            }
            // B-E stack on the upper decoration pair.
            Family::B | Family::C | Family::D | Family::E => {
                let below = grid.get(x, y, 2);
                if below == 0 || below == id {
                    2
                } else {
                    3
                }
            }
        };
        Some(layer)
    }

    /// Refresh `(x, y)` and its 8 neighbors on `layer`. One ring only:
    /// shapes depend on immediate connectivity, so updates never cascade.
    fn refresh_ring(&self, grid: &mut MapGrid, x: i32, y: i32, layer: usize) {
        for dy in -1..=1 {
            for dx in -1..=1 {
                self.refresh_shape(grid, x + dx, y + dy, layer);
            }
        }
    }
}

fn check_layer(n: u8) -> Option<usize> {
    if (n as usize) < LAYER_COUNT {
        Some(n as usize)
    } else {
        warn!("layer {} out of range, ignoring edit", n);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridforge_core::autotile_shape;

    fn autotile(kind: u16) -> PlaceSpec {
        PlaceSpec::Autotile {
            family: Family::A2,
            kind,
        }
    }

    fn shape_at(grid: &MapGrid, x: i32, y: i32, layer: usize) -> u16 {
        autotile_shape(grid.get(x, y, layer)).expect("cell should hold an autotile")
    }

    /// Place a full block of A2 kind 0 with its top-left at (x, y).
    fn place_block(engine: &EditEngine, grid: &mut MapGrid, x: i32, y: i32, w: u32, h: u32) {
        engine.place_rect(grid, x, y, w, h, autotile(0), LayerMode::Auto);
    }

    #[test]
    fn test_place_lands_on_layer_zero() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        engine.place(&mut grid, 3, 3, autotile(0), LayerMode::Auto);
        assert!(is_autotile(grid.get(3, 3, 0)));
        assert_eq!(grid.get(3, 3, 1), 0);
        // Isolated placement resolves to the isolated shape.
        assert_eq!(shape_at(&grid, 3, 3, 0), 47);
    }

    #[test]
    fn test_second_kind_stacks_on_layer_one() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        engine.place(&mut grid, 3, 3, autotile(1), LayerMode::Auto);
        let first = grid.get(3, 3, 0);
        engine.place(&mut grid, 3, 3, autotile(2), LayerMode::Auto);
        // Layer 0 keeps the first kind; the second lands above it.
        assert_eq!(grid.get(3, 3, 0), first);
        assert_eq!(autotile_kind(grid.get(3, 3, 1)), Some(2));
    }

    #[test]
    fn test_same_kind_stays_on_layer_zero() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        engine.place(&mut grid, 3, 3, autotile(1), LayerMode::Auto);
        engine.place(&mut grid, 3, 3, autotile(1), LayerMode::Auto);
        assert_eq!(grid.get(3, 3, 1), 0);
    }

    #[test]
    fn test_surrounded_center_is_fully_enclosed() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        engine.place(&mut grid, 3, 3, autotile(0), LayerMode::Auto);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) {
                    engine.place(&mut grid, 3 + dx, 3 + dy, autotile(0), LayerMode::Auto);
                }
            }
        }
        assert_eq!(shape_at(&grid, 3, 3, 0), 0);
    }

    #[test]
    fn test_three_by_three_block_shapes() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        place_block(&engine, &mut grid, 2, 2, 3, 3);

        // Center: everything connected.
        assert_eq!(shape_at(&grid, 3, 3, 0), 0);
        // Edge midpoints: one open edge toward the outside.
        assert_eq!(shape_at(&grid, 3, 2, 0), 20); // top, N open
        assert_eq!(shape_at(&grid, 2, 3, 0), 16); // left, W open
        assert_eq!(shape_at(&grid, 4, 3, 0), 24); // right, E open
        assert_eq!(shape_at(&grid, 3, 4, 0), 28); // bottom, S open
        // A corner: two adjacent open edges, inner diagonal closed.
        assert_eq!(shape_at(&grid, 2, 2, 0), 34);
    }

    #[test]
    fn test_erase_propagates_one_ring() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        place_block(&engine, &mut grid, 2, 2, 3, 3);

        engine.erase(&mut grid, 3, 3, EraseSpec::Terrain, LayerMode::Auto);
        assert_eq!(grid.get(3, 3, 0), 0);
        // Every former neighbor drops the center connection.
        assert_eq!(shape_at(&grid, 3, 2, 0), 33); // was 20: S edge now open too
        assert_eq!(shape_at(&grid, 2, 3, 0), 32); // was 16: E edge now open too
        assert_eq!(shape_at(&grid, 2, 2, 0), 35); // was 34: SE corner opened
    }

    #[test]
    fn test_erase_leaves_second_ring_alone() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(9, 9);
        place_block(&engine, &mut grid, 1, 1, 5, 5);

        let outer_corner = grid.get(1, 1, 0);
        let outer_mid = grid.get(3, 1, 0);
        engine.erase(&mut grid, 3, 3, EraseSpec::Terrain, LayerMode::Auto);
        // Cells two rings from the erased center keep their shapes.
        assert_eq!(grid.get(1, 1, 0), outer_corner);
        assert_eq!(grid.get(3, 1, 0), outer_mid);
    }

    #[test]
    fn test_erase_auto_clears_upper_layer_first() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        engine.place(&mut grid, 3, 3, autotile(1), LayerMode::Auto);
        engine.place(&mut grid, 3, 3, autotile(2), LayerMode::Auto);

        engine.erase(&mut grid, 3, 3, EraseSpec::Terrain, LayerMode::Auto);
        assert_eq!(grid.get(3, 3, 1), 0);
        assert_eq!(autotile_kind(grid.get(3, 3, 0)), Some(1));

        engine.erase(&mut grid, 3, 3, EraseSpec::Terrain, LayerMode::Auto);
        assert_eq!(grid.get(3, 3, 0), 0);
    }

    #[test]
    fn test_sheet_tiles_stack_on_decoration_layers() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        let crate_tile = PlaceSpec::Sheet {
            family: Family::B,
            offset: 5,
        };
        let barrel_tile = PlaceSpec::Sheet {
            family: Family::B,
            offset: 9,
        };
        engine.place(&mut grid, 2, 2, crate_tile, LayerMode::Auto);
        assert_eq!(grid.get(2, 2, 2), 5);
        // The identical tile re-targets layer 2.
        engine.place(&mut grid, 2, 2, crate_tile, LayerMode::Auto);
        assert_eq!(grid.get(2, 2, 3), 0);
        // A different tile stacks above.
        engine.place(&mut grid, 2, 2, barrel_tile, LayerMode::Auto);
        assert_eq!(grid.get(2, 2, 2), 5);
        assert_eq!(grid.get(2, 2, 3), 9);
    }

    #[test]
    fn test_region_targets_region_layer() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        // Layer mode is ignored for regions.
        engine.place(
            &mut grid,
            4,
            4,
            PlaceSpec::Region { value: 12 },
            LayerMode::Layer(0),
        );
        assert_eq!(grid.region_id(4, 4), 12);
        assert_eq!(grid.get(4, 4, 0), 0);

        engine.erase(&mut grid, 4, 4, EraseSpec::Region, LayerMode::Auto);
        assert_eq!(grid.region_id(4, 4), 0);
    }

    #[test]
    fn test_layer_override_forces_layer() {
        let config = EditConfig {
            layer_overrides: vec![LayerOverride {
                family: Family::A2,
                kind: 7,
                layer: 1,
            }],
        };
        let engine = EditEngine::with_config(config);
        let mut grid = MapGrid::new(8, 8);
        engine.place(&mut grid, 3, 3, autotile(7), LayerMode::Auto);
        // Forced to layer 1 even though layer 0 is empty.
        assert_eq!(grid.get(3, 3, 0), 0);
        assert_eq!(autotile_kind(grid.get(3, 3, 1)), Some(7));
    }

    #[test]
    fn test_manual_layer_mode() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        engine.place(&mut grid, 3, 3, autotile(0), LayerMode::Layer(3));
        assert!(is_autotile(grid.get(3, 3, 3)));
        // Invalid explicit layers drop the edit.
        engine.place(&mut grid, 4, 4, autotile(0), LayerMode::Layer(6));
        for layer in 0..LAYER_COUNT {
            assert_eq!(grid.get(4, 4, layer), 0);
        }
    }

    #[test]
    fn test_overwrite_with_sheet_disconnects_neighbor() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        engine.place(&mut grid, 2, 2, autotile(0), LayerMode::Auto);
        engine.place(&mut grid, 3, 2, autotile(0), LayerMode::Auto);
        assert_eq!(shape_at(&grid, 2, 2, 0), 43); // connected east only

        let plain = PlaceSpec::Sheet {
            family: Family::B,
            offset: 1,
        };
        engine.place(&mut grid, 3, 2, plain, LayerMode::Layer(0));
        assert_eq!(shape_at(&grid, 2, 2, 0), 47); // isolated again
    }

    #[test]
    fn test_invalid_specs_are_dropped() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        engine.place(
            &mut grid,
            1,
            1,
            PlaceSpec::Autotile {
                family: Family::A1,
                kind: 99,
            },
            LayerMode::Auto,
        );
        engine.place(
            &mut grid,
            1,
            1,
            PlaceSpec::Sheet {
                family: Family::B,
                offset: 300,
            },
            LayerMode::Auto,
        );
        let empty = MapGrid::new(8, 8);
        assert_eq!(grid, empty);
    }

    #[test]
    fn test_out_of_bounds_edits_are_noops() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(4, 4);
        engine.place(&mut grid, -1, 0, autotile(0), LayerMode::Auto);
        engine.place(&mut grid, 4, 4, autotile(0), LayerMode::Auto);
        engine.erase(&mut grid, -1, -1, EraseSpec::Terrain, LayerMode::Auto);
        let empty = MapGrid::new(4, 4);
        assert_eq!(grid, empty);
    }

    #[test]
    fn test_waterfall_shapes_from_horizontal_neighbors() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        let falls = PlaceSpec::Autotile {
            family: Family::A1,
            kind: 5,
        };
        engine.place(&mut grid, 2, 2, falls, LayerMode::Auto);
        engine.place(&mut grid, 3, 2, falls, LayerMode::Auto);
        // Left cell: east connected, west open.
        assert_eq!(shape_at(&grid, 2, 2, 0), 1);
        assert_eq!(shape_at(&grid, 3, 2, 0), 2);
    }

    #[test]
    fn test_still_water_ignores_neighbors() {
        let engine = EditEngine::new();
        let mut grid = MapGrid::new(8, 8);
        let water = PlaceSpec::Autotile {
            family: Family::A1,
            kind: 0,
        };
        engine.place(&mut grid, 2, 2, water, LayerMode::Auto);
        assert_eq!(shape_at(&grid, 2, 2, 0), 0);
    }
}
