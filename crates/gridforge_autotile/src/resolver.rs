//! Connectivity to shape index resolution
//!
//! Pure functions from an 8-neighbor [`NeighborMask`] to an index into one
//! of the quadrant tables. Deterministic and side-effect free; callers
//! build the mask from grid state themselves.
//!
//! The floor mapping is derived from the quadrant tables' own semantics:
//! the connected cardinal edges pick a macro-group, then the closed corners
//! among those made meaningful by their adjacent edges pick the variant
//! within the group. Every one of the 256 masks lands on exactly one of the
//! 48 entries, and every entry is reachable.

use gridforge_core::{autotile_kind, Family, TileId};

use crate::mask::{neighbors, NeighborMask};

/// Which quadrant table an autotile resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// 48 entries: 4 edges with corner refinement.
    Floor,
    /// 16 entries: 4 edges, no corners.
    Wall,
    /// 4 entries: left/right edges only.
    Waterfall,
}

impl TableKind {
    /// Number of entries in this table.
    pub fn entry_count(self) -> usize {
        match self {
            TableKind::Floor => 48,
            TableKind::Wall => 16,
            TableKind::Waterfall => 4,
        }
    }
}

/// Resolve a connectivity mask to a shape index for `table`.
///
/// Total over all 256 masks; the result is always below
/// `table.entry_count()`.
pub fn shape_index(mask: NeighborMask, table: TableKind) -> u8 {
    match table {
        TableKind::Floor => floor_shape(mask),
        TableKind::Wall => wall_shape(mask),
        TableKind::Waterfall => waterfall_shape(mask),
    }
}

fn floor_shape(mask: NeighborMask) -> u8 {
    use neighbors::*;

    let m = mask.normalized();
    let n = m.contains(N);
    let e = m.contains(E);
    let s = m.contains(S);
    let w = m.contains(W);
    // After normalization a set corner flag means "closed": both adjacent
    // edges and the diagonal are connected.
    let nw = m.contains(NW);
    let ne = m.contains(NE);
    let se = m.contains(SE);
    let sw = m.contains(SW);

    let bit = |open: bool, value: u8| if open { value } else { 0 };

    match (w, n, e, s) {
        // All edges connected: open corners select among 16 variants.
        (true, true, true, true) => bit(!nw, 1) + bit(!ne, 2) + bit(!se, 4) + bit(!sw, 8),
        // One open edge: the two surviving corners, clockwise from it.
        (false, true, true, true) => 16 + bit(!ne, 1) + bit(!se, 2),
        (true, false, true, true) => 20 + bit(!se, 1) + bit(!sw, 2),
        (true, true, false, true) => 24 + bit(!sw, 1) + bit(!nw, 2),
        (true, true, true, false) => 28 + bit(!nw, 1) + bit(!ne, 2),
        // Opposite pairs.
        (false, true, false, true) => 32,
        (true, false, true, false) => 33,
        // Adjacent pairs: one corner survives.
        (false, false, true, true) => 34 + bit(!se, 1),
        (true, false, false, true) => 36 + bit(!sw, 1),
        (true, true, false, false) => 38 + bit(!nw, 1),
        (false, true, true, false) => 40 + bit(!ne, 1),
        // Single connected edge.
        (false, false, false, true) => 42,
        (false, false, true, false) => 43,
        (false, true, false, false) => 44,
        (true, false, false, false) => 45,
        // Isolated: the premade entry for a truly empty mask, the
        // assembled one when only inconsistent diagonals were present.
        (false, false, false, false) => {
            if mask == NeighborMask::EMPTY {
                47
            } else {
                46
            }
        }
    }
}

fn wall_shape(mask: NeighborMask) -> u8 {
    use neighbors::*;

    let mut shape = 0;
    if !mask.contains(W) {
        shape += 1;
    }
    if !mask.contains(N) {
        shape += 2;
    }
    if !mask.contains(E) {
        shape += 4;
    }
    if !mask.contains(S) {
        shape += 8;
    }
    shape
}

fn waterfall_shape(mask: NeighborMask) -> u8 {
    use neighbors::*;

    let mut shape = 0;
    if !mask.contains(W) {
        shape += 1;
    }
    if !mask.contains(E) {
        shape += 2;
    }
    shape
}

/// How one autotile kind resolves its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutotileStyle {
    /// Floor table, 48 shapes.
    Floor,
    /// Wall table, 16 shapes.
    Wall,
    /// Waterfall table, left/right flags only.
    Waterfall,
    /// Still water: connectivity is ignored, the shape is always the
    /// fully-connected entry.
    Still,
}

impl AutotileStyle {
    /// Resolve a mask under this style.
    pub fn resolve(self, mask: NeighborMask) -> u8 {
        match self {
            AutotileStyle::Floor => shape_index(mask, TableKind::Floor),
            AutotileStyle::Wall => shape_index(mask, TableKind::Wall),
            AutotileStyle::Waterfall => shape_index(mask, TableKind::Waterfall),
            AutotileStyle::Still => 0,
        }
    }

    /// The quadrant table this style draws from.
    pub fn table_kind(self) -> TableKind {
        match self {
            AutotileStyle::Floor | AutotileStyle::Still => TableKind::Floor,
            AutotileStyle::Wall => TableKind::Wall,
            AutotileStyle::Waterfall => TableKind::Waterfall,
        }
    }
}

/// Style of an autotile (family, kind) pair. `None` for plain families.
///
/// A3 and the odd kind rows of A4 are wall-style; A1 kinds 0-3 are still
/// water, its odd kinds from 4 up are waterfalls; everything else is
/// floor-style.
pub fn style_of(family: Family, kind: u16) -> Option<AutotileStyle> {
    match family {
        Family::A1 => Some(match kind {
            0..=3 => AutotileStyle::Still,
            k if k % 2 == 1 => AutotileStyle::Waterfall,
            _ => AutotileStyle::Floor,
        }),
        Family::A2 => Some(AutotileStyle::Floor),
        Family::A3 => Some(AutotileStyle::Wall),
        Family::A4 => Some(if (kind / 8) % 2 == 1 {
            AutotileStyle::Wall
        } else {
            AutotileStyle::Floor
        }),
        _ => None,
    }
}

/// Style of an autotile id. `None` for plain ids.
pub fn style_of_id(id: TileId) -> Option<AutotileStyle> {
    style_of(Family::of(id)?, autotile_kind(id)?)
}
