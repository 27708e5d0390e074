//! Tile id codec
//!
//! A tile id is a `u16` in `[0, 8192)`, partitioned into nine contiguous
//! family ranges. Autotile families (A1-A4) subdivide into kinds of 48 ids
//! each: `kind` is the terrain variety, `shape` the connectivity variant.
//! Plain families (A5, B-E) address a cell in an 8-wide sheet grid, with a
//! half-sheet selector for ids past the 16th row (double-width legacy
//! sheets).

use serde::{Deserialize, Serialize};

/// A tile id. Valid ids are below [`TILE_ID_MAX`]; 0 doubles as "empty".
pub type TileId = u16;

/// Exclusive upper bound of the tile id space.
pub const TILE_ID_MAX: TileId = 8192;

/// Number of shape variants per autotile kind.
pub const SHAPES_PER_KIND: u16 = 48;

/// Tile family. The nine ranges are disjoint and tile `[0, 8192)` exactly;
/// this is a construction-time invariant of [`Family::RANGES`], checked by
/// test rather than at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    B,
    C,
    D,
    E,
    A5,
    A1,
    A2,
    A3,
    A4,
}

impl Family {
    /// All families in sheet-slot order.
    pub const ALL: [Family; 9] = [
        Family::B,
        Family::C,
        Family::D,
        Family::E,
        Family::A5,
        Family::A1,
        Family::A2,
        Family::A3,
        Family::A4,
    ];

    /// Range starts in ascending id order. Each range ends where the next
    /// begins; the last ends at [`TILE_ID_MAX`]. The E range absorbs the
    /// double-width legacy overflow up to the A5 base.
    pub const RANGES: [(Family, TileId); 9] = [
        (Family::B, 0),
        (Family::C, 256),
        (Family::D, 512),
        (Family::E, 768),
        (Family::A5, 1536),
        (Family::A1, 2048),
        (Family::A2, 2816),
        (Family::A3, 4352),
        (Family::A4, 5888),
    ];

    /// Look up the family containing `id`. `None` only for ids outside
    /// `[0, 8192)`.
    pub fn of(id: TileId) -> Option<Family> {
        if id >= TILE_ID_MAX {
            return None;
        }
        let mut found = Family::B;
        for &(family, start) in &Self::RANGES {
            if id >= start {
                found = family;
            } else {
                break;
            }
        }
        Some(found)
    }

    /// First id of this family's range.
    pub fn base(self) -> TileId {
        Self::RANGES
            .iter()
            .find(|(f, _)| *f == self)
            .map(|(_, start)| *start)
            .unwrap_or(0)
    }

    /// One past the last id of this family's range.
    pub fn end(self) -> TileId {
        let mut ranges = Self::RANGES.iter();
        for (family, _) in ranges.by_ref() {
            if *family == self {
                break;
            }
        }
        ranges.next().map(|(_, start)| *start).unwrap_or(TILE_ID_MAX)
    }

    /// Whether ids in this family encode kind and shape.
    pub fn is_autotile(self) -> bool {
        matches!(self, Family::A1 | Family::A2 | Family::A3 | Family::A4)
    }

    /// Number of kinds in an autotile family, 0 for plain families.
    pub fn kind_count(self) -> u16 {
        if self.is_autotile() {
            (self.end() - self.base()) / SHAPES_PER_KIND
        } else {
            0
        }
    }

    /// Stable slot index in [`Family::ALL`] order, used for sheet arrays.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Whether `id` belongs to an autotile family.
pub fn is_autotile(id: TileId) -> bool {
    Family::of(id).map(Family::is_autotile).unwrap_or(false)
}

/// Kind (terrain variety) of an autotile id, relative to its family base.
pub fn autotile_kind(id: TileId) -> Option<u16> {
    let family = Family::of(id)?;
    if family.is_autotile() {
        Some((id - family.base()) / SHAPES_PER_KIND)
    } else {
        None
    }
}

/// Shape (connectivity variant) of an autotile id.
pub fn autotile_shape(id: TileId) -> Option<u16> {
    let family = Family::of(id)?;
    if family.is_autotile() {
        Some((id - family.base()) % SHAPES_PER_KIND)
    } else {
        None
    }
}

/// Strip the shape from an autotile id, keeping family and kind.
/// Identity for plain ids.
pub fn base_id(id: TileId) -> TileId {
    match autotile_shape(id) {
        Some(shape) => id - shape,
        None => id,
    }
}

/// Compose an autotile id from family, kind and shape.
/// `None` if the family is plain or kind/shape are out of range.
pub fn make_autotile_id(family: Family, kind: u16, shape: u16) -> Option<TileId> {
    if !family.is_autotile() || kind >= family.kind_count() || shape >= SHAPES_PER_KIND {
        return None;
    }
    Some(family.base() + kind * SHAPES_PER_KIND + shape)
}

/// Whether two ids share terrain identity: same family and kind for
/// autotiles (shape may differ), exact equality otherwise.
pub fn same_terrain(a: TileId, b: TileId) -> bool {
    if is_autotile(a) && is_autotile(b) {
        Family::of(a) == Family::of(b) && autotile_kind(a) == autotile_kind(b)
    } else {
        a == b
    }
}

/// Sheet cell `(col, row)` of a plain tile id within its family sheet.
/// Ids past the 16th row select the right half of a double-width sheet.
/// `None` for autotile families and invalid ids.
pub fn sheet_cell(id: TileId) -> Option<(u32, u32)> {
    let family = Family::of(id)?;
    if family.is_autotile() {
        return None;
    }
    let offset = u32::from(id - family.base());
    let col = (offset / 128 % 2) * 8 + offset % 8;
    let row = offset / 8 % 16;
    Some((col, row))
}

fn kind_row(id: TileId) -> u16 {
    autotile_kind(id).map(|k| k / 8).unwrap_or(0)
}

/// A1 water tiles: still-water kinds 0-1 and the animated even kinds.
pub fn is_water(id: TileId) -> bool {
    match (Family::of(id), autotile_kind(id)) {
        (Some(Family::A1), Some(kind)) => !matches!(kind, 2 | 3) && !is_waterfall(id),
        _ => false,
    }
}

/// A1 waterfall tiles: odd kinds from 4 up.
pub fn is_waterfall(id: TileId) -> bool {
    match (Family::of(id), autotile_kind(id)) {
        (Some(Family::A1), Some(kind)) => kind >= 4 && kind % 2 == 1,
        _ => false,
    }
}

/// Ground-level tiles: families A1, A2 and A5.
pub fn is_ground(id: TileId) -> bool {
    matches!(Family::of(id), Some(Family::A1 | Family::A2 | Family::A5))
}

/// Tiles that occlude what is behind them: families A3 and A4.
pub fn is_shadowing(id: TileId) -> bool {
    matches!(Family::of(id), Some(Family::A3 | Family::A4))
}

/// A3 roof tiles (even kind rows).
pub fn is_roof(id: TileId) -> bool {
    Family::of(id) == Some(Family::A3) && kind_row(id) % 2 == 0
}

/// A4 wall-top tiles (even kind rows).
pub fn is_wall_top(id: TileId) -> bool {
    Family::of(id) == Some(Family::A4) && kind_row(id) % 2 == 0
}

/// A3/A4 wall-side tiles (odd kind rows).
pub fn is_wall_side(id: TileId) -> bool {
    matches!(Family::of(id), Some(Family::A3 | Family::A4)) && kind_row(id) % 2 == 1
}

/// Wall tiles of either sub-mode.
pub fn is_wall(id: TileId) -> bool {
    is_wall_top(id) || is_wall_side(id)
}

/// Autotiles resolved with the 48-entry floor table.
pub fn is_floor_type_autotile(id: TileId) -> bool {
    (Family::of(id) == Some(Family::A1) && !is_waterfall(id))
        || Family::of(id) == Some(Family::A2)
        || is_wall_top(id)
}

/// Autotiles resolved with the 16-entry wall table.
pub fn is_wall_type_autotile(id: TileId) -> bool {
    is_roof(id) || is_wall_side(id)
}
