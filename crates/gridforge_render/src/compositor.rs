//! Cell compositing
//!
//! Per cell, content layers draw bottom-up with the shadow mask and the
//! table-edge overlay slotted between the lower terrain pair and the upper
//! decoration pair. Autotiles assemble from four quadrant blits; plain
//! tiles are a single full-tile blit.

use image::Rgba;
use log::debug;

use gridforge_autotile::{quadrant_table, style_of_id, FLOOR};
use gridforge_core::{
    autotile_kind, autotile_shape, is_autotile, is_shadowing, sheet_cell, Family, MapGrid, TileId,
};

use crate::atlas::TilesetAtlas;
use crate::frame::Frame;

/// Water surface column per animation frame.
const WATER_FRAMES: [u32; 4] = [0, 1, 2, 1];

const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 128]);

/// Read-only renderer over a grid and an atlas.
///
/// The animation frame is compositor state, not grid state: callers bump it
/// over time and re-render water cells.
#[derive(Debug, Clone)]
pub struct Compositor<'a> {
    atlas: &'a TilesetAtlas,
    animation_frame: u32,
}

impl<'a> Compositor<'a> {
    pub fn new(atlas: &'a TilesetAtlas) -> Self {
        Self {
            atlas,
            animation_frame: 0,
        }
    }

    /// Set the water/waterfall animation frame counter.
    pub fn set_animation_frame(&mut self, frame: u32) {
        self.animation_frame = frame;
    }

    /// Render every cell of the grid. The frame origin is the grid origin.
    pub fn render_all(&self, frame: &mut Frame, grid: &MapGrid) {
        debug!(
            "rendering {}x{} grid at tile size {}",
            grid.width(),
            grid.height(),
            self.atlas.tile_size()
        );
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                self.render_cell(frame, grid, x, y);
            }
        }
    }

    /// Render one cell at its grid-aligned pixel position.
    pub fn render_cell(&self, frame: &mut Frame, grid: &MapGrid, x: i32, y: i32) {
        let ts = self.atlas.tile_size() as i32;
        let dx = x * ts;
        let dy = y * ts;
        let [t0, t1, t2, t3] = grid.content_tiles(x, y);

        self.draw_tile(frame, t0, dx, dy);
        self.draw_tile(frame, t1, dx, dy);
        self.draw_shadow(frame, grid.shadow_bits(x, y), dx, dy);

        // A table on the row above spills its front edge into this cell
        // unless this cell is itself a table or hidden behind a wall.
        let upper = grid.get(x, y - 1, 1);
        if self.atlas.descriptor().is_table(upper)
            && !self.atlas.descriptor().is_table(t1)
            && !is_shadowing(t0)
        {
            self.draw_table_edge(frame, upper, dx, dy);
        }

        self.draw_tile(frame, t2, dx, dy);
        self.draw_tile(frame, t3, dx, dy);
    }

    fn draw_tile(&self, frame: &mut Frame, id: TileId, dx: i32, dy: i32) {
        if id == 0 {
            return;
        }
        if is_autotile(id) {
            self.draw_autotile(frame, id, dx, dy);
        } else {
            self.draw_plain(frame, id, dx, dy);
        }
    }

    fn draw_plain(&self, frame: &mut Frame, id: TileId, dx: i32, dy: i32) {
        let Some(family) = Family::of(id) else {
            return;
        };
        let Some(sheet) = self.atlas.sheet(family) else {
            return;
        };
        let Some((col, row)) = sheet_cell(id) else {
            return;
        };
        let ts = self.atlas.tile_size();
        frame.blit(
            sheet,
            (col * ts) as i32,
            (row * ts) as i32,
            ts,
            ts,
            dx,
            dy,
        );
    }

    fn draw_autotile(&self, frame: &mut Frame, id: TileId, dx: i32, dy: i32) {
        let (Some(family), Some(kind), Some(shape)) =
            (Family::of(id), autotile_kind(id), autotile_shape(id))
        else {
            return;
        };
        let Some(style) = style_of_id(id) else {
            return;
        };
        let Some(sheet) = self.atlas.sheet(family) else {
            return;
        };

        let (bx, by) = self.block_origin(family, kind);
        let table = quadrant_table(style.table_kind());
        let entry = table[shape as usize % table.len()];
        let half = (self.atlas.tile_size() / 2) as i32;
        let is_table = self.atlas.descriptor().is_table(id);

        for (i, &[qsx, qsy]) in entry.iter().enumerate() {
            let sx = (bx as i32 * 2 + i32::from(qsx)) * half;
            let sy = (by as i32 * 2 + i32::from(qsy)) * half;
            let qdx = dx + (i as i32 % 2) * half;
            let qdy = dy + (i as i32 / 2) * half;

            if is_table && (qsy == 1 || qsy == 5) {
                // Table legs: the surface bottom row fills the quadrant,
                // with the shape's upper sliver overhanging it.
                let qsx2 = if qsy == 1 {
                    [0, 3, 2, 1][qsx as usize]
                } else {
                    i32::from(qsx)
                };
                let sx2 = (bx as i32 * 2 + qsx2) * half;
                let sy2 = (by as i32 * 2 + 3) * half;
                frame.blit(sheet, sx2, sy2, half as u32, half as u32, qdx, qdy);
                frame.blit(
                    sheet,
                    sx,
                    sy,
                    half as u32,
                    half as u32 / 2,
                    qdx,
                    qdy + half / 2,
                );
            } else {
                frame.blit(sheet, sx, sy, half as u32, half as u32, qdx, qdy);
            }
        }
    }

    fn draw_shadow(&self, frame: &mut Frame, bits: u8, dx: i32, dy: i32) {
        if bits & 0x0f == 0 {
            return;
        }
        let half = (self.atlas.tile_size() / 2) as i32;
        for i in 0..4 {
            if bits & (1 << i) != 0 {
                let qdx = dx + (i % 2) * half;
                let qdy = dy + (i / 2) * half;
                frame.fill_rect(qdx, qdy, half as u32, half as u32, SHADOW_COLOR);
            }
        }
    }

    /// Redraw the lower quadrants of the table tile above, half a tile
    /// down, as the table's front edge.
    fn draw_table_edge(&self, frame: &mut Frame, upper_id: TileId, dx: i32, dy: i32) {
        let (Some(kind), Some(shape)) = (autotile_kind(upper_id), autotile_shape(upper_id)) else {
            return;
        };
        let Some(sheet) = self.atlas.sheet(Family::A2) else {
            return;
        };
        let (bx, by) = self.block_origin(Family::A2, kind);
        let entry = FLOOR[shape as usize % FLOOR.len()];
        let half = (self.atlas.tile_size() / 2) as i32;

        for (i, &[qsx, qsy]) in entry[2..].iter().enumerate() {
            let sx = (bx as i32 * 2 + i32::from(qsx)) * half;
            let sy = (by as i32 * 2 + i32::from(qsy)) * half + half / 2;
            frame.blit(
                sheet,
                sx,
                sy,
                half as u32,
                half as u32 / 2,
                dx + (i as i32) * half,
                dy,
            );
        }
    }

    /// Top-left of the kind's block in the family sheet, in full-tile
    /// units. A1 folds the animation frame into the water and waterfall
    /// origins.
    fn block_origin(&self, family: Family, kind: u16) -> (u32, u32) {
        let tx = u32::from(kind % 8);
        let ty = u32::from(kind / 8);
        let anim = self.animation_frame;
        let surface = WATER_FRAMES[(anim % 4) as usize];
        match family {
            Family::A1 => match kind {
                0 => (surface * 2, 0),
                1 => (surface * 2, 3),
                2 => (6, 0),
                3 => (6, 3),
                _ => {
                    let mut bx = tx / 4 * 8;
                    let mut by = ty * 6 + tx / 2 % 2 * 3;
                    if kind % 2 == 0 {
                        bx += surface * 2;
                    } else {
                        bx += 6;
                        by += anim % 3;
                    }
                    (bx, by)
                }
            },
            Family::A2 => (tx * 2, ty * 3),
            Family::A3 => (tx * 2, ty * 2),
            Family::A4 => (tx * 2, ty / 2 * 5 + ty % 2 * 3),
            _ => (0, 0),
        }
    }
}
