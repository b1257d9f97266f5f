//! Overhead map overlay. Each reference-point kind draws through its own
//! [`MarkerGlyph`], picked once when the minimap is built.

use std::collections::HashMap;

use crate::maze::{Grid, RefKind, is_wall};
use crate::palette::{self, ColorIndex, Shade};
use crate::player::Player;
use crate::renderer::cast_ray;
use crate::surface::PixelSurface;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphFlags {
    /// Inactive reference points are drawn in the dimmed shade.
    pub dimmed: bool,
}

pub trait MarkerGlyph {
    /// Draw into the `size`×`size` box whose top-left corner is `at`.
    fn draw_at(&self, surface: &mut dyn PixelSurface, at: (usize, usize), size: usize, flags: GlyphFlags);
}

#[inline]
fn glyph_color(kind: RefKind, flags: GlyphFlags) -> ColorIndex {
    let shade = if flags.dimmed { Shade::Dimmed } else { Shade::Full };
    palette::shade_index(palette::marker_family(kind), shade)
}

/// Solid block. Doors.
struct BlockGlyph(RefKind);

impl MarkerGlyph for BlockGlyph {
    fn draw_at(&self, surface: &mut dyn PixelSurface, at: (usize, usize), size: usize, flags: GlyphFlags) {
        surface.fill_rect(at.0, at.1, size, size, glyph_color(self.0, flags));
    }
}

/// Outline. Exits and spawns.
struct RingGlyph(RefKind);

impl MarkerGlyph for RingGlyph {
    fn draw_at(&self, surface: &mut dyn PixelSurface, at: (usize, usize), size: usize, flags: GlyphFlags) {
        let c = glyph_color(self.0, flags);
        let last = size.saturating_sub(1);
        for i in 0..size {
            surface.set_pixel(at.0 + i, at.1, c);
            surface.set_pixel(at.0 + i, at.1 + last, c);
            surface.set_pixel(at.0, at.1 + i, c);
            surface.set_pixel(at.0 + last, at.1 + i, c);
        }
    }
}

/// Diagonal cross. Enemies.
struct CrossGlyph(RefKind);

impl MarkerGlyph for CrossGlyph {
    fn draw_at(&self, surface: &mut dyn PixelSurface, at: (usize, usize), size: usize, flags: GlyphFlags) {
        let c = glyph_color(self.0, flags);
        let last = size.saturating_sub(1);
        for i in 0..size {
            surface.set_pixel(at.0 + i, at.1 + i, c);
            surface.set_pixel(at.0 + last - i, at.1 + i, c);
        }
    }
}

/// Single centred dot. Items, triggers and anything unrecognised.
struct DotGlyph(RefKind);

impl MarkerGlyph for DotGlyph {
    fn draw_at(&self, surface: &mut dyn PixelSurface, at: (usize, usize), size: usize, flags: GlyphFlags) {
        surface.set_pixel(at.0 + size / 2, at.1 + size / 2, glyph_color(self.0, flags));
    }
}

pub fn glyph_for(kind: RefKind) -> Box<dyn MarkerGlyph> {
    match kind {
        RefKind::Door => Box::new(BlockGlyph(kind)),
        RefKind::Spawn | RefKind::Exit => Box::new(RingGlyph(kind)),
        RefKind::Enemy => Box::new(CrossGlyph(kind)),
        RefKind::Item | RefKind::Trigger | RefKind::Unknown => Box::new(DotGlyph(kind)),
    }
}

pub struct Minimap {
    cell_px: usize,
    origin: (usize, usize),
    glyphs: HashMap<RefKind, Box<dyn MarkerGlyph>>,
}

impl Minimap {
    pub fn new(cell_px: usize) -> Self {
        let glyphs = RefKind::ALL.iter().map(|&k| (k, glyph_for(k))).collect();
        Self {
            cell_px: cell_px.max(1),
            origin: (2, 2),
            glyphs,
        }
    }

    #[inline]
    fn cell_origin(&self, x: i32, y: i32) -> (usize, usize) {
        (
            self.origin.0 + x as usize * self.cell_px,
            self.origin.1 + y as usize * self.cell_px,
        )
    }

    pub fn draw(&self, surface: &mut dyn PixelSurface, grid: &Grid, player: &Player) {
        let px = self.cell_px;
        surface.fill_rect(
            self.origin.0,
            self.origin.1,
            grid.width() * px,
            grid.height() * px,
            palette::MAP_BACKGROUND,
        );

        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let code = grid.cell_at(x, y);
                if !is_wall(code) {
                    continue;
                }
                if let Some(family) = palette::family_of(code) {
                    let (sx, sy) = self.cell_origin(x, y);
                    surface.fill_rect(sx, sy, px, px, palette::shade_index(family, Shade::Dimmed));
                }
            }
        }

        for point in grid.reference_points() {
            // Spawn markers are cleared once the player is placed.
            if grid.cell_at(point.x, point.y) != point.id {
                continue;
            }
            if let Some(glyph) = self.glyphs.get(&point.kind()) {
                let flags = GlyphFlags {
                    dimmed: !point.active,
                };
                glyph.draw_at(surface, self.cell_origin(point.x, point.y), px, flags);
            }
        }

        self.draw_player(surface, grid, player);
    }

    fn draw_player(&self, surface: &mut dyn PixelSurface, grid: &Grid, player: &Player) {
        let px = self.cell_px as f32;
        let to_screen = |p: [f32; 2]| {
            (
                self.origin.0 as f32 + p[0] * px,
                self.origin.1 as f32 + p[1] * px,
            )
        };

        // Facing ray up to the first obstruction
        if let Some(hit) = cast_ray(grid, player.pos, player.camera.dir) {
            let len = hit.distance.clamp(0.0, 64.0);
            let steps = (len * px).ceil() as usize;
            for i in 0..steps {
                let t = i as f32 / px;
                let (sx, sy) = to_screen([
                    player.pos[0] + player.camera.dir[0] * t,
                    player.pos[1] + player.camera.dir[1] * t,
                ]);
                if sx >= 0.0 && sy >= 0.0 {
                    surface.set_pixel(sx as usize, sy as usize, palette::MAP_RAY);
                }
            }
        }

        let (sx, sy) = to_screen(player.pos);
        if sx >= 0.0 && sy >= 0.0 {
            surface.set_pixel(sx as usize, sy as usize, palette::MAP_PLAYER);
        }
    }
}
