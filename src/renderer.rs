use crate::maze::{Cell, Grid, is_obstruction};
use crate::palette::{self, ColorIndex, Shade};
use crate::player::Player;
use crate::surface::PixelSurface;

/// Distance bands for the fog cue, in cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    pub dim_beyond: f32,
    pub haze_beyond: f32,
    pub void_beyond: f32,
    pub sky: ColorIndex,
    pub floor: ColorIndex,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            dim_beyond: 5.0,
            haze_beyond: 10.0,
            void_beyond: 15.0,
            sky: palette::SKY,
            floor: palette::FLOOR,
        }
    }
}

/// Which family of grid lines the ray crossed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Crossed a vertical line (x changed).
    X,
    /// Crossed a horizontal line (y changed); drawn one shade darker.
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Perpendicular distance to the camera plane, not Euclidean length.
    pub distance: f32,
    pub cell: Cell,
    pub side: Side,
    pub map: (i32, i32),
}

/// Step length between successive crossings of one axis' grid lines.
/// A zero component never crosses them.
#[inline]
fn axis_delta(d: f32) -> f32 {
    if d == 0.0 { f32::INFINITY } else { (1.0 / d).abs() }
}

/// DDA march from `origin` along `ray` until an obstruction is entered.
/// Returns `None` only for a zero ray vector.
///
/// Terminates on any grid: out-of-bounds cells read as wall, so a ray that
/// leaves the map stops on its first step outside.
pub fn cast_ray(grid: &Grid, origin: [f32; 2], ray: [f32; 2]) -> Option<RayHit> {
    if ray[0] == 0.0 && ray[1] == 0.0 {
        return None;
    }

    let mut map_x = origin[0].floor() as i32;
    let mut map_y = origin[1].floor() as i32;

    let delta_x = axis_delta(ray[0]);
    let delta_y = axis_delta(ray[1]);

    // Parallel axes get INFINITY outright; `0 * inf` would be NaN.
    let (step_x, mut side_x) = if ray[0] < 0.0 {
        (-1, (origin[0] - map_x as f32) * delta_x)
    } else if ray[0] > 0.0 {
        (1, (map_x as f32 + 1.0 - origin[0]) * delta_x)
    } else {
        (0, f32::INFINITY)
    };
    let (step_y, mut side_y) = if ray[1] < 0.0 {
        (-1, (origin[1] - map_y as f32) * delta_y)
    } else if ray[1] > 0.0 {
        (1, (map_y as f32 + 1.0 - origin[1]) * delta_y)
    } else {
        (0, f32::INFINITY)
    };

    loop {
        let side = if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            Side::X
        } else {
            side_y += delta_y;
            map_y += step_y;
            Side::Y
        };
        let cell = grid.cell_at(map_x, map_y);
        if is_obstruction(cell) {
            let distance = match side {
                Side::X => (map_x as f32 - origin[0] + (1 - step_x) as f32 * 0.5) / ray[0],
                Side::Y => (map_y as f32 - origin[1] + (1 - step_y) as f32 * 0.5) / ray[1],
            };
            return Some(RayHit {
                distance,
                cell,
                side,
                map: (map_x, map_y),
            });
        }
    }
}

/// Colour for a wall hit: family by cell code, band by distance, one shade
/// darker on `Side::Y`.
pub fn wall_color(cell: Cell, distance: f32, side: Side, shading: &Shading) -> ColorIndex {
    let darker = side == Side::Y;
    if distance > shading.void_beyond {
        return palette::VOID;
    }
    if distance > shading.haze_beyond {
        return if darker {
            palette::HAZE_DARK
        } else {
            palette::HAZE
        };
    }
    let Some(family) = palette::family_of(cell) else {
        return palette::VOID;
    };
    let shade = match (distance > shading.dim_beyond, darker) {
        (false, false) => Shade::Full,
        (false, true) => Shade::FullSide,
        (true, false) => Shade::Dimmed,
        (true, true) => Shade::DimmedSide,
    };
    palette::shade_index(family, shade)
}

/// Vertical span `[top, bottom]` of a wall column, clipped to the surface.
/// Far walls shrink to a single pixel on the horizon row.
pub fn column_span(distance: f32, height: usize) -> Option<(usize, usize)> {
    if height == 0 || !(distance > 0.0) {
        return if height > 0 && distance == 0.0 {
            Some((0, height - 1))
        } else {
            None
        };
    }
    let line_h = height as f32 / distance;
    let half = (line_h / 2.0) as i64;
    let centre = (height / 2) as i64;
    let top = (centre - half).max(0);
    let bottom = (centre + half).min(height as i64 - 1);
    Some((top as usize, bottom as usize))
}

/// Rasterize the player's view into `surface`.
pub fn render_frame(surface: &mut dyn PixelSurface, grid: &Grid, player: &Player, shading: &Shading) {
    let width = surface.width();
    let height = surface.height();

    // Clear background
    let mid = height / 2;
    surface.fill_rows(0, mid, shading.sky);
    surface.fill_rows(mid, height, shading.floor);

    for x in 0..width {
        let ray = player.camera.ray_dir(x, width);
        let Some(hit) = cast_ray(grid, player.pos, ray) else {
            continue;
        };
        if let Some((top, bottom)) = column_span(hit.distance, height) {
            let color = wall_color(hit.cell, hit.distance, hit.side, shading);
            surface.vline(x, top, bottom, color);
        }
    }
}
