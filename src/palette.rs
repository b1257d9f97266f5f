//! 256-entry indexed palette.
//!
//! Fixed slots sit below [`FAMILY_BASE`]; above it every wall code and marker
//! kind owns a ramp of [`SHADES`] entries: full, full-side, dimmed, dimmed-side.

use crate::maze::{self, Cell, RefKind};

pub type ColorIndex = u8;

pub const VOID: ColorIndex = 0;
pub const SKY: ColorIndex = 1;
pub const FLOOR: ColorIndex = 2;
pub const HAZE: ColorIndex = 3;
pub const HAZE_DARK: ColorIndex = 4;
pub const MAP_BACKGROUND: ColorIndex = 5;
pub const MAP_PLAYER: ColorIndex = 6;
pub const MAP_RAY: ColorIndex = 7;

pub const FAMILY_BASE: usize = 16;
pub const SHADES: usize = 4;

/// Ramp positions inside a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Full = 0,
    FullSide = 1,
    Dimmed = 2,
    DimmedSide = 3,
}

const SHADE_FACTORS: [f32; SHADES] = [1.0, 0.78, 0.55, 0.42];

// Wall codes 1..=9.
const WALL_RGB: [(u8, u8, u8); 9] = [
    (0, 255, 255),   // neon grid
    (80, 255, 80),   // circuit
    (255, 80, 255),  // hologram
    (160, 64, 220),  // data stream
    (200, 72, 56),   // brick
    (150, 150, 160), // stone
    (150, 100, 50),  // wood
    (240, 220, 70),  // hazard
    (70, 120, 255),  // glass
];

fn marker_rgb(kind: RefKind) -> (u8, u8, u8) {
    match kind {
        RefKind::Spawn => (255, 255, 255),
        RefKind::Exit => (180, 255, 200),
        RefKind::Enemy => (255, 50, 60),
        RefKind::Item => (255, 210, 0),
        RefKind::Trigger => (255, 140, 0),
        RefKind::Door => (255, 90, 160),
        RefKind::Unknown => (120, 120, 120),
    }
}

/// Family slot for a cell code: walls take 0..9, marker kinds follow.
pub fn family_of(code: Cell) -> Option<usize> {
    if maze::is_wall(code) {
        return Some(code as usize - 1);
    }
    RefKind::from_code(code).map(marker_family)
}

pub fn marker_family(kind: RefKind) -> usize {
    WALL_RGB.len() + RefKind::ALL.iter().position(|&k| k == kind).unwrap_or(0)
}

#[inline]
pub fn shade_index(family: usize, shade: Shade) -> ColorIndex {
    (FAMILY_BASE + family * SHADES + shade as usize) as ColorIndex
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // 0x00RRGGBB, the layout softbuffer expects
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

#[derive(Debug, Clone)]
pub struct Palette {
    entries: [u32; 256],
}

impl Palette {
    pub fn neon() -> Self {
        let mut entries = [0u32; 256];
        entries[VOID as usize] = pack_rgb(0, 0, 0);
        entries[SKY as usize] = pack_rgb(0, 0, 170);
        entries[FLOOR as usize] = pack_rgb(0, 0, 0);
        entries[HAZE as usize] = pack_rgb(0, 0, 120);
        entries[HAZE_DARK as usize] = pack_rgb(0, 0, 70);
        entries[MAP_BACKGROUND as usize] = pack_rgb(16, 16, 24);
        entries[MAP_PLAYER as usize] = pack_rgb(255, 255, 85);
        entries[MAP_RAY as usize] = pack_rgb(255, 255, 255);

        let families = WALL_RGB
            .iter()
            .copied()
            .chain(RefKind::ALL.iter().map(|&k| marker_rgb(k)));
        for (family, (r, g, b)) in families.enumerate() {
            for (shade, f) in SHADE_FACTORS.iter().enumerate() {
                let scale = |c: u8| (c as f32 * f).round() as u8;
                entries[FAMILY_BASE + family * SHADES + shade] = pack_rgb(scale(r), scale(g), scale(b));
            }
        }
        Self { entries }
    }

    #[inline]
    pub fn rgb(&self, index: ColorIndex) -> u32 {
        self.entries[index as usize]
    }

    pub fn set(&mut self, index: ColorIndex, rgb: u32) {
        self.entries[index as usize] = rgb;
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::neon()
    }
}
