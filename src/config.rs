//! Runtime configuration
//!
//! Loaded from the JSON file named by `MAZE_CONFIG`; any field left out keeps
//! its default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::palette::{Palette, SKY, FLOOR, pack_rgb};
use crate::player::Kinematics;
use crate::renderer::Shading;

pub const CONFIG_ENV: &str = "MAZE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Internal frame size; the window stretches it
    pub screen_width: usize,
    pub screen_height: usize,
    /// Initial window size as a multiple of the frame
    pub window_scale: u32,
    /// Fixed tick cadence (20 ms = 50 Hz)
    pub tick_ms: u64,

    /// Map file; the built-in map when unset
    pub map: Option<PathBuf>,

    // === Movement ===
    pub move_speed: f32,
    pub rotate_speed: f32,
    pub fov_deg: f32,

    // === Fog bands (cells) ===
    pub dim_beyond: f32,
    pub haze_beyond: f32,
    pub void_beyond: f32,

    // === Colours, 0xRRGGBB ===
    pub sky_rgb: u32,
    pub floor_rgb: u32,

    // === HUD ===
    pub show_minimap: bool,
    pub minimap_cell_px: usize,
}

impl Default for Config {
    fn default() -> Self {
        let kin = Kinematics::default();
        let shading = Shading::default();
        Self {
            screen_width: 320,
            screen_height: 200,
            window_scale: 3,
            tick_ms: 20,

            map: None,

            move_speed: kin.move_speed,
            rotate_speed: kin.rotate_speed,
            fov_deg: 2.0 * kin.plane_len.atan().to_degrees(),

            dim_beyond: shading.dim_beyond,
            haze_beyond: shading.haze_beyond,
            void_beyond: shading.void_beyond,

            sky_rgb: pack_rgb(0, 0, 170),
            floor_rgb: pack_rgb(0, 0, 0),

            show_minimap: false,
            minimap_cell_px: 3,
        }
    }
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let config: Config = serde_json::from_str(&txt)
            .with_context(|| format!("parse config json: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// `MAZE_CONFIG` if set, defaults otherwise.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::info!("Loading config from {}", Path::new(&path).display());
                Self::from_path(path)
            }
            None => {
                log::info!("Using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.screen_width >= 2 && self.screen_height >= 2,
            "screen must be at least 2x2, got {}x{}",
            self.screen_width,
            self.screen_height
        );
        ensure!(self.window_scale >= 1, "window_scale must be at least 1");
        ensure!(self.tick_ms > 0, "tick_ms must be positive");
        // Collision only checks the destination cell.
        ensure!(
            self.move_speed > 0.0 && self.move_speed < 1.0,
            "move_speed must lie in (0, 1) cells per tick, got {}",
            self.move_speed
        );
        ensure!(
            self.rotate_speed.is_finite() && self.rotate_speed > 0.0,
            "rotate_speed must be a positive number of radians, got {}",
            self.rotate_speed
        );
        ensure!(
            self.fov_deg > 0.0 && self.fov_deg < 180.0,
            "fov_deg must lie in (0, 180), got {}",
            self.fov_deg
        );
        ensure!(
            self.dim_beyond <= self.haze_beyond && self.haze_beyond <= self.void_beyond,
            "fog bands must be ordered: dim <= haze <= void"
        );
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            move_speed: self.move_speed,
            rotate_speed: self.rotate_speed,
            plane_len: crate::camera::Camera::plane_len_from_fov(self.fov_deg),
        }
    }

    pub fn shading(&self) -> Shading {
        Shading {
            dim_beyond: self.dim_beyond,
            haze_beyond: self.haze_beyond,
            void_beyond: self.void_beyond,
            ..Shading::default()
        }
    }

    pub fn palette(&self) -> Palette {
        let mut palette = Palette::neon();
        palette.set(SKY, self.sky_rgb & 0x00FF_FFFF);
        palette.set(FLOOR, self.floor_rgb & 0x00FF_FFFF);
        palette
    }
}
