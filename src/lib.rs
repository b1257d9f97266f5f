//! Grid Runner - a first-person raycasting maze walker
//!
//! Core modules:
//! - `maze`: grid of cell codes and the reference-point table
//! - `camera` / `player`: pose, spawn, movement and turning
//! - `renderer`: DDA raycaster writing palette indices into a `PixelSurface`
//! - `game`: the session context and fixed-cadence frame pacing
//! - `backend` / `scaler`: winit + softbuffer presentation

pub mod backend;
pub mod camera;
pub mod config;
pub mod game;
pub mod input;
pub mod maze;
pub mod minimap;
pub mod palette;
pub mod player;
pub mod renderer;
pub mod scaler;
pub mod surface;

pub use config::Config;
pub use game::{FramePacer, GameContext, TickOutcome};
pub use maze::{Grid, MapError, ReferencePoint};
pub use player::Player;
pub use surface::{IndexedFrame, PixelSurface};
