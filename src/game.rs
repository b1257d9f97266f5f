//! Game context: everything one running session owns, passed explicitly to
//! the systems that need it.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::Config;
use crate::input::{InputState, Intent};
use crate::maze::Grid;
use crate::minimap::Minimap;
use crate::player::{Kinematics, Player, Step, Turn};
use crate::renderer::{Shading, render_frame};
use crate::surface::PixelSurface;

/// Ticks run back to back after a stall before the rest are dropped.
pub const MAX_CATCH_UP: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

pub struct GameContext {
    pub grid: Grid,
    pub player: Player,
    kinematics: Kinematics,
    shading: Shading,
    minimap: Minimap,
    show_minimap: bool,
    ticks: u64,
}

impl GameContext {
    pub fn new(config: &Config, mut grid: Grid) -> Self {
        let kinematics = config.kinematics();
        let player = Player::spawn(&mut grid, &kinematics);

        info!("grid {}x{}", grid.width(), grid.height());
        for point in grid.reference_points() {
            info!("  {point}");
        }

        Self {
            grid,
            player,
            kinematics,
            shading: config.shading(),
            minimap: Minimap::new(config.minimap_cell_px),
            show_minimap: config.show_minimap,
            ticks: 0,
        }
    }

    /// Apply one tick of input. Opposing held intents cancel out.
    pub fn tick(&mut self, input: &mut InputState) -> TickOutcome {
        self.ticks += 1;

        for intent in input.take_pressed() {
            match intent {
                Intent::Quit => {
                    info!("quit after {} ticks", self.ticks);
                    return TickOutcome::Quit;
                }
                Intent::ToggleMap => {
                    self.show_minimap = !self.show_minimap;
                    debug!("minimap {}", if self.show_minimap { "on" } else { "off" });
                }
                _ => {}
            }
        }

        let kin = self.kinematics;
        if input.is_held(Intent::Forward) {
            self.player.step(&self.grid, Step::Forward, &kin);
        }
        if input.is_held(Intent::Backward) {
            self.player.step(&self.grid, Step::Backward, &kin);
        }
        if input.is_held(Intent::TurnLeft) {
            self.player.turn(Turn::Left, &kin);
        }
        if input.is_held(Intent::TurnRight) {
            self.player.turn(Turn::Right, &kin);
        }

        TickOutcome::Continue
    }

    pub fn render(&self, surface: &mut dyn PixelSurface) {
        render_frame(surface, &self.grid, &self.player, &self.shading);
        if self.show_minimap {
            self.minimap.draw(surface, &self.grid, &self.player);
        }
    }

    #[inline]
    pub fn minimap_visible(&self) -> bool {
        self.show_minimap
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Fixed-cadence tick scheduler.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next: Instant,
}

impl FramePacer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    /// How many ticks are due at `now`, capped at [`MAX_CATCH_UP`]. Ticks past
    /// the cap are dropped so a long stall doesn't replay seconds of input.
    pub fn ticks_due(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while self.next <= now && due < MAX_CATCH_UP {
            self.next += self.interval;
            due += 1;
        }
        if self.next <= now {
            self.next = now + self.interval;
        }
        due
    }

    #[inline]
    pub fn next_deadline(&self) -> Instant {
        self.next
    }
}
