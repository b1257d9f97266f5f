use log::{info, warn};

use crate::camera::Camera;
use crate::maze::{EMPTY, Grid};

/// Used when the map has no spawn marker.
pub const FALLBACK_SPAWN: [f32; 2] = [1.5, 1.5];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    /// Cells per step. Must stay below one or a step can hop a one-cell wall.
    pub move_speed: f32,
    /// Radians per step.
    pub rotate_speed: f32,
    /// Camera plane length; 0.66 gives the classic ~66 degree view.
    pub plane_len: f32,
}

impl Default for Kinematics {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            rotate_speed: 0.05,
            plane_len: 0.66,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Backward,
}

impl Step {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            Step::Forward => 1.0,
            Step::Backward => -1.0,
        }
    }
}

/// Screen-relative turn. The camera plane points at the right screen edge,
/// so a left turn is a negative angle in y-down grid space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            Turn::Left => -1.0,
            Turn::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: [f32; 2], // fractional grid coordinates
    pub camera: Camera,
}

impl Player {
    pub fn new(pos: [f32; 2], camera: Camera) -> Self {
        Self { pos, camera }
    }

    /// Place the player at the centre of the first spawn cell (row-major),
    /// facing east, and clear the marker so the cell is walkable.
    pub fn spawn(grid: &mut Grid, kin: &Kinematics) -> Self {
        let pos = match grid.find_spawn() {
            Some((x, y)) => {
                grid.set_cell(x, y, EMPTY);
                [x as f32 + 0.5, y as f32 + 0.5]
            }
            None => {
                warn!(
                    "map has no spawn marker, falling back to ({}, {})",
                    FALLBACK_SPAWN[0], FALLBACK_SPAWN[1]
                );
                FALLBACK_SPAWN
            }
        };
        info!("spawned at ({:.1}, {:.1})", pos[0], pos[1]);
        Self::new(pos, Camera::facing([1.0, 0.0], kin.plane_len))
    }

    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        (self.pos[0].floor() as i32, self.pos[1].floor() as i32)
    }

    /// Step along the facing vector. Axes are checked independently (X at the
    /// old Y, then Y at the resulting X) so a diagonal push slides along walls.
    pub fn step(&mut self, grid: &Grid, step: Step, kin: &Kinematics) {
        let d = step.sign() * kin.move_speed;
        let new_x = self.pos[0] + self.camera.dir[0] * d;
        let new_y = self.pos[1] + self.camera.dir[1] * d;

        if !grid.is_obstruction_at(new_x.floor() as i32, self.pos[1].floor() as i32) {
            self.pos[0] = new_x;
        }
        if !grid.is_obstruction_at(self.pos[0].floor() as i32, new_y.floor() as i32) {
            self.pos[1] = new_y;
        }
    }

    pub fn turn(&mut self, turn: Turn, kin: &Kinematics) {
        self.camera.rotate(turn.sign() * kin.rotate_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{self, SPAWN, is_obstruction};
    use proptest::prelude::*;

    fn room3() -> Grid {
        Grid::from_rows(&[&[1, 1, 1], &[1, SPAWN, 1], &[1, 1, 1]])
    }

    #[test]
    fn spawn_centres_and_clears_marker() {
        let mut grid = room3();
        let p = Player::spawn(&mut grid, &Kinematics::default());
        assert_eq!(p.pos, [1.5, 1.5]);
        assert_eq!(p.cell(), (1, 1));
        assert_eq!(grid.cell_at(1, 1), EMPTY);
        assert_eq!(p.camera.dir, [1.0, 0.0]);
        assert!((p.camera.plane[1] - 0.66).abs() < 1e-6);
    }

    #[test]
    fn spawn_on_builtin_map() {
        let mut grid = maze::load().unwrap();
        let p = Player::spawn(&mut grid, &Kinematics::default());
        assert_eq!(p.cell(), (1, 1));
        assert_eq!(grid.find_spawn(), None);
    }

    #[test]
    fn spawn_without_marker_falls_back() {
        let mut grid = Grid::from_rows(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
        let before = grid.clone();
        let p = Player::spawn(&mut grid, &Kinematics::default());
        assert_eq!(p.pos, FALLBACK_SPAWN);
        assert_eq!(grid, before);
    }

    #[test]
    fn walls_stop_movement() {
        let mut grid = room3();
        let kin = Kinematics::default();
        let mut p = Player::spawn(&mut grid, &kin);
        for _ in 0..20 {
            p.step(&grid, Step::Forward, &kin);
        }
        assert_eq!(p.cell(), (1, 1));
        assert!(p.pos[0] < 2.0);
    }

    #[test]
    fn diagonal_push_slides_along_wall() {
        // Open corridor along x at y = 1; wall directly south.
        let grid = Grid::from_rows(&[
            &[1, 1, 1, 1, 1],
            &[1, 0, 0, 0, 1],
            &[1, 1, 1, 1, 1],
        ]);
        let kin = Kinematics {
            move_speed: 0.3,
            ..Kinematics::default()
        };
        let mut p = Player::new([1.5, 1.8], Camera::facing([1.0, 1.0], kin.plane_len));
        p.step(&grid, Step::Forward, &kin);
        assert!(p.pos[0] > 1.5, "x should advance: {:?}", p.pos);
        assert_eq!(p.pos[1], 1.8, "y blocked by the wall below");
    }

    #[test]
    fn largest_allowed_step_cannot_hop_a_wall() {
        let grid = Grid::from_rows(&[&[1, 1, 1, 1, 1], &[1, 0, 1, 0, 1], &[1, 1, 1, 1, 1]]);
        let kin = Kinematics {
            move_speed: 0.99,
            ..Kinematics::default()
        };
        let mut p = Player::new([1.5, 1.5], Camera::facing([1.0, 0.0], kin.plane_len));
        for _ in 0..5 {
            p.step(&grid, Step::Forward, &kin);
        }
        assert_eq!(p.cell(), (1, 1));
    }

    #[test]
    fn markers_block_movement() {
        let grid = Grid::from_rows(&[&[1, 1, 1, 1], &[1, 0, 40, 1], &[1, 1, 1, 1]]);
        let kin = Kinematics::default();
        let mut p = Player::new([1.5, 1.5], Camera::facing([1.0, 0.0], kin.plane_len));
        for _ in 0..10 {
            p.step(&grid, Step::Forward, &kin);
        }
        assert_eq!(p.cell(), (1, 1));
    }

    #[test]
    fn backward_reverses_forward() {
        let mut grid = maze::load().unwrap();
        let kin = Kinematics::default();
        let mut p = Player::spawn(&mut grid, &kin);
        p.step(&grid, Step::Forward, &kin);
        p.step(&grid, Step::Backward, &kin);
        assert!((p.pos[0] - 1.5).abs() < 1e-5);
    }

    fn dot(a: [f32; 2], b: [f32; 2]) -> f32 {
        a[0] * b[0] + a[1] * b[1]
    }

    #[test]
    fn left_turn_faces_north_from_east() {
        let kin = Kinematics::default();
        let mut p = Player::new([1.5, 1.5], Camera::facing([1.0, 0.0], kin.plane_len));
        p.turn(Turn::Left, &kin);
        assert!(p.camera.dir[1] < 0.0);
        p.turn(Turn::Right, &kin);
        p.turn(Turn::Right, &kin);
        assert!(p.camera.dir[1] > 0.0);
    }

    #[test]
    fn turns_swing_towards_the_matching_screen_edge() {
        const W: usize = 320;
        let kin = Kinematics::default();
        for heading in [[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.3, -0.7]] {
            let start = Camera::facing(heading, kin.plane_len);
            let (left, right) = (start.ray_dir(0, W), start.ray_dir(W - 1, W));

            let mut p = Player::new([1.5, 1.5], start);
            p.turn(Turn::Left, &kin);
            let d = p.camera.dir;
            assert!(dot(d, left) > dot(d, right), "left from {heading:?}: {d:?}");

            let mut p = Player::new([1.5, 1.5], start);
            p.turn(Turn::Right, &kin);
            let d = p.camera.dir;
            assert!(dot(d, right) > dot(d, left), "right from {heading:?}: {d:?}");
        }
    }

    fn turn_strategy() -> impl Strategy<Value = Turn> {
        prop_oneof![Just(Turn::Left), Just(Turn::Right)]
    }

    fn step_strategy() -> impl Strategy<Value = (Option<Step>, Option<Turn>)> {
        (
            prop_oneof![Just(None), Just(Some(Step::Forward)), Just(Some(Step::Backward))],
            prop_oneof![Just(None), turn_strategy().prop_map(Some)],
        )
    }

    proptest! {
        #[test]
        fn rotation_keeps_plane_perpendicular(turns in prop::collection::vec(turn_strategy(), 0..500)) {
            let kin = Kinematics::default();
            let mut p = Player::new([1.5, 1.5], Camera::facing([1.0, 0.0], kin.plane_len));
            for t in turns {
                p.turn(t, &kin);
            }
            let cam = p.camera;
            let dot = cam.dir[0] * cam.plane[0] + cam.dir[1] * cam.plane[1];
            prop_assert!(dot.abs() < 1e-3, "dot = {}", dot);
            let dir_len = (cam.dir[0].powi(2) + cam.dir[1].powi(2)).sqrt();
            let plane_len = (cam.plane[0].powi(2) + cam.plane[1].powi(2)).sqrt();
            prop_assert!((plane_len / dir_len - kin.plane_len).abs() < 1e-3);
        }

        #[test]
        fn movement_never_enters_obstruction(
            start in 0usize..24 * 24,
            angle in 0.0f32..std::f32::consts::TAU,
            moves in prop::collection::vec(step_strategy(), 1..200),
            speed in 0.05f32..0.99,
        ) {
            let grid = maze::load().unwrap();
            let (sx, sy) = ((start % 24) as i32, (start / 24) as i32);
            prop_assume!(!is_obstruction(grid.cell_at(sx, sy)));

            let kin = Kinematics { move_speed: speed, ..Kinematics::default() };
            let mut p = Player::new(
                [sx as f32 + 0.5, sy as f32 + 0.5],
                Camera::facing([angle.cos(), angle.sin()], kin.plane_len),
            );
            for (step, turn) in moves {
                if let Some(t) = turn {
                    p.turn(t, &kin);
                }
                if let Some(s) = step {
                    p.step(&grid, s, &kin);
                }
                let (cx, cy) = p.cell();
                prop_assert!(!grid.is_obstruction_at(cx, cy), "entered ({}, {})", cx, cy);
            }
        }
    }
}
