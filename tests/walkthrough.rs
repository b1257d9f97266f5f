use grid_runner::camera::Camera;
use grid_runner::input::{InputState, Intent};
use grid_runner::palette;
use grid_runner::player::Kinematics;
use grid_runner::renderer::{Shading, cast_ray, column_span, render_frame};
use grid_runner::{Config, GameContext, Grid, IndexedFrame, Player, TickOutcome, maze};

const W: usize = 320;
const H: usize = 200;

#[test]
fn three_by_three_scenario() {
    let mut grid = Grid::parse("1 1 1\n1 10 1\n1 1 1\n@ 10 1 1 1 Jack-In\n").unwrap();
    let player = Player::spawn(&mut grid, &Kinematics::default());
    assert_eq!(player.pos, [1.5, 1.5]);
    assert_eq!(grid.cell_at(1, 1), maze::EMPTY);

    let hit = cast_ray(&grid, player.pos, player.camera.ray_dir(W / 2, W)).unwrap();
    assert_eq!(hit.map, (2, 1));
    assert!((hit.distance - 0.5).abs() < 1e-6);
    assert_eq!(column_span(hit.distance, H), Some((0, H - 1)));

    // Every column is wall from top to bottom in a 1x1 room.
    let mut frame = IndexedFrame::new(W, H);
    render_frame(&mut frame, &grid, &player, &Shading::default());
    let centre: Vec<_> = frame.column(W / 2).collect();
    assert!(centre.iter().all(|&c| c != palette::SKY && c != palette::FLOOR));
}

#[test]
fn walk_the_first_corridor_and_turn_south() {
    let mut game = GameContext::new(&Config::default(), maze::load().unwrap());
    let mut input = InputState::new();

    // East along row 1 until the wall at x=5 stops us.
    input.press(Intent::Forward);
    for _ in 0..60 {
        assert_eq!(game.tick(&mut input), TickOutcome::Continue);
    }
    input.release(Intent::Forward);
    assert_eq!(game.player.cell(), (4, 1));

    // Roughly a quarter turn right, from east to south (+y). Whole ticks
    // can't land on exactly pi/2, so the heading keeps a little eastward drift.
    let quarter = (std::f32::consts::FRAC_PI_2 / Kinematics::default().rotate_speed).round() as usize;
    input.press(Intent::TurnRight);
    for _ in 0..quarter {
        game.tick(&mut input);
    }
    input.release(Intent::TurnRight);
    assert!(game.player.camera.dir[1] > 0.99, "{:?}", game.player.camera.dir);

    // Pushing south slides along the x=4 column and may spill east into
    // the open cell at (5, 3); it must never end up inside a wall.
    input.press(Intent::Forward);
    for _ in 0..40 {
        game.tick(&mut input);
        let (cx, cy) = game.player.cell();
        assert!(!game.grid.is_obstruction_at(cx, cy), "inside ({cx}, {cy})");
    }
    let (cx, cy) = game.player.cell();
    assert!(cy >= 2, "moved south: {cy}");
    assert!((4..=5).contains(&cx), "stayed by the corridor: {cx}");
}

#[test]
fn turn_left_key_turns_the_view_left() {
    let mut game = GameContext::new(&Config::default(), maze::load().unwrap());
    let left_edge = game.player.camera.ray_dir(0, W);
    let mut input = InputState::new();
    input.press(Intent::TurnLeft);
    game.tick(&mut input);

    // From the east-facing spawn a left turn points towards the left column's ray (north).
    let dir = game.player.camera.dir;
    assert!(dir[1] < 0.0, "{dir:?}");
    assert!(dir[0] * left_edge[0] + dir[1] * left_edge[1] > 0.99);
}

#[test]
fn rendering_the_same_pose_twice_is_identical() {
    let game = GameContext::new(&Config::default(), maze::load().unwrap());
    let mut a = IndexedFrame::new(W, H);
    let mut b = IndexedFrame::new(W, H);
    game.render(&mut a);
    game.render(&mut b);
    assert_eq!(a, b);
}

#[test]
fn map_without_spawn_uses_fallback() {
    let grid = Grid::parse("1 1 1 1\n1 0 0 1\n1 1 1 1\n").unwrap();
    let game = GameContext::new(&Config::default(), grid);
    assert_eq!(game.player.pos, grid_runner::player::FALLBACK_SPAWN);
}

#[test]
fn far_walls_fade_to_haze_and_void() {
    // 20-cell corridor: the end wall sits beyond the void threshold.
    let mut row_open = vec!["1".to_string()];
    row_open.extend(std::iter::repeat_n("0".to_string(), 20));
    row_open.push("1".to_string());
    let wall_row = vec!["1"; 22].join(" ");
    let text = format!("{wall_row}\n{}\n{wall_row}\n", row_open.join(" "));
    let grid = Grid::parse(&text).unwrap();

    let shading = Shading::default();
    let player = Player::new([1.5, 1.5], Camera::facing([1.0, 0.0], 0.01));
    let hit = cast_ray(&grid, player.pos, [1.0, 0.0]).unwrap();
    assert!((hit.distance - 19.5).abs() < 1e-4);

    let mut frame = IndexedFrame::new(W, H);
    render_frame(&mut frame, &grid, &player, &shading);
    assert_eq!(frame.get(W / 2, H / 2), Some(palette::VOID));

    let near = Player::new([8.5, 1.5], Camera::facing([1.0, 0.0], 0.01));
    render_frame(&mut frame, &grid, &near, &shading);
    assert_eq!(frame.get(W / 2, H / 2), Some(palette::HAZE));
}
