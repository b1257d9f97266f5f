//! Maze store: a grid of cell codes plus a sparse table of reference points.
//!
//! Cell codes:
//! - `0` empty, walkable
//! - `1..=9` wall variants
//! - `>= 10` reference-point markers (spawn, exit, enemy, item, trigger, door)
//!
//! Markers are obstructions. The raycaster draws them as solid blocks in their
//! own colour family and movement treats them like walls; the spawn marker is
//! the exception because `Player::spawn` clears it.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

pub type Cell = u8;

pub const EMPTY: Cell = 0;
/// Returned for every out-of-bounds lookup.
pub const WALL_SENTINEL: Cell = 1;
pub const WALL_MAX: Cell = 9;
pub const SPAWN: Cell = 10;

const BUILTIN_MAP: &str = include_str!("../maps/sector7g.map");

#[inline]
pub fn is_wall(code: Cell) -> bool {
    (WALL_SENTINEL..=WALL_MAX).contains(&code)
}

#[inline]
pub fn is_reference_point(code: Cell) -> bool {
    code >= SPAWN
}

#[inline]
pub fn is_obstruction(code: Cell) -> bool {
    is_wall(code) || is_reference_point(code)
}

/// Gameplay meaning of a marker code, grouped by decade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Spawn,
    Exit,
    Enemy,
    Item,
    Trigger,
    Door,
    Unknown,
}

impl RefKind {
    pub const ALL: [RefKind; 7] = [
        RefKind::Spawn,
        RefKind::Exit,
        RefKind::Enemy,
        RefKind::Item,
        RefKind::Trigger,
        RefKind::Door,
        RefKind::Unknown,
    ];

    /// `None` for non-marker codes.
    pub fn from_code(code: Cell) -> Option<Self> {
        if !is_reference_point(code) {
            return None;
        }
        Some(match code {
            SPAWN => RefKind::Spawn,
            20..=29 => RefKind::Exit,
            30..=39 => RefKind::Enemy,
            40..=49 => RefKind::Item,
            50..=59 => RefKind::Trigger,
            60..=69 => RefKind::Door,
            _ => RefKind::Unknown,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Spawn => "spawn",
            RefKind::Exit => "exit",
            RefKind::Enemy => "enemy",
            RefKind::Item => "item",
            RefKind::Trigger => "trigger",
            RefKind::Door => "door",
            RefKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePoint {
    pub id: Cell,
    pub x: i32,
    pub y: i32,
    /// Advisory only; the raycaster never reads it.
    pub active: bool,
    pub name: String,
}

impl ReferencePoint {
    pub fn kind(&self) -> RefKind {
        RefKind::from_code(self.id).unwrap_or(RefKind::Unknown)
    }
}

impl fmt::Display for ReferencePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:2}] <{:2},{:2}> {} {}",
            self.id,
            self.x,
            self.y,
            self.name,
            if self.active { "[ONLINE]" } else { "[OFFLINE]" }
        )
    }
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("line {line}: `{token}` is not a cell code (0..=255)")]
    BadCell { line: usize, token: String },
    #[error("line {line}: row has {found} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("map has no grid rows")]
    Empty,
    #[error("map has {count} spawn cells, at most one is allowed")]
    MultipleSpawns { count: usize },
    #[error("line {line}: malformed reference point ({reason})")]
    BadReferencePoint { line: usize, reason: &'static str },
    #[error("line {line}: reference point <{x},{y}> lies outside the {width}x{height} grid")]
    ReferenceOutOfBounds {
        line: usize,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    #[error("line {line}: reference point {id} at <{x},{y}> sits on cell code {found}")]
    ReferenceMismatch {
        line: usize,
        id: Cell,
        x: i32,
        y: i32,
        found: Cell,
    },
    #[error("reading map file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>, // row-major
    points: Vec<ReferencePoint>,
}

/// The built-in "Sector 7-G" map.
pub fn load() -> Result<Grid, MapError> {
    Grid::parse(BUILTIN_MAP)
}

impl Grid {
    /// Build a grid directly from rows. Panics on ragged rows; intended for
    /// tests and tools, map files go through [`Grid::parse`].
    pub fn from_rows(rows: &[&[Cell]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        assert!(rows.iter().all(|r| r.len() == width), "ragged rows");
        Self {
            width,
            height,
            cells: rows.iter().flat_map(|r| r.iter().copied()).collect(),
            points: Vec::new(),
        }
    }

    pub fn with_points(mut self, points: Vec<ReferencePoint>) -> Self {
        self.points = points;
        self
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| MapError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut width = 0;
        let mut cells = Vec::new();
        let mut point_lines = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('@') {
                point_lines.push((line_no, rest));
                continue;
            }

            let row = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<Cell>().map_err(|_| MapError::BadCell {
                        line: line_no,
                        token: tok.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if width == 0 {
                width = row.len();
            } else if row.len() != width {
                return Err(MapError::RaggedRow {
                    line: line_no,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        if cells.is_empty() {
            return Err(MapError::Empty);
        }
        let height = cells.len() / width;

        let spawns = cells.iter().filter(|&&c| c == SPAWN).count();
        if spawns > 1 {
            return Err(MapError::MultipleSpawns { count: spawns });
        }

        let points = point_lines
            .into_iter()
            .map(|(line, rest)| parse_point(line, rest, &cells, width, height))
            .collect::<Result<Vec<_>, _>>()?;

        let grid = Self {
            width,
            height,
            cells,
            points,
        };
        info!(
            "maze loaded: {}x{} cells, {} reference points",
            grid.width,
            grid.height,
            grid.points.len()
        );
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Out-of-bounds reads as [`WALL_SENTINEL`].
    #[inline]
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(WALL_SENTINEL, |i| self.cells[i])
    }

    /// Out-of-bounds writes are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, code: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = code;
        }
    }

    #[inline]
    pub fn is_obstruction_at(&self, x: i32, y: i32) -> bool {
        is_obstruction(self.cell_at(x, y))
    }

    pub fn reference_point_at(&self, x: i32, y: i32) -> Option<&ReferencePoint> {
        self.points.iter().find(|p| p.x == x && p.y == y)
    }

    pub fn reference_points(&self) -> impl Iterator<Item = &ReferencePoint> {
        self.points.iter()
    }

    /// First spawn cell in row-major order.
    pub fn find_spawn(&self) -> Option<(i32, i32)> {
        self.cells
            .iter()
            .position(|&c| c == SPAWN)
            .map(|i| ((i % self.width) as i32, (i / self.width) as i32))
    }
}

fn parse_point(
    line: usize,
    rest: &str,
    cells: &[Cell],
    width: usize,
    height: usize,
) -> Result<ReferencePoint, MapError> {
    let bad = |reason| MapError::BadReferencePoint { line, reason };

    let mut fields = rest.split_whitespace();
    let id = fields
        .next()
        .ok_or(bad("missing id"))?
        .parse::<Cell>()
        .map_err(|_| bad("id is not a cell code"))?;
    if !is_reference_point(id) {
        return Err(bad("id below marker range"));
    }
    let x = fields
        .next()
        .ok_or(bad("missing x"))?
        .parse::<i32>()
        .map_err(|_| bad("x is not an integer"))?;
    let y = fields
        .next()
        .ok_or(bad("missing y"))?
        .parse::<i32>()
        .map_err(|_| bad("y is not an integer"))?;
    let active = match fields.next() {
        Some("1") => true,
        Some("0") => false,
        Some(_) => return Err(bad("active flag must be 0 or 1")),
        None => return Err(bad("missing active flag")),
    };
    let name = fields.collect::<Vec<_>>().join(" ");

    if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
        return Err(MapError::ReferenceOutOfBounds {
            line,
            x,
            y,
            width,
            height,
        });
    }
    let found = cells[y as usize * width + x as usize];
    if found != id {
        return Err(MapError::ReferenceMismatch {
            line,
            id,
            x,
            y,
            found,
        });
    }

    Ok(ReferencePoint {
        id,
        x,
        y,
        active,
        name,
    })
}
