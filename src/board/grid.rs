// src/board/grid.rs
use crate::config::consts::{GRID_COLS, GRID_ROWS};
use crate::error::ParseError;

use super::units::{UnitCode, UnitIndex};

/* ---------------- Placement strings ---------------- */

/// One parsed `"unit:x|y"` / `"unit:x|y:stacks"` placement string.
/// Coordinates are the raw fractional board positions, not grid indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub unit: String,
    pub x: f64,
    pub y: f64,
    /// Third token verbatim, present on stack-aware patches.
    pub stacks: Option<String>,
}

fn malformed(raw: &str) -> ParseError {
    ParseError::MalformedBuild(raw.to_string())
}

/// Split a placement string into unit, coordinates and optional stacks.
/// Wrong token counts and non-numeric or non-finite coordinates are
/// errors; an unknown unit is not (that's the encoder's skip condition).
pub fn parse_placement(raw: &str) -> Result<Placement, ParseError> {
    let mut parts = raw.split(':');
    let unit = parts
        .next()
        .ok_or_else(|| malformed(raw))?
        .to_ascii_lowercase();
    let coords = parts.next().ok_or_else(|| malformed(raw))?;
    let stacks = parts.next().map(str::to_string);
    if parts.next().is_some() {
        return Err(malformed(raw));
    }

    let (x, y) = coords.split_once('|').ok_or_else(|| malformed(raw))?;
    let x: f64 = x.trim().parse().map_err(|_| malformed(raw))?;
    let y: f64 = y.trim().parse().map_err(|_| malformed(raw))?;
    // f64 parsing accepts "nan" and "inf"; neither names a board cell
    if !x.is_finite() || !y.is_finite() {
        return Err(malformed(raw));
    }

    Ok(Placement { unit, x, y, stacks })
}

/* ---------------- The board ---------------- */

/// A player's board at one wave: 28 rows (y) × 18 columns (x) of
/// half-cells, each either empty or holding a unit code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: [[Option<UnitCode>; GRID_COLS]; GRID_ROWS],
}

impl Grid {
    pub fn empty() -> Self {
        Self {
            cells: [[None; GRID_COLS]; GRID_ROWS],
        }
    }

    pub fn get(&self, y: usize, x: usize) -> Option<UnitCode> {
        self.cells[y][x]
    }

    pub fn set(&mut self, y: usize, x: usize, code: UnitCode) {
        self.cells[y][x] = Some(code);
    }

    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.is_some())
            .count()
    }
}

/// Board coordinate → grid index. Units sit on half-cell positions, so
/// doubling lands on an integer.
fn half_cells(coord: f64) -> Option<usize> {
    let scaled = (coord * 2.0).round();
    if scaled < 0.0 {
        return None;
    }
    Some(scaled as usize)
}

fn cell_indices(p: &Placement, raw: &str) -> Result<(usize, usize), ParseError> {
    match (half_cells(p.y), half_cells(p.x)) {
        (Some(y), Some(x)) if y < GRID_ROWS && x < GRID_COLS => Ok((y, x)),
        _ => Err(ParseError::CoordinateOutOfRange(raw.to_string())),
    }
}

/// Build the board for one wave from its placement strings. Units the
/// index doesn't know are skipped silently; when two strings land on the
/// same cell the last write wins.
pub fn encode_wave(builds: &[String], units: &UnitIndex) -> Result<Grid, ParseError> {
    let mut grid = Grid::empty();
    for raw in builds {
        let p = parse_placement(raw)?;
        let Some(code) = units.code_of(&p.unit) else {
            continue;
        };
        let (y, x) = cell_indices(&p, raw)?;
        grid.set(y, x, code);
    }
    Ok(grid)
}
