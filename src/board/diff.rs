// src/board/diff.rs
use crate::config::consts::{GRID_COLS, GRID_ROWS};

use super::grid::Grid;
use super::units::{UnitCode, UnitIndex, UpgradeTree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Placed,
    Sold,
    Upgraded,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Placed => "Placed",
            Action::Sold => "Sold",
            Action::Upgraded => "Upgraded",
        }
    }
}

/// One reconstructed action. Coordinates are fractional board positions
/// (grid index halved), matching the placement string convention.
#[derive(Clone, Debug, PartialEq)]
pub struct Delta {
    pub fighter: String,
    pub x: f64,
    pub y: f64,
    pub action: Action,
}

/// What to do when a replaced cell's codes fall outside the upgrade tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownBasePolicy {
    /// A lookup miss on either side means different bases: Sold + Placed.
    #[default]
    Distinct,
    /// Two misses count as a shared base and resolve to one Upgraded.
    SharedWhenBothUnknown,
}

fn same_base(tree: &UpgradeTree, a: UnitCode, b: UnitCode, policy: UnknownBasePolicy) -> bool {
    match (tree.base_of(a), tree.base_of(b)) {
        (Some(x), Some(y)) => x == y,
        (None, None) => policy == UnknownBasePolicy::SharedWhenBothUnknown,
        _ => false,
    }
}

fn record(units: &UnitIndex, code: UnitCode, y: usize, x: usize, action: Action) -> Delta {
    Delta {
        fighter: units.identifier_of(code).to_string(),
        x: x as f64 / 2.0,
        y: y as f64 / 2.0,
        action,
    }
}

pub fn diff(prev: &Grid, cur: &Grid, tree: &UpgradeTree, units: &UnitIndex) -> Vec<Delta> {
    diff_with_policy(prev, cur, tree, units, UnknownBasePolicy::default())
}

/// Ordered actions that turn `prev` into `cur`: every Sold first, then
/// every Placed, then the replaced-cell resolutions, each group in
/// row-major scan order. A replaced cell becomes one Upgraded when both
/// codes share a base unit, otherwise a Sold followed by a Placed.
pub fn diff_with_policy(
    prev: &Grid,
    cur: &Grid,
    tree: &UpgradeTree,
    units: &UnitIndex,
    policy: UnknownBasePolicy,
) -> Vec<Delta> {
    let mut sold = Vec::new();
    let mut placed = Vec::new();
    let mut replaced = Vec::new();

    for y in 0..GRID_ROWS {
        for x in 0..GRID_COLS {
            match (prev.get(y, x), cur.get(y, x)) {
                (Some(old), None) => sold.push((y, x, old)),
                (None, Some(new)) => placed.push((y, x, new)),
                (Some(old), Some(new)) if old != new => replaced.push((y, x, old, new)),
                _ => {}
            }
        }
    }

    let mut deltas = Vec::with_capacity(sold.len() + placed.len() + replaced.len() * 2);
    for (y, x, old) in sold {
        deltas.push(record(units, old, y, x, Action::Sold));
    }
    for (y, x, new) in placed {
        deltas.push(record(units, new, y, x, Action::Placed));
    }
    for (y, x, old, new) in replaced {
        if same_base(tree, old, new, policy) {
            deltas.push(record(units, new, y, x, Action::Upgraded));
        } else {
            deltas.push(record(units, old, y, x, Action::Sold));
            deltas.push(record(units, new, y, x, Action::Placed));
        }
    }
    deltas
}
