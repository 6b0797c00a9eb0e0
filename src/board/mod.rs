// src/board/mod.rs
//! # Board reconstruction module
//!
//! The API reports each player's board once per wave as a flat list of
//! placement strings (`"unit:x|y"` or `"unit:x|y:stacks"` on newer
//! patches). This module turns those snapshots back into the actions the
//! player actually took:
//!
//! - `units`: the unit index (identifier to integer code and back) and the
//!   upgrade tree used to tell an in-place upgrade apart from a sell + place.
//! - `grid`: placement string parsing and the fixed 28×18 half-cell board.
//! - `diff`: ordered Placed/Sold/Upgraded deltas between two boards.
//! - `waves`: drives the differ across consecutive waves, numbering the
//!   emitted records per wave and resolving stacks on stack-aware patches.
//!
//! Everything here is pure and synchronous; the index and tree are built
//! once and shared read-only.

pub mod diff;
pub mod grid;
pub mod units;
pub mod waves;

pub use diff::{diff, diff_with_policy, Action, Delta, UnknownBasePolicy};
pub use grid::{encode_wave, parse_placement, Grid, Placement};
pub use units::{UnitCode, UnitIndex, UpgradeTree};
pub use waves::{replay_deltas, WaveDelta};
