// src/board/waves.rs
use crate::config::consts::STACKS_VERSION;
use crate::error::ParseError;

use super::diff::{diff_with_policy, Action, Delta, UnknownBasePolicy};
use super::grid::{encode_wave, parse_placement};
use super::units::{UnitIndex, UpgradeTree};

/// One action in a player's reconstructed build history.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveDelta {
    pub wave: u32,
    pub seq: u32,
    pub fighter: String,
    pub x: f64,
    pub y: f64,
    pub stacks: Option<String>,
    pub action: Action,
}

/// The current wave's stacks token for a non-Sold delta. The wave has
/// already been encoded, so every placement in it parses.
fn stacks_for(builds: &[String], delta: &Delta) -> Option<String> {
    builds
        .iter()
        .filter_map(|raw| parse_placement(raw).ok())
        .find(|p| p.unit == delta.fighter && p.x == delta.x && p.y == delta.y)
        .and_then(|p| p.stacks)
}

/// Turns per-wave board snapshots into a flat action log.
///
/// Wave 1 is the baseline: every known placement becomes a Placed record
/// in its raw order. Each later wave is encoded onto a grid and diffed
/// against the previous one. Sequence numbers restart at 1 for every
/// wave and have no gaps. Stacks tokens are only carried on games at or
/// above the version that introduced them, never on Sold records.
pub fn replay_deltas(
    waves: &[Vec<String>],
    version: f64,
    units: &UnitIndex,
    tree: &UpgradeTree,
    policy: UnknownBasePolicy,
) -> Result<Vec<WaveDelta>, ParseError> {
    let Some((first, rest)) = waves.split_first() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    let mut seq = 0;
    for raw in first {
        let p = parse_placement(raw)?;
        // disabled units are skipped
        if units.code_of(&p.unit).is_none() {
            continue;
        }
        seq += 1;
        out.push(WaveDelta {
            wave: 1,
            seq,
            fighter: p.unit,
            x: p.x,
            y: p.y,
            stacks: if version >= STACKS_VERSION { p.stacks } else { None },
            action: Action::Placed,
        });
    }

    let mut prev = encode_wave(first, units)?;
    for (i, builds) in rest.iter().enumerate() {
        let wave = i as u32 + 2;
        let cur = encode_wave(builds, units)?;
        for (n, d) in diff_with_policy(&prev, &cur, tree, units, policy)
            .into_iter()
            .enumerate()
        {
            let stacks = if version >= STACKS_VERSION && d.action != Action::Sold {
                stacks_for(builds, &d)
            } else {
                None
            };
            out.push(WaveDelta {
                wave,
                seq: n as u32 + 1,
                fighter: d.fighter,
                x: d.x,
                y: d.y,
                stacks,
                action: d.action,
            });
        }
        prev = cur;
    }
    Ok(out)
}
