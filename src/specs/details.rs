// src/specs/details.rs
use log::warn;

use crate::board::{parse_placement, replay_deltas, UnitIndex, UnknownBasePolicy, UpgradeTree};
use crate::config::consts::STACKS_VERSION;
use crate::error::ParseError;
use crate::tables::{MatchTables, ROSTER_SLOTS};

use super::wire::{flag_cell, num_cell, simplify_version, text_cell, MatchWire, PlayerWire};

/// Unit resources for reconstructing build actions. Without these the
/// builds table stores full per-wave snapshots instead.
pub struct DeltaContext {
    pub units: UnitIndex,
    pub tree: UpgradeTree,
    pub policy: UnknownBasePolicy,
}

/// Append one game's rows across the nine per-player tables.
pub fn extract(
    tables: &mut MatchTables,
    game: &MatchWire,
    delta: Option<&DeltaContext>,
) -> Result<(), ParseError> {
    let version = simplify_version(&game.version).unwrap_or_else(|| {
        warn!("unparseable game version {:?}, treating as 0", game.version);
        0.0
    });

    for player in &game.players_data {
        player_row(tables, game, player);
        party_row(tables, game, player);
        tables.fighters.push_row(roster_row(game, player, &player.fighters));
        tables.rolls.push_row(roster_row(game, player, &player.rolls));
        upgrade_rows(tables, game, player);
        economy_rows(tables, game, player);
        mercenary_rows(tables, game, player);
        leak_rows(tables, game, player);
        match delta {
            None => full_build_rows(tables, game, player, version)?,
            Some(ctx) => delta_build_rows(tables, game, player, version, ctx)?,
        }
    }
    Ok(())
}

/* ---------------- one row per player ---------------- */

fn player_row(tables: &mut MatchTables, game: &MatchWire, p: &PlayerWire) {
    tables.players.push_row(vec![
        game.id.clone(),
        p.player_id.clone(),
        text_cell(&p.player_name),
        num_cell(&p.player_slot),
        text_cell(&p.legion),
        num_cell(&p.workers),
        num_cell(&p.value),
        num_cell(&p.cross),
        num_cell(&p.overall_elo),
        flag_cell(&p.stayed_until_end),
        text_cell(&p.chosen_spell),
        num_cell(&p.party_size),
        num_cell(&p.legion_specific_elo),
        num_cell(&p.mvp_score),
        num_cell(&p.leak_value),
        num_cell(&p.leaks_caught_value),
        num_cell(&p.left_at_seconds),
    ]);
}

fn party_row(tables: &mut MatchTables, game: &MatchWire, p: &PlayerWire) {
    // solo players count as a party of one; no row for them
    if p.party_members_ids.len() < 2 {
        return;
    }
    let mut row = vec![game.id.clone()];
    for i in 0..8 {
        row.push(p.party_members_ids.get(i).cloned().unwrap_or_default());
    }
    tables.parties.push_row(row);
}

/// Slot k holds the k-th comma-separated roster entry, trimmed.
fn roster_row(game: &MatchWire, p: &PlayerWire, joined: &str) -> Vec<String> {
    let mut row = Vec::with_capacity(2 + ROSTER_SLOTS);
    row.push(game.id.clone());
    row.push(p.player_id.clone());
    let mut parts = joined.split(',');
    for _ in 0..ROSTER_SLOTS {
        row.push(
            parts
                .next()
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        );
    }
    row
}

/* ---------------- wave-indexed rows ---------------- */

fn upgrade_rows(tables: &mut MatchTables, game: &MatchWire, p: &PlayerWire) {
    for (i, wave) in p.king_upgrades_per_wave.iter().enumerate() {
        for (n, upgrade) in wave.iter().enumerate() {
            tables.kings_upgrades.push_row(vec![
                game.id.clone(),
                p.player_id.clone(),
                (i + 1).to_string(),
                upgrade.clone(),
                (n + 1).to_string(),
            ]);
        }
    }
}

fn economy_rows(tables: &mut MatchTables, game: &MatchWire, p: &PlayerWire) {
    for (i, ((workers, income), networth)) in p
        .workers_per_wave
        .iter()
        .zip(&p.income_per_wave)
        .zip(&p.net_worth_per_wave)
        .enumerate()
    {
        tables.player_waves.push_row(vec![
            game.id.clone(),
            p.player_id.clone(),
            (i + 1).to_string(),
            workers.to_string(),
            income.to_string(),
            networth.to_string(),
        ]);
    }
}

fn mercenary_rows(tables: &mut MatchTables, game: &MatchWire, p: &PlayerWire) {
    mercenary_block(tables, game, p, &p.mercenaries_sent_per_wave, false);
    mercenary_block(tables, game, p, &p.mercenaries_received_per_wave, true);
}

fn mercenary_block(
    tables: &mut MatchTables,
    game: &MatchWire,
    p: &PlayerWire,
    waves: &[Vec<String>],
    received: bool,
) {
    for (i, wave) in waves.iter().enumerate() {
        for (n, mercenary) in wave.iter().enumerate() {
            tables.mercenaries.push_row(vec![
                game.id.clone(),
                p.player_id.clone(),
                if received { "True" } else { "False" }.to_string(),
                (i + 1).to_string(),
                mercenary.clone(),
                (n + 1).to_string(),
            ]);
        }
    }
}

fn leak_rows(tables: &mut MatchTables, game: &MatchWire, p: &PlayerWire) {
    for (i, wave) in p.leaks_per_wave.iter().enumerate() {
        for (n, unit) in wave.iter().enumerate() {
            tables.leaks.push_row(vec![
                game.id.clone(),
                p.player_id.clone(),
                (i + 1).to_string(),
                unit.clone(),
                (n + 1).to_string(),
            ]);
        }
    }
}

/* ---------------- builds ---------------- */

fn full_build_rows(
    tables: &mut MatchTables,
    game: &MatchWire,
    p: &PlayerWire,
    version: f64,
) -> Result<(), ParseError> {
    for (i, wave) in p.build_per_wave.iter().enumerate() {
        for (n, raw) in wave.iter().enumerate() {
            let placement = parse_placement(raw)?;
            let stacks = if version >= STACKS_VERSION {
                placement.stacks.unwrap_or_default()
            } else {
                String::new()
            };
            tables.builds.push_row(vec![
                game.id.clone(),
                p.player_id.clone(),
                (i + 1).to_string(),
                placement.unit,
                format!("{}", placement.x),
                format!("{}", placement.y),
                stacks,
                (n + 1).to_string(),
            ]);
        }
    }
    Ok(())
}

fn delta_build_rows(
    tables: &mut MatchTables,
    game: &MatchWire,
    p: &PlayerWire,
    version: f64,
    ctx: &DeltaContext,
) -> Result<(), ParseError> {
    for d in replay_deltas(&p.build_per_wave, version, &ctx.units, &ctx.tree, ctx.policy)? {
        tables.builds.push_row(vec![
            game.id.clone(),
            p.player_id.clone(),
            d.wave.to_string(),
            d.fighter,
            format!("{}", d.x),
            format!("{}", d.y),
            d.stacks.unwrap_or_default(),
            d.seq.to_string(),
            d.action.as_str().to_string(),
        ]);
    }
    Ok(())
}
