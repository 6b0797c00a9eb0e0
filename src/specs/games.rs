// src/specs/games.rs
use crate::tables::MatchTables;

use super::wire::{float_cell, num_cell, text_cell, MatchWire};

/// Append one game's match-level rows: the match summary, its three
/// spell choices and the per-wave king HP track.
pub fn extract(tables: &mut MatchTables, game: &MatchWire) {
    tables.matches.push_row(vec![
        game.id.clone(),
        game.version.clone(),
        game.date.clone(),
        text_cell(&game.queue_type),
        num_cell(&game.ending_wave),
        num_cell(&game.game_length),
        num_cell(&game.game_elo),
        num_cell(&game.player_count),
        num_cell(&game.human_count),
        text_cell(&game.king_spell),
        side_won(game).to_string(),
    ]);

    let mut spells = vec![game.id.clone()];
    for i in 0..3 {
        spells.push(game.spell_choices.get(i).cloned().unwrap_or_default());
    }
    tables.spell_choices.push_row(spells);

    // zip stops at the shorter track if the server ever disagrees
    for (i, (left, right)) in game
        .left_king_percent_hp
        .iter()
        .zip(&game.right_king_percent_hp)
        .enumerate()
    {
        tables.kings_hps.push_row(vec![
            game.id.clone(),
            (i + 1).to_string(),
            float_cell(*left),
            float_cell(*right),
        ]);
    }
}

/// The winning side, read off the left king's final HP.
fn side_won(game: &MatchWire) -> &'static str {
    match game.left_king_percent_hp.last() {
        Some(hp) if *hp == 0.0 => "right",
        _ => "left",
    }
}
