// src/tables.rs
//
// Flat tabular form of the API's nested match records. One `Dataset` per
// table, all cells stringly typed on the way to CSV.

/* ---------------- Schemas ---------------- */

pub const MATCHES: &[&str] = &[
    "_id", "version", "date", "queueType", "endingWave", "gameLength", "gameElo", "playerCount",
    "humanCount", "kingSpell", "side_won",
];

pub const SPELL_CHOICES: &[&str] = &["_id", "choice_1", "choice_2", "choice_3"];

pub const KINGS_HPS: &[&str] = &["_id", "wave", "left_hp", "right_hp"];

pub const PLAYERS: &[&str] = &[
    "_id", "playerId", "playerName", "playerSlot", "legion", "workers", "value", "cross",
    "overallElo", "stayedUntilEnd", "chosenSpell", "partySize", "legionSpecificElo", "mvpScore",
    "leakValue", "leaksCaughtValue", "leftAtSeconds",
];

pub const PARTIES: &[&str] = &[
    "_id", "member_1", "member_2", "member_3", "member_4", "member_5", "member_6", "member_7",
    "member_8",
];

pub const ROSTER_SLOTS: usize = 30;

pub const KINGS_UPGRADES: &[&str] = &["_id", "playerId", "wave", "upgrade", "seq_num"];

pub const PLAYER_WAVES: &[&str] = &["_id", "playerId", "wave", "workers", "income", "networth"];

pub const MERCENARIES: &[&str] = &["_id", "playerId", "received", "wave", "mercenary", "seq_num"];

pub const LEAKS: &[&str] = &["_id", "playerId", "wave", "unit", "seq_num"];

pub const BUILDS: &[&str] = &[
    "_id", "playerId", "wave", "fighter", "x", "y", "stacks", "seq_num",
];

pub const DELTA_BUILDS: &[&str] = &[
    "_id", "playerId", "wave", "fighter", "x", "y", "stacks", "seq_num", "action",
];

/// Headers for the two wide roster tables (`fighter_1..` / `roll_1..`).
fn roster_headers(prefix: &str) -> Vec<String> {
    let mut h = vec!["_id".to_string(), "playerId".to_string()];
    for i in 1..=ROSTER_SLOTS {
        h.push(format!("{prefix}_{i}"));
    }
    h
}

/* ---------------- Dataset ---------------- */

/// Headers plus string rows; the unit of everything we persist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn with_headers(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len(), "row width != header width");
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/* ---------------- Per-page table bundle ---------------- */

/// Table names in canonical order; also the default file stems.
pub const TABLE_NAMES: &[&str] = &[
    "matches",
    "spell_choices",
    "kings_hps",
    "players",
    "parties",
    "fighters",
    "rolls",
    "kings_upgrades",
    "player_waves",
    "mercenaries",
    "leaks",
    "builds",
];

/// All twelve tables extracted from one or more pages of matches.
/// The detail tables stay empty when the query skips player details.
#[derive(Clone, Debug)]
pub struct MatchTables {
    pub matches: Dataset,
    pub spell_choices: Dataset,
    pub kings_hps: Dataset,
    pub players: Dataset,
    pub parties: Dataset,
    pub fighters: Dataset,
    pub rolls: Dataset,
    pub kings_upgrades: Dataset,
    pub player_waves: Dataset,
    pub mercenaries: Dataset,
    pub leaks: Dataset,
    pub builds: Dataset,
}

impl MatchTables {
    /// Fresh empty tables. `delta_builds` selects the build table flavor:
    /// full per-wave snapshots, or reconstructed actions with an extra
    /// `action` column.
    pub fn new(delta_builds: bool) -> Self {
        Self {
            matches: Dataset::with_headers(MATCHES),
            spell_choices: Dataset::with_headers(SPELL_CHOICES),
            kings_hps: Dataset::with_headers(KINGS_HPS),
            players: Dataset::with_headers(PLAYERS),
            parties: Dataset::with_headers(PARTIES),
            fighters: Dataset {
                headers: roster_headers("fighter"),
                rows: Vec::new(),
            },
            rolls: Dataset {
                headers: roster_headers("roll"),
                rows: Vec::new(),
            },
            kings_upgrades: Dataset::with_headers(KINGS_UPGRADES),
            player_waves: Dataset::with_headers(PLAYER_WAVES),
            mercenaries: Dataset::with_headers(MERCENARIES),
            leaks: Dataset::with_headers(LEAKS),
            builds: Dataset::with_headers(if delta_builds { DELTA_BUILDS } else { BUILDS }),
        }
    }

    /// Append another bundle's rows (headers are identical by construction).
    pub fn extend(&mut self, mut page: MatchTables) {
        for (into, from) in self.iter_mut().zip(page.iter_mut()) {
            into.rows.append(&mut from.rows);
        }
    }

    /// Drop all buffered rows, keeping headers.
    pub fn clear_rows(&mut self) {
        for ds in self.iter_mut() {
            ds.rows.clear();
        }
    }

    /// Tables paired with their canonical names, in `TABLE_NAMES` order.
    pub fn iter_named(&self) -> impl Iterator<Item = (&'static str, &Dataset)> {
        [
            ("matches", &self.matches),
            ("spell_choices", &self.spell_choices),
            ("kings_hps", &self.kings_hps),
            ("players", &self.players),
            ("parties", &self.parties),
            ("fighters", &self.fighters),
            ("rolls", &self.rolls),
            ("kings_upgrades", &self.kings_upgrades),
            ("player_waves", &self.player_waves),
            ("mercenaries", &self.mercenaries),
            ("leaks", &self.leaks),
            ("builds", &self.builds),
        ]
        .into_iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Dataset> {
        [
            &mut self.matches,
            &mut self.spell_choices,
            &mut self.kings_hps,
            &mut self.players,
            &mut self.parties,
            &mut self.fighters,
            &mut self.rolls,
            &mut self.kings_upgrades,
            &mut self.player_waves,
            &mut self.mercenaries,
            &mut self.leaks,
            &mut self.builds,
        ]
        .into_iter()
    }
}
