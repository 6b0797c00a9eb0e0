// src/specs/wire.rs
use serde::Deserialize;
use serde_json::{Number, Value};

/// One game as the `/games` endpoint serves it. Every field defaults so
/// absent keys become empty cells downstream instead of hard failures.
/// Player details only arrive when the query asks for them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchWire {
    #[serde(rename = "_id")]
    pub id: String,
    pub version: String,
    pub date: String,
    pub queue_type: Option<String>,
    pub ending_wave: Option<Number>,
    pub game_length: Option<Number>,
    pub game_elo: Option<Number>,
    pub player_count: Option<Number>,
    pub human_count: Option<Number>,
    pub king_spell: Option<String>,
    pub spell_choices: Vec<String>,
    pub left_king_percent_hp: Vec<f64>,
    pub right_king_percent_hp: Vec<f64>,
    pub players_data: Vec<PlayerWire>,
}

impl MatchWire {
    /// Games still in progress carry a zero length and are dropped.
    pub fn is_finished(&self) -> bool {
        self.game_length
            .as_ref()
            .and_then(Number::as_f64)
            .map(|secs| secs > 0.0)
            .unwrap_or(false)
    }
}

/// Per-player detail block inside a game.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerWire {
    pub player_id: String,
    pub player_name: Option<String>,
    pub player_slot: Option<Number>,
    pub legion: Option<String>,
    pub workers: Option<Number>,
    pub value: Option<Number>,
    pub cross: Option<Number>,
    pub overall_elo: Option<Number>,
    pub stayed_until_end: Option<Value>,
    pub chosen_spell: Option<String>,
    pub party_size: Option<Number>,
    pub legion_specific_elo: Option<Number>,
    pub mvp_score: Option<Number>,
    pub leak_value: Option<Number>,
    pub leaks_caught_value: Option<Number>,
    pub left_at_seconds: Option<Number>,
    pub party_members_ids: Vec<String>,
    /// Comma-joined end-of-game roster, e.g. `"pollywog_unit_id, mudman_unit_id"`.
    pub fighters: String,
    pub rolls: String,
    pub king_upgrades_per_wave: Vec<Vec<String>>,
    pub net_worth_per_wave: Vec<Number>,
    pub workers_per_wave: Vec<Number>,
    pub income_per_wave: Vec<Number>,
    pub mercenaries_sent_per_wave: Vec<Vec<String>>,
    pub mercenaries_received_per_wave: Vec<Vec<String>>,
    pub leaks_per_wave: Vec<Vec<String>>,
    pub build_per_wave: Vec<Vec<String>>,
}

/* ---------------- cell rendering ---------------- */

// Cells render the wire values literally; a missing value is an empty cell.

pub(crate) fn text_cell(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

pub(crate) fn num_cell(v: &Option<Number>) -> String {
    v.as_ref().map(Number::to_string).unwrap_or_default()
}

pub(crate) fn float_cell(v: f64) -> String {
    format!("{v}")
}

/// Boolean-ish cell. The server has served this as a bool, a 0/1 int
/// and (rarely) a string, so coerce by truthiness.
pub(crate) fn flag_cell(v: &Option<Value>) -> String {
    let truthy = match v {
        None | Some(Value::Null) => return String::new(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };
    if truthy { "True" } else { "False" }.to_string()
}

/* ---------------- version strings ---------------- */

/// Reduce a patch version like `"v9.06.1"` to its `major.minor` number,
/// 9.06 here. The leading `v` is optional and hotfix letters after the
/// minor digits (`"v9.02b"`) are ignored. Returns None when the prefix
/// is not numeric.
pub fn simplify_version(raw: &str) -> Option<f64> {
    let trimmed = raw.strip_prefix('v').unwrap_or(raw);
    let mut parts = trimmed.split('.');
    let major = parts.next()?;
    let minor: String = parts
        .next()
        .map(|m| m.chars().take_while(|c| c.is_ascii_digit()).collect())
        .unwrap_or_default();
    let joined = if minor.is_empty() {
        major.to_string()
    } else {
        format!("{major}.{minor}")
    };
    joined.parse().ok()
}
