// tests/extraction_e2e.rs
//
// Wire JSON through extraction and down to CSV files on disk.
//

// json! expands one macro level per fixture key
#![recursion_limit = "256"]

use std::fs;

use serde_json::json;

use ltd2_scrape::board::{UnitIndex, UnknownBasePolicy, UpgradeTree};
use ltd2_scrape::config::options::CrawlOptions;
use ltd2_scrape::csv::parse_rows;
use ltd2_scrape::specs::details::{self, DeltaContext};
use ltd2_scrape::specs::games;
use ltd2_scrape::specs::wire::MatchWire;
use ltd2_scrape::store::flush_tables;
use ltd2_scrape::tables::MatchTables;

fn game(id: &str) -> MatchWire {
    serde_json::from_value(json!({
        "_id": id,
        "version": "v9.06.1",
        "date": "2022-03-04T05:06:07.000Z",
        "queueType": "Normal",
        "endingWave": 14,
        "gameLength": 1470,
        "gameElo": 1580,
        "playerCount": 4,
        "humanCount": 4,
        "kingSpell": "royal_guard",
        "spellChoices": ["allowance", "royal_guard", "press_the_attack"],
        "leftKingPercentHp": [1.0, 0.85],
        "rightKingPercentHp": [1.0, 0.0],
        "playersData": [{
            "playerId": "p1",
            "playerName": "someone",
            "playerSlot": 1,
            "legion": "Element",
            "workers": 12,
            "value": 5300,
            "cross": 0,
            "overallElo": 1612,
            "stayedUntilEnd": true,
            "chosenSpell": "allowance",
            "partySize": 2,
            "legionSpecificElo": 1580,
            "mvpScore": 9.5,
            "leakValue": 220,
            "leaksCaughtValue": 60,
            "leftAtSeconds": null,
            "partyMembersIds": ["p1", "p2"],
            "fighters": "pollywog_unit_id, mudman_unit_id",
            "rolls": "golem_unit_id",
            "kingUpgradesPerWave": [["upgrade_king_attack"]],
            "netWorthPerWave": [250, 480],
            "workersPerWave": [1, 2],
            "incomePerWave": [15, 18],
            "mercenariesSentPerWave": [["snail"]],
            "mercenariesReceivedPerWave": [[], ["lizard"]],
            "leaksPerWave": [[], ["pollywog_unit_id"]],
            "buildPerWave": [
                ["pollywog_unit_id:4|6:220"],
                ["pollywog_unit_id:4|6:220", "mudman_unit_id:2|2:100"],
            ],
        }],
    }))
    .unwrap()
}

fn context() -> DeltaContext {
    let units = UnitIndex::from_csv(
        "unitId,id\npollywog_unit_id,0\nmudman_unit_id,1\ngolem_unit_id,2\n",
    )
    .unwrap();
    let tree = UpgradeTree::from_json(r#"{"mudman_unit_id": ["golem_unit_id"]}"#, &units).unwrap();
    DeltaContext {
        units,
        tree,
        policy: UnknownBasePolicy::default(),
    }
}

fn extract_one(tables: &mut MatchTables, game: &MatchWire, delta: Option<&DeltaContext>) {
    games::extract(tables, game);
    details::extract(tables, game, delta).unwrap();
}

#[test]
fn one_game_fills_every_table() {
    let dir = tempfile::tempdir().unwrap();
    let opts = CrawlOptions {
        out_dir: dir.path().to_path_buf(),
        ..CrawlOptions::default()
    };

    let mut tables = MatchTables::new(false);
    extract_one(&mut tables, &game("m1"), None);
    let written = flush_tables(&opts, &mut tables).unwrap();
    assert_eq!(written.len(), 12);

    let text = fs::read_to_string(opts.table_path("matches")).unwrap();
    let rows = parse_rows(&text, ',');
    assert_eq!(
        rows[1],
        vec![
            "m1", "v9.06.1", "2022-03-04T05:06:07.000Z", "Normal", "14", "1470", "1580", "4",
            "4", "royal_guard", "left",
        ]
    );

    let text = fs::read_to_string(opts.table_path("kings_hps")).unwrap();
    let rows = parse_rows(&text, ',');
    assert_eq!(rows[1], vec!["m1", "1", "1", "1"]);
    assert_eq!(rows[2], vec!["m1", "2", "0.85", "0"]);

    let text = fs::read_to_string(opts.table_path("parties")).unwrap();
    let rows = parse_rows(&text, ',');
    assert_eq!(rows[1], vec!["m1", "p1", "p2", "", "", "", "", "", ""]);
}

#[test]
fn repeated_flushes_append_without_a_second_header() {
    let dir = tempfile::tempdir().unwrap();
    let opts = CrawlOptions {
        out_dir: dir.path().to_path_buf(),
        ..CrawlOptions::default()
    };

    let mut tables = MatchTables::new(false);
    extract_one(&mut tables, &game("m1"), None);
    flush_tables(&opts, &mut tables).unwrap();
    extract_one(&mut tables, &game("m2"), None);
    flush_tables(&opts, &mut tables).unwrap();

    let text = fs::read_to_string(opts.table_path("players")).unwrap();
    let rows = parse_rows(&text, ',');
    assert_eq!(rows.len(), 3); // header + one player per game
    assert_eq!(rows[0][0], "_id");
    assert_eq!(rows[1][0], "m1");
    assert_eq!(rows[2][0], "m2");
}

#[test]
fn summary_only_games_write_just_the_match_tables() {
    let dir = tempfile::tempdir().unwrap();
    let opts = CrawlOptions {
        out_dir: dir.path().to_path_buf(),
        ..CrawlOptions::default()
    };

    let mut g = game("m1");
    g.players_data.clear();
    let mut tables = MatchTables::new(false);
    extract_one(&mut tables, &g, None);

    let written = flush_tables(&opts, &mut tables).unwrap();
    assert_eq!(written.len(), 3); // matches, spell_choices, kings_hps
    assert!(!opts.table_path("players").exists());
    assert!(!opts.table_path("builds").exists());
}

#[test]
fn delta_mode_writes_actions_to_the_builds_table() {
    let dir = tempfile::tempdir().unwrap();
    let opts = CrawlOptions {
        out_dir: dir.path().to_path_buf(),
        ..CrawlOptions::default()
    };

    let ctx = context();
    let mut tables = MatchTables::new(true);
    extract_one(&mut tables, &game("m1"), Some(&ctx));
    flush_tables(&opts, &mut tables).unwrap();

    let text = fs::read_to_string(opts.table_path("builds")).unwrap();
    let rows = parse_rows(&text, ',');
    assert_eq!(rows[0].last().map(String::as_str), Some("action"));
    assert_eq!(
        rows[1],
        vec!["m1", "p1", "1", "pollywog_unit_id", "4", "6", "220", "1", "Placed"]
    );
    assert_eq!(
        rows[2],
        vec!["m1", "p1", "2", "mudman_unit_id", "2", "2", "100", "1", "Placed"]
    );
}

#[test]
fn fallen_left_king_scores_a_right_win() {
    let mut g = game("m1");
    g.left_king_percent_hp = vec![1.0, 0.0];
    let mut tables = MatchTables::new(false);
    games::extract(&mut tables, &g);
    let row = &tables.matches.rows[0];
    assert_eq!(row.last().map(String::as_str), Some("right"));
}
