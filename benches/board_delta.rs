// benches/board_delta.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ltd2_scrape::board::{
    diff, encode_wave, replay_deltas, UnitIndex, UnknownBasePolicy, UpgradeTree,
};

fn unit_index() -> UnitIndex {
    UnitIndex::from_entries((0..120u16).map(|i| (format!("unit_{i}_unit_id"), i)))
}

fn upgrade_tree(units: &UnitIndex) -> UpgradeTree {
    // units come in lines of three: base, tier two, tier three
    let mut groups = serde_json::Map::new();
    for base in (0..120u16).step_by(3) {
        let descendants = vec![
            serde_json::Value::from(format!("unit_{}_unit_id", base + 1)),
            serde_json::Value::from(format!("unit_{}_unit_id", base + 2)),
        ];
        groups.insert(
            format!("unit_{base}_unit_id"),
            serde_json::Value::from(descendants),
        );
    }
    let text = serde_json::Value::Object(groups).to_string();
    UpgradeTree::from_json(&text, units).expect("synthetic tree")
}

/// A deterministic, fairly busy game: every wave places four units and
/// upgrades one standing line. Stacks tokens change every wave.
fn synthetic_waves(waves: usize) -> Vec<Vec<String>> {
    let mut out = Vec::with_capacity(waves);
    let mut board: Vec<(u16, usize, usize)> = Vec::new();
    let mut next_slot = 0usize;
    for wave in 0..waves {
        for k in 0..4 {
            let slot = next_slot + k;
            let (x2, y2) = (slot % 18, slot / 18);
            if y2 < 28 {
                board.push(((slot % 40) as u16 * 3, x2, y2));
            }
        }
        next_slot += 4;
        if wave > 0 {
            let idx = wave % board.len();
            let (unit, x2, y2) = board[idx];
            if unit % 3 < 2 {
                board[idx] = (unit + 1, x2, y2);
            }
        }
        out.push(
            board
                .iter()
                .map(|(u, x2, y2)| {
                    format!(
                        "unit_{u}_unit_id:{}|{}:{}",
                        *x2 as f64 / 2.0,
                        *y2 as f64 / 2.0,
                        wave + 1
                    )
                })
                .collect(),
        );
    }
    out
}

fn bench_board(c: &mut Criterion) {
    let units = unit_index();
    let tree = upgrade_tree(&units);
    let waves = synthetic_waves(20);
    let last = &waves[waves.len() - 1];
    let prev = encode_wave(&waves[waves.len() - 2], &units).unwrap();
    let cur = encode_wave(last, &units).unwrap();

    c.bench_function("encode_wave_80_units", |b| {
        b.iter(|| {
            let grid = encode_wave(black_box(last), &units).unwrap();
            black_box(grid.occupied())
        })
    });

    c.bench_function("diff_adjacent_waves", |b| {
        b.iter(|| {
            let deltas = diff(black_box(&prev), black_box(&cur), &tree, &units);
            black_box(deltas.len())
        })
    });

    c.bench_function("replay_20_wave_game", |b| {
        b.iter(|| {
            let deltas = replay_deltas(
                black_box(&waves),
                9.06,
                &units,
                &tree,
                UnknownBasePolicy::default(),
            )
            .unwrap();
            black_box(deltas.len())
        })
    });
}

criterion_group!(benches, bench_board);
criterion_main!(benches);
