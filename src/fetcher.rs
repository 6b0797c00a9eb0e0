// src/fetcher.rs
use log::info;

use crate::config::options::FetchOptions;
use crate::error::Result;
use crate::net::ApiClient;
use crate::specs::details::DeltaContext;
use crate::specs::wire::MatchWire;
use crate::specs::{details, games};
use crate::tables::MatchTables;

pub type MatchFilter = Box<dyn Fn(&MatchWire) -> bool>;

/// Fetches pages of games and flattens them into tables.
///
/// Wraps the HTTP client with game-level filtering and the flatten step,
/// so callers only ever see finished tables.
pub struct Fetcher {
    client: ApiClient,
    delta: Option<DeltaContext>,
    filter: Option<MatchFilter>,
    matches_parsed: u64,
}

impl Fetcher {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            delta: None,
            filter: None,
            matches_parsed: 0,
        }
    }

    /// Reconstruct build actions instead of storing full per-wave
    /// snapshots. Needs the unit index and upgrade tree loaded up front.
    pub fn with_delta_builds(mut self, ctx: DeltaContext) -> Self {
        self.delta = Some(ctx);
        self
    }

    /// Keep only games the callback accepts.
    pub fn with_match_filter(mut self, filter: impl Fn(&MatchWire) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn delta_builds(&self) -> bool {
        self.delta.is_some()
    }

    /// Games flattened so far, across all pages.
    pub fn matches_parsed(&self) -> u64 {
        self.matches_parsed
    }

    /// Requests sent so far, counting retries.
    pub fn requests_made(&self) -> u64 {
        self.client.requests_made()
    }

    /// Fetch one page and flatten it. Unfinished games and games the
    /// filter rejects are dropped first.
    pub fn fetch_page(&mut self, options: &FetchOptions) -> Result<MatchTables> {
        info!("Getting games at offset {}", options.offset);
        let page = self.client.get_games(options)?;
        self.flatten(page, options.include_details)
    }

    fn flatten(&mut self, page: Vec<MatchWire>, include_details: bool) -> Result<MatchTables> {
        let mut kept: Vec<MatchWire> = page.into_iter().filter(MatchWire::is_finished).collect();
        if let Some(filter) = &self.filter {
            kept.retain(|game| filter(game));
        }
        info!("{} games kept. Parsing...", kept.len());
        self.matches_parsed += kept.len() as u64;

        let mut tables = MatchTables::new(self.delta.is_some());
        for game in &kept {
            games::extract(&mut tables, game);
            if include_details {
                details::extract(&mut tables, game, self.delta.as_ref())?;
            }
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fetcher() -> Fetcher {
        Fetcher::new(ApiClient::new("test-key").unwrap())
    }

    fn page() -> Vec<MatchWire> {
        serde_json::from_value(json!([
            { "_id": "m1", "version": "v9.06", "gameLength": 900, "gameElo": 1500 },
            { "_id": "m2", "version": "v9.06", "gameLength": 0 },
            { "_id": "m3", "version": "v9.06", "gameLength": 1300, "gameElo": 2100 },
        ]))
        .unwrap()
    }

    #[test]
    fn unfinished_games_are_dropped() {
        let mut f = fetcher();
        let tables = f.flatten(page(), false).unwrap();
        assert_eq!(tables.matches.len(), 2);
        assert_eq!(f.matches_parsed(), 2);
    }

    #[test]
    fn match_filter_runs_after_the_length_check() {
        let mut f = fetcher().with_match_filter(|game| {
            game.game_elo
                .as_ref()
                .and_then(serde_json::Number::as_f64)
                .unwrap_or(0.0)
                >= 2000.0
        });
        let tables = f.flatten(page(), false).unwrap();
        assert_eq!(tables.matches.len(), 1);
        assert_eq!(tables.matches.rows[0][0], "m3");
        assert_eq!(f.matches_parsed(), 1);
    }

    #[test]
    fn detail_tables_fill_only_when_asked() {
        let page: Vec<MatchWire> = serde_json::from_value(json!([{
            "_id": "m1",
            "version": "v9.06",
            "gameLength": 900,
            "playersData": [{ "playerId": "p1", "netWorthPerWave": [100],
                              "workersPerWave": [1], "incomePerWave": [15] }],
        }]))
        .unwrap();

        let mut f = fetcher();
        let tables = f.flatten(page.clone(), false).unwrap();
        assert!(tables.players.is_empty());

        let tables = f.flatten(page, true).unwrap();
        assert_eq!(tables.players.len(), 1);
        assert_eq!(tables.player_waves.len(), 1);
    }

    #[test]
    fn parsed_count_accumulates_across_pages() {
        let mut f = fetcher();
        f.flatten(page(), false).unwrap();
        f.flatten(page(), false).unwrap();
        assert_eq!(f.matches_parsed(), 4);
    }
}
