// src/config/options.rs
use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{NaiveDateTime, Utc};

use super::consts::*;

/// Earliest match the API knows about. Used as the default lower bound
/// of the crawl window.
pub fn first_match_date() -> NaiveDateTime {
    // The constant is well-formed; fall back to the epoch if it ever isn't.
    NaiveDateTime::parse_from_str(FIRST_MATCH_DATE, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_default()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueType {
    Normal,
    Classic,
    Arcade,
}

impl QueueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueType::Normal => "Normal",
            QueueType::Classic => "Classic",
            QueueType::Arcade => "Arcade",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortBy {
    Date,
    GameElo,
    Wave,
    QueueType,
    GameLength,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::GameElo => "gameElo",
            SortBy::Wave => "wave",
            SortBy::QueueType => "queueType",
            SortBy::GameLength => "gameLength",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Wire value: 1 is ASC, -1 is DESC.
    pub fn value(&self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Query parameters for one `/games` request.
#[derive(Clone, Debug)]
pub struct FetchOptions {
    /// Patch version filter, e.g. "v9.02". None queries all versions.
    pub version: Option<String>,
    /// Page size; the API caps this at 50.
    pub limit: u32,
    pub offset: u64,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
    /// Matches that started after this UTC time.
    pub date_after: NaiveDateTime,
    /// Matches that started before this UTC time.
    pub date_before: NaiveDateTime,
    /// Ask the API for per-player detail blocks.
    pub include_details: bool,
    pub count_results: bool,
    /// None omits the parameter and queries every queue.
    pub queue_type: Option<QueueType>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            version: None,
            limit: MAX_PAGE_LIMIT,
            offset: 0,
            sort_by: SortBy::Date,
            sort_direction: SortDirection::Ascending,
            date_after: first_match_date(),
            date_before: Utc::now().naive_utc(),
            include_details: false,
            count_results: false,
            queue_type: Some(QueueType::Normal),
        }
    }
}

impl FetchOptions {
    /// Page size with the API cap applied. Warns once per out-of-range value.
    pub fn effective_limit(&self) -> u32 {
        if self.limit > MAX_PAGE_LIMIT {
            log::warn!(
                "limit parameter must be <= {MAX_PAGE_LIMIT}, got {}. Clamping.",
                self.limit
            );
            MAX_PAGE_LIMIT
        } else {
            self.limit
        }
    }

    /// The request's query string, None-valued parameters omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(10);
        if let Some(version) = &self.version {
            pairs.push(("version", version.clone()));
        }
        pairs.push(("limit", self.effective_limit().to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs.push(("sortBy", self.sort_by.as_str().to_string()));
        pairs.push(("sortDirection", self.sort_direction.value().to_string()));
        pairs.push(("dateAfter", wire_date(self.date_after)));
        pairs.push(("dateBefore", wire_date(self.date_before)));
        pairs.push(("includeDetails", self.include_details.to_string()));
        pairs.push(("countResults", self.count_results.to_string()));
        if let Some(queue) = self.queue_type {
            pairs.push(("queueType", queue.as_str().to_string()));
        }
        pairs
    }
}

/// Timestamps go over the wire as `YYYY-MM-DD HH:MM:SS`.
fn wire_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Settings for a long-running exhaustive crawl.
#[derive(Clone, Debug)]
pub struct CrawlOptions {
    pub out_dir: PathBuf,
    /// Flush buffered tables to disk whenever the offset passes a multiple
    /// of this value.
    pub save_interval: u64,
    /// Per-table file name overrides (stem only, no extension), keyed by
    /// table name. Tables not listed use `<name>.csv`.
    pub file_names: HashMap<String, String>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            save_interval: DEFAULT_SAVE_INTERVAL,
            file_names: HashMap::new(),
        }
    }
}

impl CrawlOptions {
    /// Resolved output path for one table.
    pub fn table_path(&self, table: &str) -> PathBuf {
        let stem = self
            .file_names
            .get(table)
            .map(String::as_str)
            .unwrap_or(table);
        self.out_dir.join(format!("{stem}.csv"))
    }
}
