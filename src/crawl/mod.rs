// src/crawl/mod.rs
//! Exhaustive crawl: page through the games index oldest-first, flatten
//! every page, and flush the tables to disk at interval boundaries.
//!
//! The index only pages up to a maximum offset. When the crawl hits it,
//! the date window slides forward to the last match seen and the offset
//! starts over, so a run can walk arbitrarily far past the page cap.

pub mod offset;

use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime};
use log::{debug, info, warn};

use crate::config::consts::{CALL_WAIT_MS, MAX_OFFSET, RATE_LIMIT_WAIT_SECS};
use crate::config::options::{CrawlOptions, FetchOptions};
use crate::error::{FetchError, Result, ScrapeError};
use crate::fetcher::Fetcher;
use crate::progress::Progress;
use crate::store;
use crate::tables::MatchTables;

use offset::OffsetCursor;

/// Crawl the whole window `fetch` describes and return the date of the
/// last match seen.
///
/// Stops when the window is exhausted (the index runs out of entries or
/// the last match passes `date_before`) or the API cuts the session off.
/// Buffered rows are flushed before every stop.
pub fn run(
    fetcher: &mut Fetcher,
    mut fetch: FetchOptions,
    crawl: &CrawlOptions,
    progress: &mut dyn Progress,
) -> Result<NaiveDateTime> {
    store::ensure_directory(&crawl.out_dir)?;

    let step = fetch.effective_limit() as u64;
    let mut cursor = OffsetCursor::new(fetch.offset, step);
    let mut buffer = MatchTables::new(fetcher.delta_builds());
    let mut last_match_date = fetch.date_after;

    let total_days = days_between(fetch.date_after, fetch.date_before) + 1;
    let mut days_left = total_days;
    progress.begin(total_days);

    loop {
        fetch.offset = cursor.current();
        let page = match fetcher.fetch_page(&fetch) {
            Ok(page) => page,
            Err(ScrapeError::Fetch(FetchError::EntryNotFound)) => {
                // ran past the last indexed game
                if buffer.matches.is_empty() {
                    warn!("entry not found with nothing buffered");
                } else {
                    flush(crawl, &mut buffer, progress)?;
                }
                break;
            }
            Err(ScrapeError::Fetch(FetchError::LimitExceeded)) => {
                warn!("request limit exceeded, saving and stopping");
                flush(crawl, &mut buffer, progress)?;
                break;
            }
            Err(ScrapeError::Fetch(FetchError::TooManyRequests)) => {
                warn!("too many requests, waiting {RATE_LIMIT_WAIT_SECS}s");
                progress.status("Rate limited, waiting...");
                thread::sleep(Duration::from_secs(RATE_LIMIT_WAIT_SECS));
                continue;
            }
            Err(e) => {
                flush(crawl, &mut buffer, progress)?;
                return Err(e);
            }
        };

        if let Some(date) = latest_match_date(&page) {
            last_match_date = date;
        }
        progress.page_done(page.matches.len());
        buffer.extend(page);

        let left = days_between(last_match_date, fetch.date_before);
        if left < days_left {
            progress.days_advanced(days_left - left);
            days_left = left;
        }

        if last_match_date >= fetch.date_before {
            flush(crawl, &mut buffer, progress)?;
            break;
        }

        if cursor.on_interval(crawl.save_interval) {
            flush(crawl, &mut buffer, progress)?;
        }

        // be polite between pages
        progress.status("Waiting...");
        thread::sleep(Duration::from_millis(CALL_WAIT_MS));

        if cursor.advance() >= MAX_OFFSET {
            cursor.reset();
            flush(crawl, &mut buffer, progress)?;
            fetch.date_after = last_match_date;
            info!("offset window exhausted, continuing after {last_match_date}");
        }
    }

    progress.finish();
    info!("{} matches collected", fetcher.matches_parsed());
    info!("last match date: {last_match_date}");
    Ok(last_match_date)
}

fn flush(
    crawl: &CrawlOptions,
    buffer: &mut MatchTables,
    progress: &mut dyn Progress,
) -> Result<()> {
    progress.status("Updating files...");
    for path in store::flush_tables(crawl, buffer)? {
        debug!("wrote {}", path.display());
    }
    progress.status("Done updating files");
    Ok(())
}

/// Whole days from `from` to `to`, clamped at zero.
fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> usize {
    (to - from).num_days().max(0) as usize
}

/// The date cell of the page's last match row. The index serves RFC 3339
/// timestamps with a trailing Z; rows keep the raw string.
fn latest_match_date(page: &MatchTables) -> Option<NaiveDateTime> {
    parse_wire_date(page.matches.rows.last()?.get(2)?)
}

fn parse_wire_date(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f").ok()
}
