// src/cli.rs
use std::env;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;

use crate::board::{UnitIndex, UnknownBasePolicy, UpgradeTree};
use crate::config::consts::API_KEY_ENV;
use crate::config::options::{CrawlOptions, FetchOptions, QueueType, SortBy, SortDirection};
use crate::crawl;
use crate::error::{Result, ScrapeError};
use crate::fetcher::Fetcher;
use crate::net::ApiClient;
use crate::progress::Progress;
use crate::specs::details::DeltaContext;
use crate::tables::TABLE_NAMES;

/// Everything the command line can configure.
#[derive(Default)]
pub struct CliArgs {
    pub api_key: String,
    pub fetch: FetchOptions,
    pub crawl: CrawlOptions,
    pub delta_builds: bool,
    pub units: Option<PathBuf>,
    pub upgrades: Option<PathBuf>,
    pub policy: UnknownBasePolicy,
}

pub fn run(args: CliArgs) -> Result<()> {
    if args.delta_builds && !args.fetch.include_details {
        warn!("--delta-builds has no effect without --details");
    }

    let client = ApiClient::new(&args.api_key)?;
    let mut fetcher = Fetcher::new(client);
    if args.delta_builds {
        // validated during parsing: both paths are present here
        if let (Some(units_path), Some(tree_path)) = (&args.units, &args.upgrades) {
            let units = UnitIndex::load(units_path)?;
            let tree = UpgradeTree::load(tree_path, &units)?;
            fetcher = fetcher.with_delta_builds(DeltaContext {
                units,
                tree,
                policy: args.policy,
            });
        }
    }

    let mut progress = CliProgress::default();
    let last = crawl::run(&mut fetcher, args.fetch, &args.crawl, &mut progress)?;
    println!("Last match date: {last}");
    Ok(())
}

/* ---------------- argument parsing ---------------- */

pub fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut out = CliArgs::default();

    while let Some(a) = args.next() {
        match a.as_str() {
            "--key" => out.api_key = need(&mut args, "--key")?,
            "-o" | "--out" => out.crawl.out_dir = PathBuf::from(need(&mut args, "--out")?),
            "--after" => out.fetch.date_after = parse_date(&need(&mut args, "--after")?)?,
            "--before" => out.fetch.date_before = parse_date(&need(&mut args, "--before")?)?,
            "--version" => out.fetch.version = Some(need(&mut args, "--version")?),
            "--limit" => out.fetch.limit = parse_num("--limit", &need(&mut args, "--limit")?)?,
            "--offset" => out.fetch.offset = parse_num("--offset", &need(&mut args, "--offset")?)?,
            "--sort-by" => out.fetch.sort_by = parse_sort(&need(&mut args, "--sort-by")?)?,
            "--desc" => out.fetch.sort_direction = SortDirection::Descending,
            "--queue" => out.fetch.queue_type = parse_queue(&need(&mut args, "--queue")?)?,
            "--details" => out.fetch.include_details = true,
            "--count-results" => out.fetch.count_results = true,
            "--save-interval" => {
                out.crawl.save_interval =
                    parse_num("--save-interval", &need(&mut args, "--save-interval")?)?
            }
            "--name" => {
                let v = need(&mut args, "--name")?;
                let Some((table, stem)) = v.split_once('=') else {
                    return Err(ScrapeError::Cli(format!(
                        "Invalid --name value: {v} (expected table=stem)"
                    )));
                };
                if !TABLE_NAMES.contains(&table) {
                    return Err(ScrapeError::Cli(format!("Unknown table: {table}")));
                }
                out.crawl.file_names.insert(table.to_string(), stem.to_string());
            }
            "--delta-builds" => out.delta_builds = true,
            "--units" => out.units = Some(PathBuf::from(need(&mut args, "--units")?)),
            "--upgrades" => out.upgrades = Some(PathBuf::from(need(&mut args, "--upgrades")?)),
            "--shared-unknown-base" => out.policy = UnknownBasePolicy::SharedWhenBothUnknown,
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(ScrapeError::Cli(format!("Unknown arg: {a}"))),
        }
    }

    if out.api_key.is_empty() {
        out.api_key = env::var(API_KEY_ENV).unwrap_or_default();
    }
    if out.api_key.is_empty() {
        return Err(ScrapeError::Cli(format!(
            "Missing API key: pass --key or set {API_KEY_ENV}"
        )));
    }
    if out.delta_builds && (out.units.is_none() || out.upgrades.is_none()) {
        return Err(ScrapeError::Cli(
            "--delta-builds requires --units and --upgrades".to_string(),
        ));
    }
    Ok(out)
}

fn need(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| ScrapeError::Cli(format!("Missing value for {flag}")))
}

fn parse_num<T: std::str::FromStr>(flag: &str, v: &str) -> Result<T> {
    v.parse()
        .map_err(|_| ScrapeError::Cli(format!("Invalid value for {flag}: {v}")))
}

fn parse_date(v: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| {
            ScrapeError::Cli(format!(
                "Invalid date: {v} (expected YYYY-MM-DD or \"YYYY-MM-DD HH:MM:SS\")"
            ))
        })
}

fn parse_sort(v: &str) -> Result<SortBy> {
    Ok(match v.to_ascii_lowercase().as_str() {
        "date" => SortBy::Date,
        "elo" | "gameelo" => SortBy::GameElo,
        "wave" => SortBy::Wave,
        "queue" | "queuetype" => SortBy::QueueType,
        "length" | "gamelength" => SortBy::GameLength,
        other => return Err(ScrapeError::Cli(format!("Unknown sort key: {other}"))),
    })
}

fn parse_queue(v: &str) -> Result<Option<QueueType>> {
    Ok(match v.to_ascii_lowercase().as_str() {
        "normal" => Some(QueueType::Normal),
        "classic" => Some(QueueType::Classic),
        "arcade" => Some(QueueType::Arcade),
        "any" => None,
        other => return Err(ScrapeError::Cli(format!("Unknown queue type: {other}"))),
    })
}

/* ---------------- progress on stderr ---------------- */

/// Prints crawl progress to stderr, one line per event.
#[derive(Default)]
pub struct CliProgress {
    total_days: usize,
    days_done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total_days: usize) {
        self.total_days = total_days;
        eprintln!("Fetching games across {total_days} days");
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn status(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn days_advanced(&mut self, days: usize) {
        self.days_done = (self.days_done + days).min(self.total_days);
        eprintln!("[{}/{} days]", self.days_done, self.total_days);
    }

    fn finish(&mut self) {
        eprintln!("Done.");
    }
}
