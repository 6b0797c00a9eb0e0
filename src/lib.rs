// src/lib.rs
//! Client library for the Legion TD 2 games API: fetch match history,
//! flatten it into tabular datasets, and persist them incrementally to CSV.
//! The `board` module reconstructs per-wave build actions from raw
//! placement snapshots.

pub mod cli;
pub mod config;
pub mod error;
pub mod specs;

pub mod board;
pub mod crawl;
pub mod csv;
pub mod fetcher;
pub mod net;
pub mod progress;
pub mod store;
pub mod tables;
