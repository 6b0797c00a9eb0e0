// src/specs/mod.rs
//! # Extraction specs
//!
//! This module hosts the **table-specific extraction specs** for the games
//! API. Each spec focuses on one slice of the JSON payload and encodes
//! *where the ground truth lives in the response* and *how it flattens
//! into rows*.
//!
//! ## What lives here
//! - **The wire model** (`wire`): serde types mirroring the `/games`
//!   payload, with every field defaulting so a missing key becomes an
//!   empty cell rather than a failure.
//! - **Match-level extraction** (`games`): the match summary row, spell
//!   choices, and the per-wave king HP track.
//! - **Player-level extraction** (`details`): the nine per-player tables,
//!   including both flavors of the builds table.
//!
//! ## What does **not** live here
//! - **HTTP and retries** – `net` owns the client and error
//!   classification.
//! - **Persistence** – `store` appends finished `Dataset`s to disk.
//! - **Crawl sequencing** – offsets, save intervals and stop conditions
//!   live in `crawl`.
//!
//! ## Conventions & invariants
//! - Every spec appends **fixed-width rows** matching the header consts
//!   in `tables`; widths are checked in debug builds.
//! - Wave indices are **1-based** everywhere, as are per-wave sequence
//!   numbers.
//! - Values render literally; a missing value is an **empty cell**, never
//!   a sentinel string.
pub mod details;
pub mod games;
pub mod wire;
