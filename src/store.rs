// src/store.rs
use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::config::consts::STORE_SEP;
use crate::config::options::CrawlOptions;
use crate::csv::write_row;
use crate::tables::{Dataset, MatchTables};

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Append the dataset's rows to `path`, writing the header row only when
/// the file doesn't exist yet.
pub fn append_or_create(path: &Path, ds: &Dataset, sep: char) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let mut out = if path.exists() {
        BufWriter::new(OpenOptions::new().append(true).open(path)?)
    } else {
        let mut out = BufWriter::new(File::create(path)?);
        write_row(&mut out, &ds.headers, sep)?;
        out
    };

    for row in &ds.rows {
        write_row(&mut out, row, sep)?;
    }
    out.flush()
}

/// Flush every non-empty table to its CSV file and drop the buffered rows.
/// Returns the paths written this round.
pub fn flush_tables(opts: &CrawlOptions, tables: &mut MatchTables) -> io::Result<Vec<PathBuf>> {
    ensure_directory(&opts.out_dir)?;

    let mut written = Vec::new();
    for (name, ds) in tables.iter_named() {
        if ds.is_empty() {
            continue;
        }
        let path = opts.table_path(name);
        append_or_create(&path, ds, STORE_SEP)?;
        written.push(path);
    }
    tables.clear_rows();
    Ok(written)
}
