// src/progress.rs
/// Lightweight progress reporting used by the long-running crawl.
/// Frontends (CLI, embedding code) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the size of the date window in days.
    fn begin(&mut self, _total_days: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Transient state ("Waiting...", "Updating files.") that may overwrite
    /// the previous status.
    fn status(&mut self, _msg: &str) {}

    /// Called when the crawl has advanced through `days` more days of matches.
    fn days_advanced(&mut self, _days: usize) {}

    /// Called after each page of matches has been parsed.
    fn page_done(&mut self, _matches: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
