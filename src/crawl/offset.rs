// src/crawl/offset.rs
/// Paging cursor for the games index offset parameter.
#[derive(Clone, Copy, Debug)]
pub struct OffsetCursor {
    current: u64,
    step: u64,
}

impl OffsetCursor {
    /// `start` positions the first page; `step` is the page size.
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            current: start,
            step,
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Advance one page and return the new offset.
    pub fn advance(&mut self) -> u64 {
        self.current += self.step;
        self.current
    }

    /// Back to the top of a fresh date window.
    pub fn reset(&mut self) -> u64 {
        self.current = 0;
        self.current
    }

    /// True when the current offset sits on a save boundary. An interval
    /// of zero never saves mid-run.
    pub fn on_interval(&self, interval: u64) -> bool {
        interval > 0 && self.current >= interval && self.current % interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_page_size() {
        let mut cursor = OffsetCursor::new(0, 50);
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.advance(), 50);
        assert_eq!(cursor.advance(), 100);
    }

    #[test]
    fn starts_where_told_and_resets_to_zero() {
        let mut cursor = OffsetCursor::new(200, 50);
        assert_eq!(cursor.current(), 200);
        cursor.advance();
        assert_eq!(cursor.reset(), 0);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn interval_boundaries() {
        let mut cursor = OffsetCursor::new(0, 50);
        assert!(!cursor.on_interval(500));
        while cursor.advance() < 500 {}
        assert!(cursor.on_interval(500));
        cursor.advance();
        assert!(!cursor.on_interval(500));
        assert!(!cursor.on_interval(0));
    }
}
