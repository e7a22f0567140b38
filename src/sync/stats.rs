use serde::{Deserialize, Serialize};

/// Counters for one sync run
///
/// Every scanned item bumps `total` and exactly one of the other four.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Items scanned
    pub total: usize,

    /// Files written
    pub downloaded: usize,

    /// Already present in the destination
    pub skipped: usize,

    /// Below the minimum transcript length
    pub filtered: usize,

    /// Export or write failed
    pub errors: usize,
}

impl RunStats {
    /// Whether every scanned item landed in exactly one bucket
    pub fn is_balanced(&self) -> bool {
        self.total == self.downloaded + self.skipped + self.filtered + self.errors
    }
}
