use serde::{Deserialize, Serialize};

/// Inclusive range of sheet rows fetched by one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    pub start: u64,
    pub end: u64,
}

impl FetchWindow {
    /// Window of `group_size` rows beginning at `start`. Both must be >= 1.
    pub fn new(start: u64, group_size: u64) -> Self {
        FetchWindow {
            start,
            end: start.saturating_add(group_size.saturating_sub(1)),
        }
    }

    /// Exclusive upper bound, i.e. the cursor value after this window.
    pub fn next_cursor(&self) -> u64 {
        self.end.saturating_add(1)
    }

    pub fn contains(&self, row: u64) -> bool {
        (self.start..=self.end).contains(&row)
    }
}
