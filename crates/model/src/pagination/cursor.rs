use std::num::ParseIntError;

/// Default memory key the row cursor is stored under.
pub const DEFAULT_MEM_KEY: &str = "row_number";

/// The row cursor as read back from the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredCursor {
    /// Nothing stored yet, or an empty string.
    Unset,

    /// Next unread row. Not range-checked: a stored `0` or `-4` parses fine
    /// and is rejected later, once the starting row is resolved.
    Row(i64),
}

impl StoredCursor {
    /// Parses a raw stored value. Surrounding whitespace is ignored; anything
    /// else that is not an integer is an error.
    pub fn parse(raw: Option<&str>) -> Result<Self, ParseIntError> {
        match raw {
            None => Ok(StoredCursor::Unset),
            Some(value) if value.is_empty() => Ok(StoredCursor::Unset),
            Some(value) => value.trim().parse::<i64>().map(StoredCursor::Row),
        }
    }

    /// Starting row for this invocation. `start_row` only applies when no
    /// cursor exists, and a zero override falls back to row 1.
    pub fn starting_row(&self, start_row: Option<u64>) -> i64 {
        match self {
            StoredCursor::Row(row) => *row,
            StoredCursor::Unset => start_row
                .filter(|row| *row > 0)
                .map(|row| i64::try_from(row).unwrap_or(i64::MAX))
                .unwrap_or(1),
        }
    }
}
