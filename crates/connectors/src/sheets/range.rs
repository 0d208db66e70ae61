//! A1-notation helpers.

/// Last column requested by windowed reads.
pub const LAST_COLUMN: &str = "ZZZ";

/// Quotes a sheet name for use in an A1 range. Embedded single quotes are
/// doubled.
pub fn quote_sheet_name(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

/// Range covering whole rows `[start, end]` of a sheet.
pub fn row_range(sheet_name: &str, start: u64, end: u64) -> String {
    format!(
        "{}!A{start}:{LAST_COLUMN}{end}",
        quote_sheet_name(sheet_name)
    )
}

/// Range covering the whole sheet.
pub fn sheet_range(sheet_name: &str) -> String {
    quote_sheet_name(sheet_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_row_ranges() {
        assert_eq!(row_range("Sheet1", 4, 6), "'Sheet1'!A4:ZZZ6");
        assert_eq!(row_range("Q1 Orders", 1, 1), "'Q1 Orders'!A1:ZZZ1");
    }

    #[test]
    fn escapes_quotes_in_sheet_names() {
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
        assert_eq!(sheet_range("Bob's"), "'Bob''s'");
    }
}
