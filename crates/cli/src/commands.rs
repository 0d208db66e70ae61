use clap::{Args, Subcommand, ValueEnum};
use engine_processing::{paginator::CursorGuard, props::GetRowsProps};
use model::pagination::cursor::DEFAULT_MEM_KEY;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Return the next group of rows and advance the stored cursor
    NextRows(RowArgs),

    /// Return the group the next run would deliver, without touching the cursor
    Preview(RowArgs),

    /// Show the stored cursor of a flow
    Cursor {
        #[arg(long, default_value = DEFAULT_MEM_KEY, help = "Memory key holding the cursor")]
        mem_key: String,

        #[arg(long, help = "Flow id (defaults to SHEETCURSOR_FLOW_ID)")]
        flow: Option<String>,

        #[arg(long, help = "Print the stored entry as JSON")]
        json: bool,
    },

    /// Print the DDL of the webhook tables
    Schema {
        #[arg(long, default_value = "postgres", help = "SQL dialect: postgres or mysql")]
        dialect: String,

        #[arg(long, help = "Print the statements reverting the migrations instead")]
        down: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Google Sheets REST API
    #[default]
    Sheets,
    /// Directory of CSV files, one subdirectory per spreadsheet
    Csv,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum GuardKind {
    #[default]
    None,
    Versioned,
}

impl From<GuardKind> for CursorGuard {
    fn from(kind: GuardKind) -> Self {
        match kind {
            GuardKind::None => CursorGuard::None,
            GuardKind::Versioned => CursorGuard::Versioned,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RowArgs {
    #[arg(long, help = "Spreadsheet id")]
    pub spreadsheet_id: String,

    #[arg(long, help = "Numeric id of the sheet (tab)")]
    pub sheet_id: u64,

    #[arg(long, default_value_t = 1, allow_negative_numbers = true, help = "Row to start from when no cursor is stored")]
    pub start_row: i64,

    #[arg(long, default_value = DEFAULT_MEM_KEY, help = "Memory key holding the cursor")]
    pub mem_key: String,

    #[arg(long, default_value_t = 1, allow_negative_numbers = true, help = "Number of rows per run")]
    pub group_size: i64,

    #[arg(long, help = "Flow id (defaults to SHEETCURSOR_FLOW_ID)")]
    pub flow: Option<String>,

    #[arg(long, value_enum, default_value_t = SourceKind::Sheets)]
    pub source: SourceKind,

    #[arg(long, help = "Root directory of the CSV source", required_if_eq("source", "csv"))]
    pub csv_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = GuardKind::None, help = "Cursor write strategy")]
    pub guard: GuardKind,
}

impl RowArgs {
    pub fn props(&self) -> GetRowsProps {
        let mut props = GetRowsProps::new(self.spreadsheet_id.clone(), self.sheet_id);
        props.start_row = self.start_row;
        props.mem_key = self.mem_key.clone();
        props.group_size = self.group_size;
        props
    }
}
