//! Defines the `Dialect` trait for database-specific SQL syntax.

use crate::{
    ast::{ColumnType, DefaultValue},
    error::SchemaError,
};

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - PostgreSQL uses double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    fn render_column_type(&self, column_type: &ColumnType) -> String;

    fn render_default(&self, value: &DefaultValue) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn render_column_type(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::VarChar(Some(len)) => format!("VARCHAR({len})"),
            ColumnType::VarChar(None) => "VARCHAR".into(),
            ColumnType::Timestamp => "TIMESTAMP WITH TIME ZONE".into(),
        }
    }

    fn render_default(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::CurrentTimestamp => "CURRENT_TIMESTAMP".into(),
        }
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl MySql {
    /// MySQL requires a length on VARCHAR columns.
    const DEFAULT_VARCHAR_LEN: usize = 255;
}

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn render_column_type(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::VarChar(len) => {
                format!("VARCHAR({})", len.unwrap_or(Self::DEFAULT_VARCHAR_LEN))
            }
            ColumnType::Timestamp => "TIMESTAMP(6)".into(),
        }
    }

    fn render_default(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::CurrentTimestamp => "CURRENT_TIMESTAMP(6)".into(),
        }
    }

    fn name(&self) -> String {
        "MySQL".into()
    }
}

/// Looks up a dialect by name (`postgres`, `pg`, `postgresql`, `mysql`).
pub fn dialect_from_name(name: &str) -> Result<Box<dyn Dialect>, SchemaError> {
    match name.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" | "pg" => Ok(Box::new(Postgres)),
        "mysql" => Ok(Box::new(MySql)),
        other => Err(SchemaError::UnsupportedDialect(other.to_string())),
    }
}
