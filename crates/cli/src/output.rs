use crate::error::CliError;
use engine_core::state::models::StoredEntry;
use schema::{dialect::Dialect, migration::migrations};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn print_cursor(
    flow: &str,
    mem_key: &str,
    entry: Option<&StoredEntry>,
    as_json: bool,
) -> Result<(), CliError> {
    if as_json {
        return print_json(&entry);
    }

    println!("Cursor for flow '{flow}' / key '{mem_key}':");
    println!("-----------------------------");
    match entry {
        Some(entry) => {
            println!("{:<16} {}", "Value", entry.value);
            println!("{:<16} {}", "Version", entry.version);
            println!("{:<16} {}", "Updated at", entry.updated_at.to_rfc3339());
        }
        None => println!("{:<16} n/a", "Value"),
    }
    Ok(())
}

/// Migration SQL, one commented statement per migration. `down` lists the
/// reverting statements in reverse order.
pub fn schema_script(dialect: &dyn Dialect, down: bool) -> String {
    let mut plan = migrations();
    if down {
        plan.reverse();
    }

    let mut script = String::new();
    for migration in plan {
        let sql = if down {
            migration.down_sql(dialect)
        } else {
            migration.up_sql(dialect)
        };
        script.push_str(&format!("-- {}\n{sql}\n", migration.name));
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::dialect::{MySql, Postgres};

    #[test]
    fn down_script_is_exact() {
        assert_eq!(
            schema_script(&MySql, true),
            "-- add_table_webhooks\nDROP TABLE IF EXISTS `table_webhook`;\n"
        );
        assert_eq!(
            schema_script(&Postgres, true),
            "-- add_table_webhooks\nDROP TABLE IF EXISTS \"table_webhook\";\n"
        );
    }

    #[test]
    fn every_statement_ends_with_a_single_semicolon() {
        for down in [false, true] {
            let script = schema_script(&MySql, down);
            assert!(!script.contains(";;"));
            for line in script.lines().filter(|line| !line.starts_with("--")) {
                assert!(line.ends_with(");") || line.ends_with("`;"), "{line}");
            }
        }

        let up = schema_script(&Postgres, false);
        let mut lines = up.lines();
        assert_eq!(lines.next(), Some("-- add_table_webhooks"));
        let create = lines.next().unwrap();
        assert!(create.starts_with(r#"CREATE TABLE IF NOT EXISTS "table_webhook" ("#));
        assert!(create.ends_with("));"));
        assert_eq!(lines.next(), None);
    }
}
