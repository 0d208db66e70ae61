//! Defines the core rendering trait and context for converting AST to SQL.

use crate::{
    ast::{ColumnDef, CreateTable, DropTable, TableConstraint},
    dialect::Dialect,
};

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// Accumulates the SQL string and gives access to the dialect for
/// syntax-specific details.
pub struct Renderer<'a> {
    pub sql: String,
    pub dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            dialect,
        }
    }

    /// Consumes the renderer and returns the final SQL string.
    pub fn finish(self) -> String {
        self.sql
    }

    fn push_ident(&mut self, ident: &str) {
        let quoted = self.dialect.quote_identifier(ident);
        self.sql.push_str(&quoted);
    }

    fn push_ident_list(&mut self, idents: &[String]) {
        let quoted: Vec<String> = idents
            .iter()
            .map(|ident| self.dialect.quote_identifier(ident))
            .collect();
        self.sql.push('(');
        self.sql.push_str(&quoted.join(", "));
        self.sql.push(')');
    }
}

/// Renders a single node with the given dialect.
pub fn render_sql(node: &dyn Render, dialect: &dyn Dialect) -> String {
    let mut renderer = Renderer::new(dialect);
    node.render(&mut renderer);
    renderer.finish()
}

impl Render for ColumnDef {
    fn render(&self, r: &mut Renderer) {
        r.push_ident(&self.name);
        r.sql.push(' ');
        let column_type = r.dialect.render_column_type(&self.column_type);
        r.sql.push_str(&column_type);
        if !self.is_nullable {
            r.sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default_value {
            let default = r.dialect.render_default(default);
            r.sql.push_str(" DEFAULT ");
            r.sql.push_str(&default);
        }
    }
}

impl Render for TableConstraint {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("CONSTRAINT ");
        match self {
            TableConstraint::PrimaryKey { name, columns } => {
                r.push_ident(name);
                r.sql.push_str(" PRIMARY KEY ");
                r.push_ident_list(columns);
            }
            TableConstraint::ForeignKey {
                name,
                columns,
                references,
                referenced_columns,
                on_delete,
            } => {
                r.push_ident(name);
                r.sql.push_str(" FOREIGN KEY ");
                r.push_ident_list(columns);
                r.sql.push_str(" REFERENCES ");
                r.push_ident(references);
                r.sql.push(' ');
                r.push_ident_list(referenced_columns);
                r.sql.push_str(" ON DELETE ");
                r.sql.push_str(on_delete.as_sql());
            }
            TableConstraint::OneOf {
                name,
                column,
                values,
            } => {
                r.push_ident(name);
                r.sql.push_str(" CHECK (");
                r.push_ident(column);
                r.sql.push_str(" IN (");
                let quoted_values: Vec<String> = values
                    .iter()
                    .map(|v| format!("'{}'", v.replace('\'', "''")))
                    .collect();
                r.sql.push_str(&quoted_values.join(", "));
                r.sql.push_str("))");
            }
        }
    }
}

impl Render for CreateTable {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("CREATE TABLE ");
        if self.if_not_exists {
            r.sql.push_str("IF NOT EXISTS ");
        }
        r.push_ident(&self.table);
        r.sql.push_str(" (");

        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                r.sql.push_str(", ");
            }
            column.render(r);
        }
        for constraint in &self.constraints {
            r.sql.push_str(", ");
            constraint.render(r);
        }

        r.sql.push_str(");");
    }
}

impl Render for DropTable {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("DROP TABLE ");
        if self.if_exists {
            r.sql.push_str("IF EXISTS ");
        }
        r.push_ident(&self.table);
        r.sql.push(';');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{ColumnType, DefaultValue, ReferentialAction},
        dialect::{MySql, Postgres},
    };

    fn orders_table() -> CreateTable {
        CreateTable {
            table: "order".to_string(),
            columns: vec![
                ColumnDef::new("id", ColumnType::VarChar(Some(21))),
                ColumnDef::new("created", ColumnType::Timestamp)
                    .default_value(DefaultValue::CurrentTimestamp),
                ColumnDef::new("note", ColumnType::VarChar(None)).nullable(true),
            ],
            constraints: vec![
                TableConstraint::PrimaryKey {
                    name: "pk_order".to_string(),
                    columns: vec!["id".to_string()],
                },
                TableConstraint::ForeignKey {
                    name: "fk_order_user".to_string(),
                    columns: vec!["userId".to_string()],
                    references: "user".to_string(),
                    referenced_columns: vec!["id".to_string()],
                    on_delete: ReferentialAction::SetNull,
                },
            ],
            if_not_exists: false,
        }
    }

    #[test]
    fn test_render_create_table_postgres() {
        let sql = render_sql(&orders_table(), &Postgres);
        let expected = r#"CREATE TABLE "order" ("id" VARCHAR(21) NOT NULL, "created" TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP, "note" VARCHAR, CONSTRAINT "pk_order" PRIMARY KEY ("id"), CONSTRAINT "fk_order_user" FOREIGN KEY ("userId") REFERENCES "user" ("id") ON DELETE SET NULL);"#;
        assert_eq!(sql, expected);
    }

    #[test]
    fn test_render_create_table_mysql() {
        let sql = render_sql(&orders_table(), &MySql);
        let expected = "CREATE TABLE `order` (`id` VARCHAR(21) NOT NULL, `created` TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6), `note` VARCHAR(255), CONSTRAINT `pk_order` PRIMARY KEY (`id`), CONSTRAINT `fk_order_user` FOREIGN KEY (`userId`) REFERENCES `user` (`id`) ON DELETE SET NULL);";
        assert_eq!(sql, expected);
    }

    #[test]
    fn test_render_check_constraint_escapes_values() {
        let constraint = TableConstraint::OneOf {
            name: "chk_kind".to_string(),
            column: "kind".to_string(),
            values: vec!["A".to_string(), "it's".to_string()],
        };
        let sql = render_sql(&constraint, &Postgres);
        assert_eq!(sql, r#"CONSTRAINT "chk_kind" CHECK ("kind" IN ('A', 'it''s'))"#);
    }

    #[test]
    fn test_render_drop_table() {
        let drop = DropTable {
            table: "table_webhook".to_string(),
            if_exists: true,
        };
        assert_eq!(
            render_sql(&drop, &Postgres),
            r#"DROP TABLE IF EXISTS "table_webhook";"#
        );
    }
}
