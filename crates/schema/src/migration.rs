use crate::{
    ast::{CreateTable, DropTable},
    dialect::Dialect,
    entities,
    renderer::render_sql,
};

/// A reversible schema change that creates one table.
#[derive(Debug, Clone)]
pub struct Migration {
    pub name: &'static str,
    pub create: CreateTable,
}

impl Migration {
    pub fn up_sql(&self, dialect: &dyn Dialect) -> String {
        render_sql(&self.create, dialect)
    }

    pub fn down_sql(&self, dialect: &dyn Dialect) -> String {
        let drop = DropTable {
            table: self.create.table.clone(),
            if_exists: true,
        };
        render_sql(&drop, dialect)
    }
}

/// All migrations, in the order they must be applied.
pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        name: "add_table_webhooks",
        create: entities::table_webhook(),
    }]
}
