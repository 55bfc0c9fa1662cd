//! Table handles: ensure/autoload, column creation, upsert by natural key.

use std::collections::BTreeMap;

use super::{Store, StoreError, StoreResult, Value};
use crate::sql::ddl::{AlterTable, ColumnDef, CreateTable, DataType, DropTable};
use crate::sql::dialect::SqlDialect;
use crate::sql::dml::{Delete, Insert, Update};
use crate::sql::expr::{col, Expr, ExprExt};
use crate::sql::query::{Query, TableRef};

/// A candidate row: column name to scalar value.
pub type Row = BTreeMap<String, Value>;

/// Handle to a physical table, bound to its current column set.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
}

impl Table {
    /// Create the table with a surrogate `id` primary key if it does not
    /// exist, then bind to its current column set. Safe to call on every
    /// generate.
    pub fn ensure(store: &Store, name: &str) -> StoreResult<Table> {
        if !store.has_table(name)? {
            let stmt = CreateTable::new(name)
                .if_not_exists()
                .column(ColumnDef::new("id", DataType::Integer).identity().primary_key());
            store.execute(&render(stmt.to_tokens_for_dialect(store.dialect()), store))?;
        }
        let columns = store.table_columns(name)?;
        Ok(Table {
            name: name.to_string(),
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names as of the last ensure/ensure_column.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Add a column if absent; a pre-existing column of the same name is
    /// reused without type validation.
    pub fn ensure_column(
        &mut self,
        store: &Store,
        name: &str,
        data_type: DataType,
    ) -> StoreResult<()> {
        if self.has_column(name) {
            return Ok(());
        }
        let stmt = AlterTable::add_column(&self.name, ColumnDef::new(name, data_type));
        store.execute(&render(stmt.to_tokens_for_dialect(store.dialect()), store))?;
        self.columns.push(name.to_string());
        Ok(())
    }

    /// Update-or-insert keyed by the conjunction of `unique_columns`.
    ///
    /// A key column missing from the row compares as `= NULL`, which
    /// matches nothing, so rows without their natural key always insert.
    /// Returns the surrogate id of the written row. Not race-free under
    /// concurrent writers.
    pub fn upsert(&self, store: &Store, row: &Row, unique_columns: &[&str]) -> StoreResult<i64> {
        let key = self.key_predicate(row, unique_columns);

        let mut update = Update::table(&self.name);
        for (column, value) in row {
            update = update.set(column, value.to_expr());
        }
        let update = update.filter(key.clone());
        let changed = store.execute(&render(update.to_tokens_for_dialect(store.dialect()), store))?;

        if changed == 0 {
            let mut insert = Insert::into(&self.name);
            for (column, value) in row {
                insert = insert.value(column, value.to_expr());
            }
            store.execute(&render(insert.to_tokens_for_dialect(store.dialect()), store))?;
            return Ok(store.last_insert_rowid());
        }

        let select = Query::new()
            .select([col("id")])
            .from(TableRef::new(&self.name))
            .filter(key);
        store
            .query_one_id(&render(select.to_tokens_for_dialect(store.dialect()), store))?
            .ok_or_else(|| StoreError::UpsertConflict(self.name.clone()))
    }

    /// Delete all rows, leaving the schema intact.
    pub fn flush(&self, store: &Store) -> StoreResult<()> {
        let stmt = Delete::from(&self.name);
        store.execute(&render(stmt.to_tokens_for_dialect(store.dialect()), store))?;
        Ok(())
    }

    /// Drop the table. Tolerates a table already dropped through another
    /// handle, since reference tables can be shared.
    pub fn drop(self, store: &Store) -> StoreResult<()> {
        let stmt = DropTable::new(&self.name).if_exists();
        store.execute(&render(stmt.to_tokens_for_dialect(store.dialect()), store))?;
        Ok(())
    }

    fn key_predicate(&self, row: &Row, unique_columns: &[&str]) -> Expr {
        unique_columns
            .iter()
            .map(|column| {
                let value = row.get(*column).cloned().unwrap_or(Value::Null);
                col(*column).eq(value.to_expr())
            })
            .reduce(|acc, predicate| acc.and(predicate))
            // An empty key matches every row, like an unfiltered update.
            .unwrap_or_else(|| crate::sql::expr::lit_bool(true))
    }
}

fn render(ts: crate::sql::token::TokenStream, store: &Store) -> String {
    ts.serialize(store.dialect())
}
