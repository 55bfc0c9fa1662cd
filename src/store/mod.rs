//! Execution layer over SQLite.
//!
//! [`Store`] wraps a [`rusqlite::Connection`] and executes the rendered
//! SQL from [`crate::sql`]. [`Table`] adds the ensure/autoload/upsert
//! capability shared by the fact table and the reference tables.

mod table;

pub use table::Table;

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::sql::dialect::Dialect;
use crate::sql::expr::{self, Expr};

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("no row matched the upsert key after update on {0}")]
    UpsertConflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A scalar value moving between raw rows, SQL literals and result sets.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Convert to a SQL literal expression.
    pub fn to_expr(&self) -> Expr {
        match self {
            Value::Null => expr::lit_null(),
            Value::Integer(n) => expr::lit_int(*n),
            Value::Float(f) => expr::lit_float(*f),
            Value::Text(s) => expr::lit_str(s.clone()),
        }
    }

    /// Convert to a JSON value for result reshaping.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Integer(n) => serde_json::Value::from(n),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s),
        }
    }

    /// Numeric view, used by summary accumulation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn from_ref(value: rusqlite::types::ValueRef<'_>) -> Value {
        use rusqlite::types::ValueRef;
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::Integer(n),
            ValueRef::Real(f) => Value::Float(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Connection wrapper executing rendered SQL statements.
pub struct Store {
    conn: Connection,
    dialect: Dialect,
}

impl Store {
    /// Open or create a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            dialect: Dialect::Sqlite,
        })
    }

    /// Open an in-memory database (used by tests and scratch loads).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            dialect: Dialect::Sqlite,
        })
    }

    /// The dialect statements should be rendered with.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Whether a table of this name exists.
    pub fn has_table(&self, name: &str) -> StoreResult<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
                rusqlite::params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Autoload the current column names of a table.
    pub fn table_columns(&self, name: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?)")?;
        let columns = stmt
            .query_map(rusqlite::params![name], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(columns)
    }

    /// Execute a statement, returning the number of affected rows.
    pub fn execute(&self, sql: &str) -> StoreResult<usize> {
        Ok(self.conn.execute(sql, [])?)
    }

    /// The rowid generated by the most recent INSERT.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Run a single-column id query, returning the first row if any.
    pub fn query_one_id(&self, sql: &str) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(sql, [], |row| row.get(0))
            .optional()?;
        Ok(id)
    }

    /// Run a query and collect labeled rows.
    pub fn query_rows(&self, sql: &str) -> StoreResult<(Vec<String>, Vec<Vec<Value>>)> {
        let mut collected = Vec::new();
        let mut names = Vec::new();
        self.for_each_row::<StoreError, _>(sql, |columns, row| {
            if names.is_empty() {
                names = columns.to_vec();
            }
            collected.push(row);
            Ok(())
        })?;
        Ok((names, collected))
    }

    /// Stream a query's rows through a callback, one forward pass.
    ///
    /// The callback receives the result column labels and the row's
    /// values; its error type only needs a conversion from [`StoreError`]
    /// so callers can fail with their own error enums.
    pub fn for_each_row<E, F>(&self, sql: &str, mut f: F) -> Result<(), E>
    where
        E: From<StoreError>,
        F: FnMut(&[String], Vec<Value>) -> Result<(), E>,
    {
        let mut stmt = self.conn.prepare(sql).map_err(StoreError::from)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let mut rows = stmt.query([]).map_err(StoreError::from)?;
        while let Some(row) = rows.next().map_err(StoreError::from)? {
            let mut values = Vec::with_capacity(names.len());
            for i in 0..names.len() {
                values.push(Value::from_ref(row.get_ref(i).map_err(StoreError::from)?));
            }
            f(&names, values)?;
        }
        Ok(())
    }
}
