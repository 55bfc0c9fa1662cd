//! SQLite SQL dialect.
//!
//! SQLite specifics:
//! - ANSI identifier quoting (`"`)
//! - No native boolean type (1/0)
//! - `INTEGER PRIMARY KEY` is an alias for the rowid, giving
//!   auto-incrementing surrogate keys without extra syntax

use super::helpers;
use super::SqlDialect;
use crate::sql::ddl::DataType;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    // Uses default emit_limit_offset (LIMIT ... OFFSET ...)

    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_sqlite(dt)
    }

    fn emit_identity(&self) -> &'static str {
        // Combined with PRIMARY KEY this aliases the rowid.
        "INTEGER"
    }
}
