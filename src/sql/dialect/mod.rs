//! SQL dialects.
//!
//! A [`SqlDialect`] decides how identifiers, string literals, booleans,
//! data types and pagination clauses are rendered. The [`Dialect`] enum
//! is what the rest of the crate passes around; it delegates to the
//! concrete implementations.

mod helpers;
mod postgres;
mod sqlite;

pub use postgres::Postgres;
pub use sqlite::Sqlite;

use super::ddl::DataType;
use super::token::TokenStream;

/// Behavior that varies between SQL dialects.
pub trait SqlDialect {
    /// Short lowercase name of the dialect.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str;

    /// Emit the pagination clause.
    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_standard(limit, offset)
    }

    /// Emit a column data type.
    fn emit_data_type(&self, dt: &DataType) -> String;

    /// Emit the type of an auto-incrementing surrogate key column,
    /// without the PRIMARY KEY constraint itself.
    fn emit_identity(&self) -> &'static str;
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// SQLite - the default, matching the bundled execution engine.
    #[default]
    Sqlite,
    Postgres,
}

impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        match self {
            Dialect::Sqlite => Sqlite.name(),
            Dialect::Postgres => Postgres.name(),
        }
    }

    fn quote_identifier(&self, ident: &str) -> String {
        match self {
            Dialect::Sqlite => Sqlite.quote_identifier(ident),
            Dialect::Postgres => Postgres.quote_identifier(ident),
        }
    }

    fn quote_string(&self, s: &str) -> String {
        match self {
            Dialect::Sqlite => Sqlite.quote_string(s),
            Dialect::Postgres => Postgres.quote_string(s),
        }
    }

    fn format_bool(&self, b: bool) -> &'static str {
        match self {
            Dialect::Sqlite => Sqlite.format_bool(b),
            Dialect::Postgres => Postgres.format_bool(b),
        }
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        match self {
            Dialect::Sqlite => Sqlite.emit_limit_offset(limit, offset),
            Dialect::Postgres => Postgres.emit_limit_offset(limit, offset),
        }
    }

    fn emit_data_type(&self, dt: &DataType) -> String {
        match self {
            Dialect::Sqlite => Sqlite.emit_data_type(dt),
            Dialect::Postgres => Postgres.emit_data_type(dt),
        }
    }

    fn emit_identity(&self) -> &'static str {
        match self {
            Dialect::Sqlite => Sqlite.emit_identity(),
            Dialect::Postgres => Postgres.emit_identity(),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dialect() {
        assert_eq!(Dialect::default(), Dialect::Sqlite);
    }

    #[test]
    fn test_dialect_names() {
        assert_eq!(Dialect::Sqlite.to_string(), "sqlite");
        assert_eq!(Dialect::Postgres.to_string(), "postgres");
    }

    #[test]
    fn test_bool_formatting() {
        assert_eq!(Dialect::Sqlite.format_bool(true), "1");
        assert_eq!(Dialect::Postgres.format_bool(true), "true");
    }

    #[test]
    fn test_data_types() {
        assert_eq!(Dialect::Sqlite.emit_data_type(&DataType::Float), "REAL");
        assert_eq!(
            Dialect::Postgres.emit_data_type(&DataType::Float),
            "DOUBLE PRECISION"
        );
    }
}
