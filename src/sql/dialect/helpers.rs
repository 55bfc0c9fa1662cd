//! Shared helper functions for SQL dialect implementations.

use super::super::token::{Token, TokenStream};
use crate::sql::ddl::DataType;

// =============================================================================
// Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: SQLite, Postgres
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote string with single quotes (standard SQL).
/// Used by: all dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Postgres
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: SQLite (no native boolean type)
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit LIMIT ... OFFSET ... (standard SQL).
pub fn emit_limit_offset_standard(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.push(Token::Limit)
            .space()
            .push(Token::LitInt(lim as i64));
    }

    if let Some(off) = offset {
        if limit.is_some() {
            ts.space();
        }
        ts.push(Token::Offset)
            .space()
            .push(Token::LitInt(off as i64));
    }

    ts
}

// =============================================================================
// Data type emission
// =============================================================================

/// Emit data type for SQLite storage classes.
pub fn emit_data_type_sqlite(dt: &DataType) -> String {
    match dt {
        DataType::Text => "TEXT".into(),
        DataType::Integer => "INTEGER".into(),
        DataType::Float => "REAL".into(),
    }
}

/// Emit data type for Postgres.
pub fn emit_data_type_postgres(dt: &DataType) -> String {
    match dt {
        DataType::Text => "TEXT".into(),
        DataType::Integer => "BIGINT".into(),
        DataType::Float => "DOUBLE PRECISION".into(),
    }
}
