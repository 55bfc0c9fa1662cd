//! PostgreSQL SQL dialect.
//!
//! PostgreSQL specifics:
//! - ANSI identifier quoting (`"`)
//! - Native boolean type (true/false)
//! - Identity columns for surrogate keys

use super::helpers;
use super::SqlDialect;
use crate::sql::ddl::DataType;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    // Uses default emit_limit_offset (LIMIT ... OFFSET ...)

    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_postgres(dt)
    }

    fn emit_identity(&self) -> &'static str {
        "BIGINT GENERATED ALWAYS AS IDENTITY"
    }
}
