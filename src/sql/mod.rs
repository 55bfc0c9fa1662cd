//! Dialect-agnostic SQL generation.
//!
//! Statements are built as trees of expressions and rendered through a
//! [`token::TokenStream`], where every identifier, literal and keyword
//! serializes according to a [`dialect::Dialect`]. The default dialect
//! is SQLite, matching the bundled execution engine in [`crate::store`].

pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod expr;
pub mod query;
pub mod token;

pub use ddl::{AlterTable, ColumnDef, CreateTable, DataType, DropTable};
pub use dialect::{Dialect, SqlDialect};
pub use dml::{Delete, Insert, Update};
pub use expr::{Expr, ExprExt};
pub use query::{Join, JoinType, OrderByExpr, Query, SortDir, TableRef};
pub use token::{Token, TokenStream};
