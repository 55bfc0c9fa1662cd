//! cubist - star-schema spending cubes over a relational store.
//!
//! A declarative mapping description is turned into a physical star
//! schema (one fact table plus shared reference tables), raw tabular
//! rows are loaded into it with upsert/dedup semantics, and OLAP-style
//! aggregation requests (drilldowns, cuts, ordering, paging) are
//! compiled into a single grouped join query whose results are reshaped
//! into a nested summary/drilldown structure.
//!
//! # Layers
//!
//! - [`sql`] - dialect-agnostic SQL generation (token streams,
//!   expressions, query/DDL/DML builders)
//! - [`store`] - execution against SQLite, table handles with
//!   ensure/autoload/upsert semantics
//! - [`model`] - the dimensional modeling engine: mapping description,
//!   attributes, fields, datasets and cubes
//! - [`config`] - TOML settings with environment variable expansion

pub mod config;
pub mod model;
pub mod sql;
pub mod store;

// Re-export the SQL building blocks at the crate root.
pub use sql::ddl::{AlterTable, ColumnDef, CreateTable, DataType, DropTable};
pub use sql::dialect::{Dialect, SqlDialect};
pub use sql::dml::{Delete, Insert, Update};
pub use sql::expr::{Expr, ExprExt};
pub use sql::query::{Join, JoinType, OrderByExpr, Query, SortDir, TableRef};
pub use sql::token::{Token, TokenStream};

pub use store::{Store, StoreError, StoreResult, Table, Value};

pub use model::aggregate::{AggregateRequest, AggregateResult};
pub use model::dataset::{Cube, Dataset};
pub use model::{ModelError, ModelResult};

/// Convenience prelude for downstream users.
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::model::aggregate::{AggregateRequest, AggregateResult};
    pub use crate::model::dataset::{Cube, Dataset};
    pub use crate::model::{ModelError, ModelResult};
    pub use crate::sql::expr::{Expr, ExprExt};
    pub use crate::store::{Store, Table, Value};
}
