//! The dimensional modeling engine.
//!
//! A declarative mapping description ([`mapping`]) routes each field of
//! a dataset to a metric, a value dimension or a complex dimension
//! ([`field`]). A [`dataset::Dataset`] is the pure, unbound model;
//! generating it against a [`crate::store::Store`] yields a
//! [`dataset::Cube`] bound to physical tables, which loads rows and
//! answers materialize/aggregate queries ([`aggregate`]).

pub mod aggregate;
pub mod attribute;
pub mod dataset;
pub mod field;
pub mod mapping;

pub use aggregate::{AggregateRequest, AggregateResult};
pub use attribute::{Attribute, AttributeSpec};
pub use dataset::{Cube, Dataset};
pub use field::{Field, FieldDef};
pub use mapping::{DatasetInfo, FieldSpec, ModelSpec};

use std::collections::BTreeMap;

use crate::store::StoreError;

/// A raw input row: source column name to textual value.
pub type RawRow = BTreeMap<String, String>;

/// Errors from the modeling layer.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown attribute: {0}.{1}")]
    UnknownAttribute(String, String),

    #[error("duplicate field: {0}")]
    DuplicateField(String),

    #[error("dataset name missing from mapping")]
    MissingName,

    #[error("invalid mapping: {0}")]
    Mapping(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ModelResult<T> = Result<T, ModelError>;
