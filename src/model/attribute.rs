//! Attributes: the scalar building blocks of dimensions and metrics.
//!
//! An [`AttributeSpec`] comes straight from the mapping description and
//! carries no physical binding. [`AttributeSpec::generate`] binds it to
//! a column on a table, producing an [`Attribute`] that can resolve raw
//! row values.

use super::mapping::{parse_datatype, AttributeEntry, FieldSpec};
use super::{ModelResult, RawRow};
use crate::sql::ddl::DataType;
use crate::store::{Store, Table, Value};

/// An unbound attribute: name, source mapping and declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    pub name: String,
    pub source_column: Option<String>,
    pub default: Option<String>,
    pub datatype: DataType,
}

impl AttributeSpec {
    /// Attribute of a complex dimension's reference table.
    pub fn from_entry(entry: &AttributeEntry) -> Self {
        Self {
            name: entry.name.clone(),
            source_column: entry.column.clone(),
            // A constant doubles as the default for missing columns.
            default: entry.default.clone().or_else(|| entry.constant.clone()),
            datatype: parse_datatype(entry.datatype.as_deref()),
        }
    }

    /// Attribute living directly on the fact table (value dimension or
    /// metric).
    pub fn from_field(name: &str, spec: &FieldSpec) -> Self {
        Self {
            name: name.to_string(),
            source_column: spec.column.clone(),
            default: spec.default.clone().or_else(|| spec.constant.clone()),
            datatype: parse_datatype(spec.datatype.as_deref()),
        }
    }

    /// Bind to a physical column, creating it if absent. Idempotent: a
    /// column of the same name is reused.
    pub fn generate(&self, store: &Store, table: &mut Table) -> ModelResult<Attribute> {
        table.ensure_column(store, &self.name, self.datatype)?;
        Ok(Attribute {
            name: self.name.clone(),
            source_column: self.source_column.clone(),
            default: self.default.clone(),
            datatype: self.datatype,
        })
    }
}

/// An attribute bound to a physical column of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub source_column: Option<String>,
    pub default: Option<String>,
    pub datatype: DataType,
}

impl Attribute {
    /// Resolve this attribute's value from a raw input row.
    ///
    /// With a source column set, the row value is used and the default
    /// covers a missing key; without one the default/constant applies.
    /// Empty values become null. Float columns parse their text; values
    /// that do not parse are kept verbatim, leaning on the store's
    /// flexible typing.
    pub fn load(&self, row: &RawRow) -> Value {
        let raw = match &self.source_column {
            Some(column) => row.get(column).map(String::as_str).or(self.default.as_deref()),
            None => self.default.as_deref(),
        };
        match raw {
            None => Value::Null,
            Some("") => Value::Null,
            Some(text) => match self.datatype {
                DataType::Float => text
                    .parse::<f64>()
                    .map(Value::Float)
                    .unwrap_or_else(|_| Value::Text(text.to_string())),
                DataType::Integer => text
                    .parse::<i64>()
                    .map(Value::Integer)
                    .unwrap_or_else(|_| Value::Text(text.to_string())),
                DataType::Text => Value::Text(text.to_string()),
            },
        }
    }
}
