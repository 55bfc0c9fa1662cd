//! Dataset fields: the closed set of variants a mapping entry routes to.
//!
//! Every field shares the same capability set - generate, load, join,
//! selectables, flush, drop - but only complex dimensions own storage of
//! their own. [`FieldDef`] is the unbound form; [`FieldDef::generate`]
//! binds it into a [`Field`].

use std::collections::BTreeMap;

use super::attribute::{Attribute, AttributeSpec};
use super::dataset::FACT_ALIAS;
use super::mapping::{FieldKind, FieldSpec};
use super::{ModelError, ModelResult, RawRow};
use crate::sql::ddl::DataType;
use crate::sql::expr::{table_col, Expr, ExprExt};
use crate::sql::query::{Query, TableRef};
use crate::store::{Store, Table, Value};

/// An unbound field definition, routed from the mapping description.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDef {
    /// Inline dimension on the fact table.
    Value(AttributeSpec),
    /// Numeric attribute that is summed, never joined.
    Metric(AttributeSpec),
    /// Dimension owning a shared reference table.
    Complex(ComplexDef),
}

/// Unbound complex dimension: scheme plus attribute list.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexDef {
    pub name: String,
    pub scheme: String,
    pub attributes: Vec<AttributeSpec>,
}

impl FieldDef {
    /// Route a mapping entry into a field definition.
    pub fn from_spec(name: &str, spec: &FieldSpec) -> FieldDef {
        match spec.route(name) {
            FieldKind::Metric => FieldDef::Metric(AttributeSpec::from_field(name, spec)),
            FieldKind::Value => FieldDef::Value(AttributeSpec::from_field(name, spec)),
            FieldKind::Complex => FieldDef::Complex(ComplexDef {
                name: name.to_string(),
                scheme: spec.scheme().to_string(),
                attributes: spec
                    .attribute_entries()
                    .iter()
                    .map(AttributeSpec::from_entry)
                    .collect(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldDef::Value(spec) | FieldDef::Metric(spec) => &spec.name,
            FieldDef::Complex(def) => &def.name,
        }
    }

    /// Bind this field to physical storage. Inline fields add a column
    /// to the fact table; complex dimensions additionally ensure their
    /// reference table and foreign key column.
    pub fn generate(
        &self,
        store: &Store,
        dataset_name: &str,
        fact: &mut Table,
    ) -> ModelResult<Field> {
        match self {
            FieldDef::Value(spec) => Ok(Field::Value(spec.generate(store, fact)?)),
            FieldDef::Metric(spec) => Ok(Field::Metric(spec.generate(store, fact)?)),
            FieldDef::Complex(def) => {
                // Dimensions with an equal scheme share one table.
                let table_name = format!("{}_{}", dataset_name, def.scheme);
                let mut table = Table::ensure(store, &table_name)?;
                let attributes = def
                    .attributes
                    .iter()
                    .map(|attr| attr.generate(store, &mut table))
                    .collect::<ModelResult<Vec<_>>>()?;
                let fk_column = format!("{}_id", def.name);
                fact.ensure_column(store, &fk_column, DataType::Integer)?;
                Ok(Field::Complex(ComplexDimension {
                    name: def.name.clone(),
                    table,
                    attributes,
                    fk_column,
                }))
            }
        }
    }
}

/// A field bound to physical storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Value(Attribute),
    Metric(Attribute),
    Complex(ComplexDimension),
}

/// A bound complex dimension: reference table handle, bound attributes
/// and the fact table's foreign key column.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexDimension {
    pub name: String,
    pub table: Table,
    pub attributes: Vec<Attribute>,
    pub fk_column: String,
}

impl ComplexDimension {
    /// Join the reference table, aliased under the dimension's name, on
    /// its surrogate key.
    fn join(&self, query: Query) -> Query {
        query.inner_join(
            TableRef::aliased(self.table.name(), &self.name),
            table_col(&self.name, "id").eq(table_col(FACT_ALIAS, &self.fk_column)),
        )
    }

    /// Upsert the reference row for a raw input row, keyed by the
    /// `name` attribute, and return the fact table's foreign key cell.
    fn load(&self, store: &Store, row: &RawRow) -> ModelResult<(String, Value)> {
        let mut reference: BTreeMap<String, Value> = BTreeMap::new();
        for attr in &self.attributes {
            reference.insert(attr.name.clone(), attr.load(row));
        }
        let id = self.table.upsert(store, &reference, &["name"])?;
        Ok((self.fk_column.clone(), Value::Integer(id)))
    }
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::Value(attr) | Field::Metric(attr) => &attr.name,
            Field::Complex(dim) => &dim.name,
        }
    }

    /// Add this field's join to a query. Inline fields are the identity:
    /// their column already lives on the fact table.
    pub fn join(&self, query: Query) -> Query {
        match self {
            Field::Value(_) | Field::Metric(_) => query,
            Field::Complex(dim) => dim.join(query),
        }
    }

    /// Labeled select expressions for materialization. Labels follow the
    /// `{alias}_{column}` convention that result reshaping splits on.
    pub fn selectables(&self) -> Vec<Expr> {
        match self {
            Field::Value(attr) | Field::Metric(attr) => {
                vec![table_col(FACT_ALIAS, &attr.name)
                    .alias(format!("{}_{}", FACT_ALIAS, attr.name))]
            }
            Field::Complex(dim) => {
                let mut exprs =
                    vec![table_col(&dim.name, "id").alias(format!("{}_id", dim.name))];
                for attr in &dim.attributes {
                    exprs.push(
                        table_col(&dim.name, &attr.name)
                            .alias(format!("{}_{}", dim.name, attr.name)),
                    );
                }
                exprs
            }
        }
    }

    /// This field's contribution to a fact row. Complex dimensions
    /// upsert their reference row as a side effect, so loading is not
    /// read-only.
    pub fn load(&self, store: &Store, row: &RawRow) -> ModelResult<(String, Value)> {
        match self {
            Field::Value(attr) | Field::Metric(attr) => Ok((attr.name.clone(), attr.load(row))),
            Field::Complex(dim) => dim.load(store, row),
        }
    }

    /// Look up a sub-attribute. Inline fields have none.
    pub fn attribute(&self, name: &str) -> ModelResult<&Attribute> {
        match self {
            Field::Value(_) | Field::Metric(_) => Err(ModelError::UnknownAttribute(
                self.name().to_string(),
                name.to_string(),
            )),
            Field::Complex(dim) => dim
                .attributes
                .iter()
                .find(|attr| attr.name == name)
                .ok_or_else(|| {
                    ModelError::UnknownAttribute(dim.name.clone(), name.to_string())
                }),
        }
    }

    /// Resolve a queryable `(table_alias, column)` pair. With an
    /// attribute the complex dimension exposes that column; without one
    /// it exposes its surrogate id.
    pub fn key_column(&self, attribute: Option<&str>) -> ModelResult<(String, String)> {
        match self {
            Field::Value(attr) | Field::Metric(attr) => match attribute {
                Some(sub) => Err(ModelError::UnknownAttribute(
                    attr.name.clone(),
                    sub.to_string(),
                )),
                None => Ok((FACT_ALIAS.to_string(), attr.name.clone())),
            },
            Field::Complex(dim) => {
                let column = match attribute {
                    Some(sub) => self.attribute(sub)?.name.clone(),
                    None => "id".to_string(),
                };
                Ok((dim.name.clone(), column))
            }
        }
    }

    /// Clear this field's own storage, if any.
    pub fn flush(&self, store: &Store) -> ModelResult<()> {
        if let Field::Complex(dim) = self {
            dim.table.flush(store)?;
        }
        Ok(())
    }

    /// Drop this field's own storage, if any. Reference tables may be
    /// shared, so the drop tolerates a table that is already gone.
    pub fn drop(&self, store: &Store) -> ModelResult<()> {
        if let Field::Complex(dim) = self {
            dim.table.clone().drop(store)?;
        }
        Ok(())
    }
}
