//! Datasets and cubes.
//!
//! A [`Dataset`] is the pure in-memory model built from a mapping
//! description: routed field definitions plus descriptive metadata.
//! [`Dataset::generate`] binds it to physical storage and returns a
//! [`Cube`], which loads rows and answers queries. The split makes
//! "not yet generated" a type-level distinction.

use serde_json::Map as JsonMap;

use super::field::{Field, FieldDef};
use super::mapping::{DatasetInfo, ModelSpec};
use super::{ModelError, ModelResult, RawRow};
use crate::sql::expr::Expr;
use crate::sql::query::{OrderByExpr, Query, TableRef};
use crate::store::{Store, Table, Value};

/// Alias of the fact table in every generated query.
pub const FACT_ALIAS: &str = "entry";

/// A reshaped result row: fact columns at the top level, complex
/// dimensions nested under their names.
pub type Record = JsonMap<String, serde_json::Value>;

/// A dotted key path: `"time"` or `"to.label"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    pub dimension: String,
    pub attribute: Option<String>,
}

impl KeyPath {
    pub fn parse(path: &str) -> KeyPath {
        match path.split_once('.') {
            Some((dimension, attribute)) => KeyPath {
                dimension: dimension.to_string(),
                attribute: Some(attribute.to_string()),
            },
            None => KeyPath {
                dimension: path.to_string(),
                attribute: None,
            },
        }
    }
}

/// An unbound dataset: metadata plus routed field definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
    fields: Vec<FieldDef>,
}

impl Dataset {
    /// Build a dataset from routed field definitions, rejecting
    /// duplicate names.
    pub fn new(info: DatasetInfo, fields: Vec<FieldDef>) -> ModelResult<Dataset> {
        if info.name.is_empty() {
            return Err(ModelError::MissingName);
        }
        let mut seen = std::collections::BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.name().to_string()) {
                return Err(ModelError::DuplicateField(field.name().to_string()));
            }
        }
        Ok(Dataset {
            name: info.name,
            label: info.label,
            description: info.description,
            currency: info.currency,
            fields,
        })
    }

    /// Build a dataset from a parsed mapping document.
    pub fn from_spec(spec: ModelSpec) -> ModelResult<Dataset> {
        let fields = spec
            .mapping
            .iter()
            .map(|(name, field_spec)| FieldDef::from_spec(name, field_spec))
            .collect();
        Dataset::new(spec.dataset, fields)
    }

    /// Build a dataset straight from a JSON mapping document.
    pub fn from_json(doc: serde_json::Value) -> ModelResult<Dataset> {
        let spec: ModelSpec = serde_json::from_value(doc)?;
        Dataset::from_spec(spec)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Name of the physical fact table.
    pub fn fact_table_name(&self) -> String {
        format!("{}_entry", self.name)
    }

    /// Bind the dataset to physical storage: ensure the fact table,
    /// generate every field (complex dimensions create their reference
    /// tables and foreign keys as a side effect) and return the bound
    /// cube. Idempotent - repeated calls bind the same columns.
    pub fn generate(&self, store: &Store) -> ModelResult<Cube> {
        let mut fact = Table::ensure(store, &self.fact_table_name())?;
        let fields = self
            .fields
            .iter()
            .map(|field| field.generate(store, &self.name, &mut fact))
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Cube {
            name: self.name.clone(),
            fact,
            fields,
        })
    }
}

/// A dataset bound to physical storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    name: String,
    pub(crate) fact: Table,
    pub(crate) fields: Vec<Field>,
}

impl Cube {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a field (dimension or metric) by name.
    pub fn field(&self, name: &str) -> ModelResult<&Field> {
        self.fields
            .iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| ModelError::UnknownField(name.to_string()))
    }

    /// Resolve a dotted key path to a queryable `(table_alias, column)`
    /// pair: a plain name lands on the fact alias, `dim.attr` on that
    /// dimension's alias.
    pub fn key(&self, path: &str) -> ModelResult<(String, String)> {
        let key_path = KeyPath::parse(path);
        self.field(&key_path.dimension)?
            .key_column(key_path.attribute.as_deref())
    }

    /// Load one raw row: every field contributes its columns (complex
    /// dimensions upsert reference rows as a side effect), then the
    /// merged row upserts into the fact table keyed by `id`. Fresh rows
    /// carry no id and therefore always insert. Returns the fact row id.
    pub fn load(&self, store: &Store, row: &RawRow) -> ModelResult<i64> {
        let mut entry = std::collections::BTreeMap::new();
        for field in &self.fields {
            let (column, value) = field.load(store, row)?;
            entry.insert(column, value);
        }
        Ok(self.fact.upsert(store, &entry, &["id"])?)
    }

    /// Load a batch of raw rows sequentially.
    pub fn load_all<'a>(
        &self,
        store: &Store,
        rows: impl IntoIterator<Item = &'a RawRow>,
    ) -> ModelResult<()> {
        for row in rows {
            self.load(store, row)?;
        }
        Ok(())
    }

    /// Clear every field's storage, then the fact table.
    pub fn flush(&self, store: &Store) -> ModelResult<()> {
        for field in &self.fields {
            field.flush(store)?;
        }
        self.fact.flush(store)?;
        Ok(())
    }

    /// Drop every field's storage, then the fact table, consuming the
    /// binding.
    pub fn drop(self, store: &Store) -> ModelResult<()> {
        for field in &self.fields {
            field.drop(store)?;
        }
        self.fact.drop(store)?;
        Ok(())
    }

    /// Stream fully denormalized records in a single forward pass.
    ///
    /// One query joins every field; each result row is regrouped by its
    /// `{alias}_{column}` label into a nested [`Record`]. Restartable
    /// only by re-invoking.
    pub fn materialize<F>(
        &self,
        store: &Store,
        filter: Option<Expr>,
        order: &[(&str, bool)],
        mut f: F,
    ) -> ModelResult<()>
    where
        F: FnMut(Record) -> ModelResult<()>,
    {
        let mut query = Query::new()
            .select(self.fields.iter().flat_map(Field::selectables))
            .from(TableRef::aliased(self.fact.name(), FACT_ALIAS));
        for field in &self.fields {
            query = field.join(query);
        }
        if let Some(predicate) = filter {
            query = query.filter(predicate);
        }
        for (path, descending) in order {
            let (table, column) = self.key(path)?;
            let expr = crate::sql::expr::table_col(table, column);
            query = query.order_by(if *descending {
                OrderByExpr::desc(expr)
            } else {
                OrderByExpr::asc(expr)
            });
        }

        let sql = query
            .to_tokens_for_dialect(store.dialect())
            .serialize(store.dialect());
        store.for_each_row::<ModelError, _>(&sql, |names, values| f(nest_row(names, values)))
    }

    /// Collect all denormalized records.
    pub fn materialize_all(&self, store: &Store, filter: Option<Expr>) -> ModelResult<Vec<Record>> {
        let mut records = Vec::new();
        self.materialize(store, filter, &[], |record| {
            records.push(record);
            Ok(())
        })?;
        Ok(records)
    }
}

/// Regroup a labeled result row. The prefix before the first `_` names
/// the owning field: the fact alias flattens to the top level, any other
/// prefix nests under the dimension's name; unprefixed labels pass
/// through.
pub(crate) fn nest_row(names: &[String], values: Vec<Value>) -> Record {
    let mut record = Record::new();
    for (name, value) in names.iter().zip(values) {
        let json = value.into_json();
        match name.split_once('_') {
            Some((prefix, rest)) if prefix == FACT_ALIAS => {
                record.insert(rest.to_string(), json);
            }
            Some((prefix, rest)) => {
                let nested = record
                    .entry(prefix.to_string())
                    .or_insert_with(|| serde_json::Value::Object(Default::default()));
                if let serde_json::Value::Object(map) = nested {
                    map.insert(rest.to_string(), json);
                }
            }
            None => {
                record.insert(name.clone(), json);
            }
        }
    }
    record
}
