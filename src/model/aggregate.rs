//! Aggregation: compiling one grouped join query and reshaping its
//! result into a summary/drilldown structure.

use std::collections::{BTreeMap, BTreeSet};

use super::dataset::{Cube, KeyPath, Record, FACT_ALIAS};
use super::field::Field;
use super::{ModelError, ModelResult};
use crate::config::QuerySettings;
use crate::sql::expr::{col, count, lit_str, sum, table_col, ExprExt};
use crate::sql::query::{OrderByExpr, Query, TableRef};
use crate::store::Store;

/// Metric summed when a request names none.
pub const DEFAULT_METRIC: &str = "amount";

/// Page size applied when a request names none.
pub const DEFAULT_PAGESIZE: usize = 10_000;

/// Parameters of an aggregation query.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRequest {
    /// Metric to sum.
    pub metric: String,
    /// Dotted key paths to group by.
    pub drilldowns: Vec<String>,
    /// `(key path, value)` filters; values on the same column are ORed,
    /// distinct columns ANDed.
    pub cuts: Vec<(String, String)>,
    /// 1-based page of the drilldown rows.
    pub page: usize,
    pub pagesize: usize,
    /// `(key path, descending)` pairs; empty means metric descending.
    pub order: Vec<(String, bool)>,
}

impl Default for AggregateRequest {
    fn default() -> Self {
        Self {
            metric: DEFAULT_METRIC.to_string(),
            drilldowns: vec![],
            cuts: vec![],
            page: 1,
            pagesize: DEFAULT_PAGESIZE,
            order: vec![],
        }
    }
}

impl AggregateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the defaults from settings.
    pub fn from_settings(settings: &QuerySettings) -> Self {
        Self {
            metric: settings.default_metric.clone(),
            pagesize: settings.default_pagesize,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = metric.into();
        self
    }

    #[must_use]
    pub fn drilldown(mut self, path: impl Into<String>) -> Self {
        self.drilldowns.push(path.into());
        self
    }

    #[must_use]
    pub fn cut(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.cuts.push((path.into(), value.into()));
        self
    }

    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn pagesize(mut self, pagesize: usize) -> Self {
        self.pagesize = pagesize;
        self
    }

    #[must_use]
    pub fn order(mut self, path: impl Into<String>, descending: bool) -> Self {
        self.order.push((path.into(), descending));
        self
    }
}

/// Result of an aggregation: one page of reshaped drilldown rows plus a
/// summary over the full (unpaginated) result set.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub drilldown: Vec<Record>,
    pub summary: Record,
}

impl AggregateResult {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "drilldown": self.drilldown,
            "summary": self.summary,
        })
    }
}

impl Cube {
    /// Compile and run one grouped join query.
    ///
    /// Joins are added only for dimensions referenced in drilldowns or
    /// cuts. Pagination slices the already-fetched grouped rows in
    /// memory, after the summary has accumulated over all of them; the
    /// summary therefore reflects the full result set, not just the
    /// returned page. Large drilldowns are bounded by memory, not by
    /// the store.
    pub fn aggregate(
        &self,
        store: &Store,
        request: &AggregateRequest,
    ) -> ModelResult<AggregateResult> {
        let (metric_table, metric_column) = self.key(&request.metric)?;

        let mut query = Query::new().from(TableRef::aliased(self.fact.name(), FACT_ALIAS));

        // Join each referenced dimension once, keyed by base name.
        let mut referenced = BTreeSet::new();
        for path in &request.drilldowns {
            referenced.insert(KeyPath::parse(path).dimension);
        }
        for (path, _) in &request.cuts {
            referenced.insert(KeyPath::parse(path).dimension);
        }
        for base in &referenced {
            query = self.field(base)?.join(query);
        }

        let mut select = vec![
            sum(table_col(metric_table, metric_column)).alias(&request.metric),
            count(table_col(FACT_ALIAS, "id")).alias("entries"),
        ];
        for path in &request.drilldowns {
            let key_path = KeyPath::parse(path);
            let field = self.field(&key_path.dimension)?;
            match (&key_path.attribute, field) {
                // A whole complex dimension: expose all its columns,
                // group by its surrogate id.
                (None, Field::Complex(_)) => {
                    select.extend(field.selectables());
                    let (table, column) = field.key_column(None)?;
                    query = query.group_by(table_col(table, column));
                }
                _ => {
                    let (table, column) = field.key_column(key_path.attribute.as_deref())?;
                    select.push(
                        table_col(&table, &column).alias(format!("{}_{}", table, column)),
                    );
                    query = query.group_by(table_col(table, column));
                }
            }
        }
        query = query.select(select);

        // Cuts: same-column values are ORed, columns are ANDed.
        let mut facets: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
        for (path, value) in &request.cuts {
            let column = self.key(path)?;
            facets.entry(column).or_default().insert(value.clone());
        }
        for ((table, column), values) in facets {
            let predicate = values
                .into_iter()
                .map(|value| table_col(&table, &column).eq(lit_str(value)))
                .reduce(|acc, next| acc.or(next));
            if let Some(predicate) = predicate {
                query = query.filter(predicate);
            }
        }

        if request.order.is_empty() {
            query = query.order_by(OrderByExpr::desc(col(&request.metric)));
        } else {
            for (path, descending) in &request.order {
                let (table, column) = self.key(path)?;
                let expr = table_col(table, column);
                query = query.order_by(if *descending {
                    OrderByExpr::desc(expr)
                } else {
                    OrderByExpr::asc(expr)
                });
            }
        }

        let sql = query
            .to_tokens_for_dialect(store.dialect())
            .serialize(store.dialect());

        let mut metric_total = 0.0_f64;
        let mut entry_total = 0_i64;
        let mut rows: Vec<Record> = Vec::new();
        store.for_each_row::<ModelError, _>(&sql, |names, values| {
            rows.push(reshape(
                &request.metric,
                names,
                values,
                &mut metric_total,
                &mut entry_total,
            ));
            Ok(())
        })?;

        let offset = request.page.saturating_sub(1) * request.pagesize;
        let drilldown: Vec<Record> = rows
            .into_iter()
            .skip(offset)
            .take(request.pagesize)
            .collect();

        let mut summary = Record::new();
        summary.insert(
            request.metric.clone(),
            serde_json::Number::from_f64(metric_total)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        );
        summary.insert("num_entries".to_string(), serde_json::json!(entry_total));

        Ok(AggregateResult { drilldown, summary })
    }
}

/// Reshape one grouped row while feeding the running summary. Labels
/// with a `_` regroup as in materialization; the bare `entries` count is
/// surfaced as `num_entries`.
fn reshape(
    metric: &str,
    names: &[String],
    values: Vec<crate::store::Value>,
    metric_total: &mut f64,
    entry_total: &mut i64,
) -> Record {
    let mut record = Record::new();
    for (name, value) in names.iter().zip(values) {
        if name == metric {
            *metric_total += value.as_f64().unwrap_or(0.0);
        }
        if name == "entries" {
            *entry_total += value.as_i64().unwrap_or(0);
        }
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
                let label = if name == "entries" { "num_entries" } else { name };
                record.insert(label.to_string(), json);
            }
        }
    }
    record
}
