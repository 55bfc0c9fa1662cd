//! SELECT query builder.
//!
//! Builds grouped, joined, filtered queries and renders them through the
//! token stream. `Display` renders with the default dialect.

use super::dialect::{Dialect, SqlDialect};
use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};

/// A table reference with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn aliased(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: Some(alias.into()),
        }
    }

    fn to_tokens(&self, ts: &mut TokenStream) {
        ts.push(Token::Ident(self.table.clone()));
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
    }
}

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

/// A join clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Expr,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// An ORDER BY element.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: SortDir,
}

impl OrderByExpr {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Asc,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Desc,
        }
    }
}

/// A SELECT query under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    select: Vec<Expr>,
    from: Option<TableRef>,
    joins: Vec<Join>,
    where_clause: Option<Expr>,
    group_by: Vec<Expr>,
    order_by: Vec<OrderByExpr>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add expressions to the select list.
    #[must_use]
    pub fn select(mut self, exprs: impl IntoIterator<Item = Expr>) -> Self {
        self.select.extend(exprs);
        self
    }

    #[must_use]
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    #[must_use]
    pub fn inner_join(mut self, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Inner,
            table,
            on,
        });
        self
    }

    #[must_use]
    pub fn left_join(mut self, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Left,
            table,
            on,
        });
        self
    }

    /// Add a predicate; multiple calls are ANDed together.
    #[must_use]
    pub fn filter(mut self, predicate: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    #[must_use]
    pub fn group_by(mut self, expr: Expr) -> Self {
        self.group_by.push(expr);
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: OrderByExpr) -> Self {
        self.order_by.push(order);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render the query for a dialect.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select).space();
        if self.select.is_empty() {
            ts.push(Token::Star);
        } else {
            for (i, expr) in self.select.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                expr.to_tokens(&mut ts);
            }
        }

        if let Some(from) = &self.from {
            ts.space().push(Token::From).space();
            from.to_tokens(&mut ts);
        }

        for join in &self.joins {
            ts.space();
            match join.join_type {
                JoinType::Inner => {
                    ts.push(Token::Join);
                }
                JoinType::Left => {
                    ts.push(Token::Left).space().push(Token::Join);
                }
            }
            ts.space();
            join.table.to_tokens(&mut ts);
            ts.space().push(Token::On).space();
            join.on.to_tokens(&mut ts);
        }

        if let Some(predicate) = &self.where_clause {
            ts.space().push(Token::Where).space();
            predicate.to_tokens(&mut ts);
        }

        if !self.group_by.is_empty() {
            ts.space().push(Token::GroupBy).space();
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                expr.to_tokens(&mut ts);
            }
        }

        if !self.order_by.is_empty() {
            ts.space().push(Token::OrderBy).space();
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                order.expr.to_tokens(&mut ts);
                ts.space().push(match order.dir {
                    SortDir::Asc => Token::Asc,
                    SortDir::Desc => Token::Desc,
                });
            }
        }

        if self.limit.is_some() || self.offset.is_some() {
            let pagination = dialect.emit_limit_offset(self.limit, self.offset);
            ts.space().append(&pagination);
        }

        ts
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dialect = Dialect::default();
        write!(f, "{}", self.to_tokens_for_dialect(dialect).serialize(dialect))
    }
}
