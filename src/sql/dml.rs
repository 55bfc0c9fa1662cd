//! DML statement builders: INSERT, UPDATE, DELETE.

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};

/// INSERT statement for a single row of literal values.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub into: String,
    pub columns: Vec<String>,
    pub values: Vec<Expr>,
}

impl Insert {
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            into: table.into(),
            columns: vec![],
            values: vec![],
        }
    }

    #[must_use]
    pub fn value(mut self, column: impl Into<String>, value: Expr) -> Self {
        self.columns.push(column.into());
        self.values.push(value);
        self
    }

    pub fn to_tokens_for_dialect(&self, _dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Insert)
            .space()
            .push(Token::Into)
            .space()
            .push(Token::Ident(self.into.clone()));

        if self.columns.is_empty() {
            // A row with no bindable columns still creates a surrogate id.
            ts.space()
                .push(Token::Default)
                .space()
                .push(Token::Values);
            return ts;
        }

        ts.space().lparen();
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Ident(column.clone()));
        }
        ts.rparen()
            .space()
            .push(Token::Values)
            .space()
            .lparen();
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            value.to_tokens(&mut ts);
        }
        ts.rparen();
        ts
    }
}

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub set: Vec<(String, Expr)>,
    pub filter: Option<Expr>,
}

impl Update {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            set: vec![],
            filter: None,
        }
    }

    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: Expr) -> Self {
        self.set.push((column.into(), value));
        self
    }

    /// Add a predicate; multiple calls are ANDed together.
    #[must_use]
    pub fn filter(mut self, predicate: Expr) -> Self {
        self.filter = Some(match self.filter {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    pub fn to_tokens_for_dialect(&self, _dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Update)
            .space()
            .push(Token::Ident(self.table.clone()))
            .space()
            .push(Token::Set)
            .space();
        for (i, (column, value)) in self.set.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Ident(column.clone()))
                .space()
                .push(Token::Eq)
                .space();
            value.to_tokens(&mut ts);
        }
        if let Some(predicate) = &self.filter {
            ts.space().push(Token::Where).space();
            predicate.to_tokens(&mut ts);
        }
        ts
    }
}

/// DELETE statement. Without a filter it clears the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub from: String,
    pub filter: Option<Expr>,
}

impl Delete {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            from: table.into(),
            filter: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, predicate: Expr) -> Self {
        self.filter = Some(match self.filter {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    pub fn to_tokens_for_dialect(&self, _dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Delete)
            .space()
            .push(Token::From)
            .space()
            .push(Token::Ident(self.from.clone()));
        if let Some(predicate) = &self.filter {
            ts.space().push(Token::Where).space();
            predicate.to_tokens(&mut ts);
        }
        ts
    }
}

macro_rules! impl_display_for_dml {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let dialect = Dialect::default();
                write!(f, "{}", self.to_tokens_for_dialect(dialect).serialize(dialect))
            }
        })*
    };
}

impl_display_for_dml!(Insert, Update, Delete);
