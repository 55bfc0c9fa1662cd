//! SQL expressions.
//!
//! An [`Expr`] is a dialect-agnostic expression tree that renders to a
//! [`TokenStream`]. Expressions are built with the free constructors
//! ([`col`], [`table_col`], [`lit_str`], [`sum`], ...) and combined with
//! the fluent [`ExprExt`] methods.

use super::token::{Token, TokenStream};

/// A literal value in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

impl Literal {
    fn token(&self) -> Token {
        match self {
            Literal::Int(n) => Token::LitInt(*n),
            Literal::Float(f) => Token::LitFloat(*f),
            Literal::String(s) => Token::LitString(s.clone()),
            Literal::Bool(b) => Token::LitBool(*b),
            Literal::Null => Token::LitNull,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

impl BinaryOperator {
    fn token(&self) -> Token {
        match self {
            BinaryOperator::Eq => Token::Eq,
            BinaryOperator::Ne => Token::Ne,
            BinaryOperator::Lt => Token::Lt,
            BinaryOperator::Lte => Token::Lte,
            BinaryOperator::Gt => Token::Gt,
            BinaryOperator::Gte => Token::Gte,
            BinaryOperator::And => Token::And,
            BinaryOperator::Or => Token::Or,
        }
    }

    fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

/// A SQL expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Bare column reference.
    Column(String),
    /// Column qualified by a table or alias name.
    QualifiedColumn { table: String, name: String },
    /// Literal value.
    Literal(Literal),
    /// Binary operation.
    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    /// `expr IS NULL`
    IsNull(Box<Expr>),
    /// `expr IS NOT NULL`
    IsNotNull(Box<Expr>),
    /// Function call, e.g. `SUM(x)`.
    Function { name: String, args: Vec<Expr> },
    /// `*`
    Star,
    /// `expr AS alias`
    Alias { expr: Box<Expr>, alias: String },
}

impl Expr {
    /// Render this expression into a token stream.
    pub fn to_tokens(&self, ts: &mut TokenStream) {
        match self {
            Expr::Column(name) => {
                ts.push(Token::Ident(name.clone()));
            }
            Expr::QualifiedColumn { table, name } => {
                ts.push(Token::QualifiedIdent {
                    qualifier: table.clone(),
                    name: name.clone(),
                });
            }
            Expr::Literal(lit) => {
                ts.push(lit.token());
            }
            Expr::Binary { left, op, right } => {
                // Nested logical groups keep their own parentheses so
                // OR facets survive inside an ANDed predicate.
                let wrap = |e: &Expr, ts: &mut TokenStream| {
                    let nested = matches!(
                        e,
                        Expr::Binary { op, .. } if op.is_logical()
                    );
                    if nested {
                        ts.lparen();
                        e.to_tokens(ts);
                        ts.rparen();
                    } else {
                        e.to_tokens(ts);
                    }
                };
                wrap(left, ts);
                ts.space().push(op.token()).space();
                wrap(right, ts);
            }
            Expr::IsNull(expr) => {
                expr.to_tokens(ts);
                ts.space().push(Token::IsNull);
            }
            Expr::IsNotNull(expr) => {
                expr.to_tokens(ts);
                ts.space().push(Token::IsNotNull);
            }
            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    arg.to_tokens(ts);
                }
                ts.rparen();
            }
            Expr::Star => {
                ts.push(Token::Star);
            }
            Expr::Alias { expr, alias } => {
                expr.to_tokens(ts);
                ts.space()
                    .push(Token::As)
                    .space()
                    .push(Token::Ident(alias.clone()));
            }
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Bare column reference.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Column reference qualified by a table or alias.
pub fn table_col(table: impl Into<String>, name: impl Into<String>) -> Expr {
    Expr::QualifiedColumn {
        table: table.into(),
        name: name.into(),
    }
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

pub fn lit_str(s: impl Into<String>) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

/// Function call with arbitrary arguments.
pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

/// `SUM(expr)`
pub fn sum(expr: Expr) -> Expr {
    func("sum", vec![expr])
}

/// `COUNT(expr)`
pub fn count(expr: Expr) -> Expr {
    func("count", vec![expr])
}

/// `COUNT(*)`
pub fn count_star() -> Expr {
    func("count", vec![Expr::Star])
}

// =============================================================================
// Fluent combinators
// =============================================================================

/// Fluent combinators for building expressions.
pub trait ExprExt: Sized {
    fn binary(self, op: BinaryOperator, other: Expr) -> Expr;

    fn eq(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Eq, other)
    }
    fn ne(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Ne, other)
    }
    fn lt(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Lt, other)
    }
    fn lte(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Lte, other)
    }
    fn gt(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Gt, other)
    }
    fn gte(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Gte, other)
    }
    fn and(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::And, other)
    }
    fn or(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Or, other)
    }

    fn is_null(self) -> Expr;
    fn is_not_null(self) -> Expr;

    /// `expr AS alias`
    fn alias(self, alias: impl Into<String>) -> Expr;
}

impl ExprExt for Expr {
    fn binary(self, op: BinaryOperator, other: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(other),
        }
    }

    fn is_null(self) -> Expr {
        Expr::IsNull(Box::new(self))
    }

    fn is_not_null(self) -> Expr {
        Expr::IsNotNull(Box::new(self))
    }

    fn alias(self, alias: impl Into<String>) -> Expr {
        Expr::Alias {
            expr: Box::new(self),
            alias: alias.into(),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ts = TokenStream::new();
        self.to_tokens(&mut ts);
        write!(f, "{}", ts.serialize(super::dialect::Dialect::default()))
    }
}
