//! DDL statement builders: CREATE TABLE, ALTER TABLE, DROP TABLE.

use super::dialect::{Dialect, SqlDialect};
use super::token::{Token, TokenStream};

/// Column data types understood by the schema builder.
///
/// Deliberately small: the mapping description only distinguishes text
/// (strings, constants, opaque dates), floats, and the integer surrogate
/// and foreign key columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Text,
    Integer,
    Float,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub primary_key: bool,
    pub not_null: bool,
    pub identity: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            not_null: false,
            identity: false,
        }
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Mark as an auto-incrementing surrogate key column.
    #[must_use]
    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    fn to_tokens(&self, ts: &mut TokenStream, dialect: Dialect) {
        ts.push(Token::Ident(self.name.clone())).space();
        if self.identity {
            ts.push(Token::Raw(dialect.emit_identity().into()));
        } else {
            ts.push(Token::Raw(dialect.emit_data_type(&self.data_type)));
        }
        if self.primary_key {
            ts.space().push(Token::Primary).space().push(Token::Key);
        }
        if self.not_null {
            ts.space().push(Token::Not).space().push(Token::Null);
        }
    }
}

/// CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
}

impl CreateTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            if_not_exists: false,
            columns: vec![],
        }
    }

    #[must_use]
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Create).space().push(Token::Table).space();
        if self.if_not_exists {
            ts.push(Token::If)
                .space()
                .push(Token::Not)
                .space()
                .push(Token::Exists)
                .space();
        }
        ts.push(Token::Ident(self.name.clone())).space().lparen();
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            column.to_tokens(&mut ts, dialect);
        }
        ts.rparen();
        ts
    }
}

/// ALTER TABLE ... ADD COLUMN statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTable {
    pub table: String,
    pub column: ColumnDef,
}

impl AlterTable {
    pub fn add_column(table: impl Into<String>, column: ColumnDef) -> Self {
        Self {
            table: table.into(),
            column,
        }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Alter)
            .space()
            .push(Token::Table)
            .space()
            .push(Token::Ident(self.table.clone()))
            .space()
            .push(Token::Add)
            .space()
            .push(Token::Column)
            .space();
        self.column.to_tokens(&mut ts, dialect);
        ts
    }
}

/// DROP TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub name: String,
    pub if_exists: bool,
}

impl DropTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            if_exists: false,
        }
    }

    #[must_use]
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn to_tokens_for_dialect(&self, _dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Drop).space().push(Token::Table).space();
        if self.if_exists {
            ts.push(Token::If).space().push(Token::Exists).space();
        }
        ts.push(Token::Ident(self.name.clone()));
        ts
    }
}

macro_rules! impl_display_for_ddl {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let dialect = Dialect::default();
                write!(f, "{}", self.to_tokens_for_dialect(dialect).serialize(dialect))
            }
        })*
    };
}

impl_display_for_ddl!(CreateTable, AlterTable, DropTable);
