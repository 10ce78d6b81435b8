//! Expression AST for the predicates the compiler writes.
//!
//! Every variant renders through [`Expr::to_tokens`]; the match there is
//! exhaustive, so adding a variant means deciding how it prints.

use super::dialect::Dialect;
use super::query::Query;
use super::token::{Token, TokenStream};

/// Escape character for LIKE patterns built from user text.
///
/// Portable across MySQL, Postgres, SQLite and DuckDB without any string
/// escaping of its own, which a backslash is not.
pub const LIKE_ESCAPE: char = '!';

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `[table.]column`
    Column {
        table: Option<String>,
        column: String,
    },

    Literal(Literal),

    /// Named bind parameter.
    Param(String),

    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// `expr LIKE pattern ESCAPE '!'`
    LikeEscaped {
        expr: Box<Expr>,
        pattern: Box<Expr>,
    },

    /// `expr IN (v, ...)`. The list is never empty.
    InList { expr: Box<Expr>, values: Vec<Expr> },

    /// `expr [NOT] IN (SELECT ...)`
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<Query>,
        negated: bool,
    },

    /// `expr IS NOT NULL`
    IsNotNull(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
    Like,
    Regexp,
}

impl BinaryOperator {
    fn token(self) -> Token {
        match self {
            BinaryOperator::Eq => Token::Eq,
            BinaryOperator::Ne => Token::Ne,
            BinaryOperator::Lt => Token::Lt,
            BinaryOperator::Gt => Token::Gt,
            BinaryOperator::Lte => Token::Lte,
            BinaryOperator::Gte => Token::Gte,
            BinaryOperator::And => Token::And,
            BinaryOperator::Or => Token::Or,
            BinaryOperator::Like => Token::Like,
            BinaryOperator::Regexp => Token::Regexp,
        }
    }
}

impl Expr {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(table) = table {
                    ts.push(Token::Ident(table.clone())).push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(Literal::Int(n)) => {
                ts.push(Token::LitInt(*n));
            }

            Expr::Literal(Literal::String(s)) => {
                ts.push(Token::LitString(s.clone()));
            }

            Expr::Param(name) => {
                ts.push(Token::Param(name.clone()));
            }

            Expr::BinaryOp { left, op, right } => {
                // AND binds tighter than OR
                let operand = |ts: &mut TokenStream, e: &Expr| {
                    let is_or = matches!(
                        e,
                        Expr::BinaryOp {
                            op: BinaryOperator::Or,
                            ..
                        }
                    );
                    if *op == BinaryOperator::And && is_or {
                        ts.parenthesized(&e.to_tokens());
                    } else {
                        ts.append(&e.to_tokens());
                    }
                };
                operand(&mut ts, left);
                ts.then(op.token()).push(Token::Space);
                operand(&mut ts, right);
            }

            Expr::LikeEscaped { expr, pattern } => {
                ts.append(&expr.to_tokens())
                    .then(Token::Like)
                    .push(Token::Space)
                    .append(&pattern.to_tokens())
                    .then(Token::Escape)
                    .then(Token::LitString(LIKE_ESCAPE.to_string()));
            }

            Expr::InList { expr, values } => {
                debug_assert!(!values.is_empty(), "IN with an empty list");
                let mut list = TokenStream::new();
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        list.push(Token::Comma).push(Token::Space);
                    }
                    list.append(&value.to_tokens());
                }
                ts.append(&expr.to_tokens())
                    .then(Token::In)
                    .push(Token::Space)
                    .parenthesized(&list);
            }

            Expr::InSubquery {
                expr,
                subquery,
                negated,
            } => {
                ts.append(&expr.to_tokens());
                if *negated {
                    ts.then(Token::Not);
                }
                ts.then(Token::In)
                    .push(Token::Space)
                    .parenthesized(&subquery.to_tokens());
            }

            Expr::IsNotNull(expr) => {
                ts.append(&expr.to_tokens()).then(Token::IsNotNull);
            }
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}

pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// `table.column`
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

pub fn param(name: &str) -> Expr {
    Expr::Param(name.into())
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Fluent predicate building on anything that is an expression.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn binary(self, op: BinaryOperator, other: impl Into<Expr>) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self.into_expr()),
            op,
            right: Box::new(other.into()),
        }
    }

    fn eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Eq, other)
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Ne, other)
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gt, other)
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gte, other)
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lt, other)
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lte, other)
    }

    fn and(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::And, other)
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Or, other)
    }

    /// LIKE with the pattern passed through as written.
    fn like(self, pattern: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Like, pattern)
    }

    /// LIKE with [`LIKE_ESCAPE`] as the escape character.
    fn like_escaped(self, pattern: impl Into<Expr>) -> Expr {
        Expr::LikeEscaped {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
        }
    }

    fn regexp(self, pattern: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Regexp, pattern)
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        Expr::IsNotNull(Box::new(self.into_expr()))
    }

    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::InList {
            expr: Box::new(self.into_expr()),
            values,
        }
    }

    fn in_subquery(self, subquery: Query) -> Expr {
        Expr::InSubquery {
            expr: Box::new(self.into_expr()),
            subquery: Box::new(subquery),
            negated: false,
        }
    }

    fn not_in_subquery(self, subquery: Query) -> Expr {
        Expr::InSubquery {
            expr: Box::new(self.into_expr()),
            subquery: Box::new(subquery),
            negated: true,
        }
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n.into())
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}
