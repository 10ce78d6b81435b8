//! SELECT statements and `UNION ALL` chains.
//!
//! Statements render on one line with single spaces between clauses,
//! the way the host platform writes its segment SQL, so generated
//! fragments compare equal to golden text.

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};

/// What a FROM or JOIN clause reads.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Named(String),
    /// `(SELECT ...)`
    Subquery(Box<Query>),
}

/// A table with an optional alias, written `table alias` without `AS`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub source: TableSource,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            source: TableSource::Named(table.into()),
            alias: None,
        }
    }

    /// A derived table. It always carries an alias.
    pub fn subquery(query: Query, alias: &str) -> Self {
        Self {
            source: TableSource::Subquery(Box::new(query)),
            alias: Some(alias.into()),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match &self.source {
            TableSource::Named(name) => ts.push(Token::Ident(name.clone())),
            TableSource::Subquery(query) => ts.parenthesized(&query.to_tokens()),
        };
        if let Some(alias) = &self.alias {
            ts.then(Token::Ident(alias.clone()));
        }
        ts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Expr,
}

impl Join {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(match self.join_type {
            JoinType::Inner => Token::Inner,
            JoinType::Left => Token::Left,
        })
        .then(Token::Join)
        .push(Token::Space)
        .append(&self.table.to_tokens())
        .then(Token::On)
        .push(Token::Space)
        .append(&self.on.to_tokens());
        ts
    }
}

/// `UNION ALL` over two or more branches.
///
/// Branches are written one after the other without parentheses; only a
/// branch that is itself a union gets wrapped.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "SetOperation has no effect until converted to SQL with to_sql()"]
pub struct SetOperation {
    branches: Vec<Query>,
}

impl SetOperation {
    pub fn union_all(left: Query, right: Query) -> Self {
        Self {
            branches: vec![left, right],
        }
    }

    /// Add one more branch at the end.
    pub fn chain(mut self, next: Query) -> Self {
        self.branches.push(next);
        self
    }

    pub fn branches(&self) -> &[Query] {
        &self.branches
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                ts.then(Token::Union).then(Token::All).push(Token::Space);
            }
            if branch.set_op.is_some() {
                ts.parenthesized(&branch.to_tokens());
            } else {
                ts.append(&branch.to_tokens());
            }
        }
        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}

/// A SELECT, or a stand-in for a [`SetOperation`].
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql() or to_tokens()"]
pub struct Query {
    pub select: Vec<Expr>,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub set_op: Option<Box<SetOperation>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, exprs: Vec<Expr>) -> Self {
        self.select = exprs;
        self
    }

    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    pub fn inner_join(mut self, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Inner,
            table,
            on,
        });
        self
    }

    /// AND `condition` onto the WHERE clause.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.add_filter(condition);
        self
    }

    /// In-place [`Query::filter`] for queries owned by someone else.
    pub fn add_filter(&mut self, condition: Expr) {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
    }

    pub fn add_left_join(&mut self, table: TableRef, on: Expr) {
        self.joins.push(Join {
            join_type: JoinType::Left,
            table,
            on,
        });
    }

    pub fn union_all(self, other: Query) -> SetOperation {
        SetOperation::union_all(self, other)
    }

    pub fn to_tokens(&self) -> TokenStream {
        if let Some(set_op) = &self.set_op {
            return set_op.to_tokens();
        }

        let mut ts = TokenStream::new();
        ts.push(Token::Select);
        for (i, expr) in self.select.iter().enumerate() {
            if i > 0 {
                ts.push(Token::Comma);
            }
            ts.push(Token::Space).append(&expr.to_tokens());
        }

        if let Some(from) = &self.from {
            ts.then(Token::From).push(Token::Space).append(&from.to_tokens());
        }
        for join in &self.joins {
            ts.push(Token::Space).append(&join.to_tokens());
        }
        if let Some(condition) = &self.where_clause {
            ts.then(Token::Where)
                .push(Token::Space)
                .append(&condition.to_tokens());
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}

impl From<SetOperation> for Query {
    fn from(set_op: SetOperation) -> Self {
        Query {
            set_op: Some(Box::new(set_op)),
            ..Default::default()
        }
    }
}

impl std::fmt::Display for Query {
    /// MySQL rendering; use [`Query::to_sql`] for other dialects.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sql(Dialect::default()))
    }
}
