//! SQL tokens: the atoms every generated statement is written in.
//!
//! Only the keywords and punctuation the compiler emits exist here, so a
//! new construct in [`super::expr`] or [`super::query`] has to add its
//! token explicitly.

use super::dialect::{Dialect, SqlDialect};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Select,
    From,
    Where,
    Inner,
    Left,
    Join,
    On,
    And,
    Or,
    Not,
    In,
    Like,
    Escape,
    Regexp,
    IsNotNull,
    Union,
    All,

    // Punctuation
    Comma,
    Dot,
    LParen,
    RParen,
    Space,

    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,

    /// Table, column or alias name; quoted only when it has to be.
    Ident(String),
    /// Named bind parameter, stored without its prefix.
    Param(String),
    LitInt(i64),
    LitString(String),
}

impl Token {
    pub fn serialize(&self, dialect: Dialect) -> String {
        let text = match self {
            Token::Select => "SELECT",
            Token::From => "FROM",
            Token::Where => "WHERE",
            Token::Inner => "INNER",
            Token::Left => "LEFT",
            Token::Join => "JOIN",
            Token::On => "ON",
            Token::And => "AND",
            Token::Or => "OR",
            Token::Not => "NOT",
            Token::In => "IN",
            Token::Like => "LIKE",
            Token::Escape => "ESCAPE",
            Token::Regexp => dialect.regexp_operator(),
            Token::IsNotNull => "IS NOT NULL",
            Token::Union => "UNION",
            Token::All => "ALL",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Space => " ",
            Token::Eq => "=",
            Token::Ne => "<>",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::Ident(name) => return dialect.format_identifier(name),
            Token::Param(name) => return dialect.format_param(name),
            Token::LitInt(n) => return n.to_string(),
            Token::LitString(s) => return dialect.quote_string(s),
        };
        text.to_string()
    }
}

/// Tokens in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Push `token` preceded by a space.
    pub fn then(&mut self, token: Token) -> &mut Self {
        self.push(Token::Space).push(token)
    }

    /// Append `inner` wrapped in parentheses.
    pub fn parenthesized(&mut self, inner: &TokenStream) -> &mut Self {
        self.push(Token::LParen).append(inner).push(Token::RParen)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }
}
