//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that the query compiler
//! emits through. It includes:
//!
//! - [`query`] - SELECT query builder and UNION chains
//! - [`expr`] - Expression AST and builder DSL
//! - [`params`] - Named bind parameters
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod params;
pub mod query;
pub mod token;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    col, lit_int, lit_str, param, table_col, BinaryOperator, Expr, ExprExt, Literal, LIKE_ESCAPE,
};
pub use params::{ParamValue, Parameters};
pub use query::{Join, JoinType, Query, SetOperation, TableRef, TableSource};
pub use token::{Token, TokenStream};
