//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (ANSI/PG/DuckDB), `` ` `` (MySQL)
//! - Named parameter syntax: `:name` vs `$name`
//! - String literal escaping
//! - Regular expression operator: `REGEXP` vs `~`
//!
//! # Usage
//!
//! ```ignore
//! use custom_objects::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_identifier("user");  // "user"
//! ```

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;

use serde::{Deserialize, Serialize};

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    ///
    /// - ANSI/PostgreSQL/DuckDB: `"identifier"`
    /// - MySQL: `` `identifier` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Format an identifier, quoting only when it is not a plain word.
    fn format_identifier(&self, ident: &str) -> String {
        if helpers::is_bare_identifier(ident) {
            ident.to_string()
        } else {
            self.quote_identifier(ident)
        }
    }

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Render a named bind parameter.
    fn format_param(&self, name: &str) -> String {
        helpers::param_colon(name)
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// Regular expression match operator.
    fn regexp_operator(&self) -> &'static str;
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
    DuckDb,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::MySql => &MySql,
            Dialect::Postgres => &Postgres,
            Dialect::DuckDb => &DuckDb,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn format_identifier(&self, ident: &str) -> String {
        self.dialect().format_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_param(&self, name: &str) -> String {
        self.dialect().format_param(name)
    }

    fn regexp_operator(&self) -> &'static str {
        self.dialect().regexp_operator()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}
