//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible with extensions:
//! - ANSI identifier quoting (`"`)
//! - `$name` named prepared-statement parameters

use super::helpers;
use super::SqlDialect;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_param(&self, name: &str) -> String {
        helpers::param_dollar(name)
    }

    fn regexp_operator(&self) -> &'static str {
        "~"
    }
}
