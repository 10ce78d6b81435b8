//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Lowercase case folding for unquoted identifiers
//! - POSIX regular expression operator (`~`)

use super::helpers;
use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn regexp_operator(&self) -> &'static str {
        "~"
    }
}
