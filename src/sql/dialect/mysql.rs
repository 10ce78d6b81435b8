//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - Backslash escapes inside string literals
//! - `REGEXP` operator for pattern matching
//! - Boolean is TINYINT(1), returns 1/0

use super::helpers;
use super::SqlDialect;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_backslash(s)
    }

    fn regexp_operator(&self) -> &'static str {
        "REGEXP"
    }
}
