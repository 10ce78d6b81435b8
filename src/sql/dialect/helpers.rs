//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, DuckDB
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL, MariaDB
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Words that can never appear bare as a table, column or alias name.
///
/// Only the keywords this crate can emit plus the common clause words;
/// anything else that needs quoting is caught by the character check.
const RESERVED: &[&str] = &[
    "all", "and", "as", "by", "case", "delete", "distinct", "else", "end", "exists", "from",
    "group", "having", "in", "index", "inner", "insert", "into", "is", "join", "key", "left",
    "like", "limit", "not", "null", "on", "or", "order", "outer", "regexp", "right", "select",
    "set", "table", "then", "union", "update", "values", "when", "where",
];

/// Whether an identifier can be emitted without quotes.
///
/// Plain lowercase words (`[a-z_][a-z0-9_]*`) that are not reserved are
/// portable across every supported dialect, which keeps generated SQL
/// identical to hand-written platform queries.
pub fn is_bare_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_lowercase() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return false;
    }
    !RESERVED.contains(&ident)
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with single quotes, also escaping backslashes.
/// Used by: MySQL (backslash is an escape character unless NO_BACKSLASH_ESCAPES)
pub fn quote_string_backslash(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

// =============================================================================
// Parameters
// =============================================================================

/// Colon-prefixed named parameter (`:name`).
/// Used by: MySQL (PDO/DBAL), Postgres (DBAL), SQLite
pub fn param_colon(name: &str) -> String {
    format!(":{}", name)
}

/// Dollar-prefixed named parameter (`$name`).
/// Used by: DuckDB
pub fn param_dollar(name: &str) -> String {
    format!("${}", name)
}
