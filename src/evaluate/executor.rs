//! Running compiled SQL against a database.

use crate::model::ContactId;
use crate::sql::{Dialect, Parameters};

/// Error type for query execution.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Backend(String),
}

pub type ExecuteResult<T> = Result<T, ExecuteError>;

/// Executes `SELECT contact_id ...` statements.
///
/// Retries and timeouts are the implementation's concern.
pub trait QueryExecutor {
    /// Dialect the executor expects SQL in.
    fn dialect(&self) -> Dialect;

    /// Contact ids returned by the first column of `sql`.
    fn contact_ids(&self, sql: &str, params: &Parameters) -> ExecuteResult<Vec<ContactId>>;

    fn has_rows(&self, sql: &str, params: &Parameters) -> ExecuteResult<bool> {
        Ok(!self.contact_ids(sql, params)?.is_empty())
    }
}
