//! Evaluating custom object filters for a single contact.

mod evaluator;
mod executor;
mod sqlite;

pub use evaluator::{ContactFilterEvaluator, Evaluation};
pub use executor::{ExecuteError, ExecuteResult, QueryExecutor};
pub use sqlite::{SqliteExecutor, SCHEMA};
