//! SQLite executor.
//!
//! SQLite reads the MySQL rendering as is: bare identifiers, `:name`
//! parameters and `UNION ALL` chains. `REGEXP` needs a user function,
//! which the caller registers on the connection if it uses that operator.

use std::path::Path;

use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::{Connection, ToSql};

use crate::model::ContactId;
use crate::sql::{Dialect, ParamValue, Parameters};

use super::executor::{ExecuteResult, QueryExecutor};

/// Schema of the tables the compiler reads, without a prefix.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS custom_item (
    id INTEGER PRIMARY KEY,
    custom_object_id INTEGER NOT NULL,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS custom_item_xref_contact (
    custom_item_id INTEGER NOT NULL,
    contact_id INTEGER NOT NULL,
    PRIMARY KEY (custom_item_id, contact_id)
);
CREATE TABLE IF NOT EXISTS custom_item_xref_custom_item (
    custom_item_id_lower INTEGER NOT NULL,
    custom_item_id_higher INTEGER NOT NULL,
    PRIMARY KEY (custom_item_id_lower, custom_item_id_higher),
    CHECK (custom_item_id_lower < custom_item_id_higher)
);
CREATE TABLE IF NOT EXISTS custom_field_value_int (
    custom_item_id INTEGER NOT NULL,
    custom_field_id INTEGER NOT NULL,
    value INTEGER,
    PRIMARY KEY (custom_item_id, custom_field_id)
);
CREATE TABLE IF NOT EXISTS custom_field_value_text (
    custom_item_id INTEGER NOT NULL,
    custom_field_id INTEGER NOT NULL,
    value TEXT,
    PRIMARY KEY (custom_item_id, custom_field_id)
);
CREATE TABLE IF NOT EXISTS custom_field_value_datetime (
    custom_item_id INTEGER NOT NULL,
    custom_field_id INTEGER NOT NULL,
    value TEXT,
    PRIMARY KEY (custom_item_id, custom_field_id)
);
CREATE TABLE IF NOT EXISTS custom_field_value_option (
    custom_item_id INTEGER NOT NULL,
    custom_field_id INTEGER NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (custom_item_id, custom_field_id, value)
);
";

impl ToSql for ParamValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            ParamValue::Int(n) => ToSqlOutput::Owned(Value::Integer(*n)),
            ParamValue::String(s) => ToSqlOutput::Borrowed(s.as_str().into()),
        })
    }
}

/// Executes against a SQLite connection.
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> ExecuteResult<Self> {
        Ok(Self::new(Connection::open(path)?))
    }

    /// In-memory database with the junction and value tables created.
    pub fn open_in_memory() -> ExecuteResult<Self> {
        let executor = Self::new(Connection::open_in_memory()?);
        executor.create_schema()?;
        Ok(executor)
    }

    pub fn create_schema(&self) -> ExecuteResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl QueryExecutor for SqliteExecutor {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn contact_ids(&self, sql: &str, params: &Parameters) -> ExecuteResult<Vec<ContactId>> {
        let mut stmt = self.conn.prepare(sql)?;

        let names: Vec<(String, &ParamValue)> = params
            .iter()
            .filter(|(name, _)| {
                let placeholder = format!(":{}", name);
                stmt.parameter_index(&placeholder).ok().flatten().is_some()
            })
            .map(|(name, value)| (format!(":{}", name), value))
            .collect();
        let bound: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .map(|(name, value)| (name.as_str(), *value as &dyn ToSql))
            .collect();

        let rows = stmt.query_map(bound.as_slice(), |row| row.get::<_, ContactId>(0))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(id?);
        }
        Ok(ids)
    }
}
