//! DuckDB-backed local table
//!
//! Useful for running the pipeline without cloud access. The table is
//! created on open with a composite primary key, and writes use
//! `INSERT OR REPLACE` so that they overwrite like a key-value upsert.

use super::BarTable;
use crate::error::{Error, Result};
use crate::record::BarRecord;
use async_trait::async_trait;
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// Local table stored in DuckDB
pub struct DuckDbTable {
    conn: Mutex<Connection>,
    table_name: String,
}

impl DuckDbTable {
    /// Open (or create) a table in a DuckDB database file
    pub fn open(path: impl AsRef<Path>, table_name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            Error::config(format!("Failed to open DuckDB at {}: {e}", path.display()))
        })?;
        Self::with_connection(conn, table_name.into())
    }

    /// Create a table in an in-memory DuckDB database
    pub fn in_memory(table_name: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;
        Self::with_connection(conn, table_name.into())
    }

    fn with_connection(conn: Connection, table_name: String) -> Result<Self> {
        validate_table_name(&table_name)?;

        let create_sql = format!(
            r#"CREATE TABLE IF NOT EXISTS "{table_name}" (
                "symbol_timestamp" VARCHAR NOT NULL,
                "row_key" VARCHAR NOT NULL,
                "symbol" VARCHAR NOT NULL,
                "timestamp" VARCHAR NOT NULL,
                "date" VARCHAR NOT NULL,
                "open" DECIMAL(38, 10) NOT NULL,
                "close" DECIMAL(38, 10) NOT NULL,
                "high" DECIMAL(38, 10) NOT NULL,
                "low" DECIMAL(38, 10) NOT NULL,
                "volume" BIGINT NOT NULL,
                PRIMARY KEY ("symbol_timestamp", "row_key")
            );"#
        );
        conn.execute_batch(&create_sql)
            .map_err(|e| Error::config(format!("Failed to create table {table_name}: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
            table_name,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::write(&self.table_name, "connection lock poisoned"))
    }

    fn upsert(&self, record: &BarRecord) -> Result<()> {
        let sql = format!(
            r#"INSERT OR REPLACE INTO "{}" VALUES (?, ?, ?, ?, ?,
                CAST(CAST(? AS VARCHAR) AS DECIMAL(38, 10)),
                CAST(CAST(? AS VARCHAR) AS DECIMAL(38, 10)),
                CAST(CAST(? AS VARCHAR) AS DECIMAL(38, 10)),
                CAST(CAST(? AS VARCHAR) AS DECIMAL(38, 10)), ?)"#,
            self.table_name
        );

        let conn = self.lock()?;
        conn.execute(
            &sql,
            params![
                record.symbol_timestamp,
                record.row_key,
                record.symbol,
                record.timestamp,
                record.date,
                record.open.to_string(),
                record.close.to_string(),
                record.high.to_string(),
                record.low.to_string(),
                record.volume,
            ],
        )
        .map_err(|e| Error::write(&self.table_name, e.to_string()))?;
        Ok(())
    }

    /// Number of items stored
    pub fn count(&self) -> Result<usize> {
        let sql = format!(r#"SELECT COUNT(*) FROM "{}""#, self.table_name);
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| Error::Other(format!("Failed to count rows: {e}")))?;
        Ok(count as usize)
    }

    /// Sort keys stored under a partition key, in key order
    pub fn row_keys(&self, partition_key: &str) -> Result<Vec<String>> {
        let sql = format!(
            r#"SELECT "row_key" FROM "{}" WHERE "symbol_timestamp" = ? ORDER BY "row_key""#,
            self.table_name
        );
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| Error::Other(format!("Failed to prepare query: {e}")))?;
        let keys = stmt
            .query_map(params![partition_key], |row| row.get::<_, String>(0))
            .map_err(|e| Error::Other(format!("Failed to query row keys: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Other(format!("Failed to read row keys: {e}")))?;
        Ok(keys)
    }

    /// Volume stored for one item
    pub fn volume(&self, partition_key: &str, row_key: &str) -> Result<Option<i64>> {
        let sql = format!(
            r#"SELECT "volume" FROM "{}" WHERE "symbol_timestamp" = ? AND "row_key" = ?"#,
            self.table_name
        );
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| Error::Other(format!("Failed to prepare query: {e}")))?;
        let mut rows = stmt
            .query(params![partition_key, row_key])
            .map_err(|e| Error::Other(format!("Failed to query volume: {e}")))?;
        match rows
            .next()
            .map_err(|e| Error::Other(format!("Failed to read volume: {e}")))?
        {
            Some(row) => Ok(Some(
                row.get(0)
                    .map_err(|e| Error::Other(format!("Failed to read volume: {e}")))?,
            )),
            None => Ok(None),
        }
    }
}

/// Table names are interpolated into SQL, so only a safe charset is allowed
pub(crate) fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::config("Table name cannot be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(Error::config(format!(
            "Invalid table name '{name}': use letters, digits, '_', '-' or '.'"
        )));
    }
    Ok(())
}

#[async_trait]
impl BarTable for DuckDbTable {
    fn name(&self) -> &str {
        &self.table_name
    }

    fn label(&self) -> &str {
        "DuckDB"
    }

    async fn put(&self, record: &BarRecord) -> Result<()> {
        self.upsert(record)
    }
}
