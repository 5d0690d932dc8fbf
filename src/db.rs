use crate::error::{EtlError, Result};
use crate::types::EnrichedBankRecord;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Rows returned by a passthrough query, with every cell rendered as text for
/// the stdout report.
#[derive(Debug)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.columns.join(" | "))?;
        for row in &self.rows {
            writeln!(f, "{}", row.join(" | "))?;
        }
        Ok(())
    }
}

/// Exclusively-owned handle on the file-backed SQLite store. Opened once per
/// run; `Drop` on the inner connection releases it on error paths, `close`
/// releases it explicitly on the success path.
pub struct BankStore {
    conn: Connection,
}

impl BankStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("Opened store at {}", path.display());
        Ok(Self { conn })
    }

    /// Load the enriched table under `table_name`, dropping and recreating it
    /// so repeated runs are idempotent with respect to final contents. The
    /// fresh table's implicit rowid preserves insertion (rank) order.
    pub fn load_table(&mut self, table_name: &str, records: &[EnrichedBankRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            r#"
            DROP TABLE IF EXISTS "{table_name}";
            CREATE TABLE "{table_name}" (
                Name            TEXT NOT NULL,
                MC_USD_Billion  REAL NOT NULL,
                MC_GBP_Billion  REAL NOT NULL,
                MC_EUR_Billion  REAL NOT NULL,
                MC_INR_Billion  REAL NOT NULL
            );
            "#
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                r#"INSERT INTO "{table_name}"
                   (Name, MC_USD_Billion, MC_GBP_Billion, MC_EUR_Billion, MC_INR_Billion)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#
            ))?;
            for record in records {
                stmt.execute(params![
                    record.name,
                    record.mc_usd_billion,
                    record.mc_gbp_billion,
                    record.mc_eur_billion,
                    record.mc_inr_billion,
                ])?;
            }
        }
        tx.commit()?;

        info!("Loaded {} rows into table {}", records.len(), table_name);
        Ok(())
    }

    /// Execute an arbitrary read query and return its rows. No validation is
    /// performed; callers supply fixed internal statements.
    pub fn query(&self, sql: &str) -> Result<QueryOutput> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = columns.len();

        let mut rows = Vec::new();
        let mut result = stmt.query([])?;
        while let Some(row) = result.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for i in 0..column_count {
                cells.push(render_value(row.get_ref(i)?));
            }
            rows.push(cells);
        }
        Ok(QueryOutput { columns, rows })
    }

    /// Explicit close for the success path.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| EtlError::Store(e))
    }
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(v) => v.to_string(),
        ValueRef::Real(v) => v.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}
