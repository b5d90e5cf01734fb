use std::path::PathBuf;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::models::{Transaction, TransactionFilter};

const SELECT_COLUMNS: &str = "SELECT id, amount, date, category, type, notes FROM transactions";
const ORDER_BY: &str = "ORDER BY date DESC, id DESC";

/// One `WHERE` condition together with the value bound to its `?`.
#[derive(Debug, PartialEq)]
struct Predicate {
    clause: &'static str,
    value: Value,
}

fn predicates(filter: &TransactionFilter) -> Vec<Predicate> {
    let mut preds = Vec::new();
    if let Some(start) = filter.start {
        preds.push(Predicate { clause: "date >= ?", value: Value::Text(start.to_string()) });
    }
    if let Some(end) = filter.end {
        preds.push(Predicate { clause: "date <= ?", value: Value::Text(end.to_string()) });
    }
    if let Some(category) = filter.category() {
        preds.push(Predicate { clause: "category = ?", value: Value::Text(category.to_string()) });
    }
    if let Some(kind) = filter.kind {
        preds.push(Predicate { clause: "type = ?", value: Value::Text(kind.as_str().to_string()) });
    }
    preds
}

fn map_row(row: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: Some(row.get(0)?),
        amount: row.get(1)?,
        date: row.get(2)?,
        category: row.get(3)?,
        kind: row.get(4)?,
        notes: row.get(5)?,
    })
}

/// Owns the single database connection. The connection is opened on first use,
/// and reopened on the next call after [`TransactionGateway::close`].
pub struct TransactionGateway {
    db_path: PathBuf,
    conn: Option<Connection>,
}

impl TransactionGateway {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            conn: None,
        }
    }

    #[cfg(test)]
    fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn connection(&mut self) -> Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                debug!(path = %self.db_path.display(), "opening database");
                let conn = get_connection(&self.db_path)?;
                init_db(&conn)?;
                conn
            }
        };
        Ok(&*self.conn.insert(conn))
    }

    /// Release the connection. A later operation opens a fresh one.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            debug!(path = %self.db_path.display(), "closing database");
            conn.close().map_err(|(_, e)| e)?;
        }
        Ok(())
    }

    pub fn insert(&mut self, t: &Transaction) -> Result<i64> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO transactions (amount, date, category, type, notes) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![t.amount, t.date, t.category, t.kind, t.notes],
        )?;
        let id = conn.last_insert_rowid();
        info!(id, amount = t.amount, kind = %t.kind, "inserted transaction");
        Ok(id)
    }

    /// Overwrite every field of row `id`. Returns the number of rows changed,
    /// which is 0 when no such row exists.
    pub fn update(&mut self, id: i64, t: &Transaction) -> Result<usize> {
        let changed = self.connection()?.execute(
            "UPDATE transactions SET amount = ?1, date = ?2, category = ?3, type = ?4, notes = ?5 WHERE id = ?6",
            params![t.amount, t.date, t.category, t.kind, t.notes, id],
        )?;
        debug!(id, changed, "updated transaction");
        Ok(changed)
    }

    /// Returns the number of rows removed, 0 when no such row exists.
    pub fn delete(&mut self, id: i64) -> Result<usize> {
        let changed = self
            .connection()?
            .execute("DELETE FROM transactions WHERE id = ?1", [id])?;
        debug!(id, changed, "deleted transaction");
        Ok(changed)
    }

    pub fn get(&mut self, id: i64) -> Result<Option<Transaction>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let found = self
            .connection()?
            .query_row(&sql, [id], map_row)
            .optional()?;
        Ok(found)
    }

    pub fn list_all(&mut self) -> Result<Vec<Transaction>> {
        self.filter(&TransactionFilter::default())
    }

    pub fn filter(&mut self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let preds = predicates(filter);
        let mut sql = SELECT_COLUMNS.to_string();
        if !preds.is_empty() {
            let clauses: Vec<&str> = preds.iter().map(|p| p.clause).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push(' ');
        sql.push_str(ORDER_BY);
        debug!(%sql, "querying transactions");

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(preds.iter().map(|p| &p.value)), map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(rows = rows.len(), "query returned");
        Ok(rows)
    }

    pub fn count(&mut self) -> Result<i64> {
        let count = self
            .connection()?
            .query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        Ok(count)
    }
}
