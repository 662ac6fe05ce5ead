//! Whole-database housekeeping: row counts and the full wipe.

use sqlx::PgPool;

use crate::error::DbError;
use crate::tables::Table;

/// Number of rows in (or removed from) one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCount {
    /// The table.
    pub table: Table,
    /// Row count.
    pub rows: u64,
}

/// Count the rows of every table, in creation order.
///
/// # Errors
///
/// Returns [`DbError`] if any count query fails.
pub async fn count_rows(pool: &PgPool) -> Result<Vec<TableCount>, DbError> {
    let mut counts = Vec::with_capacity(Table::CREATION_ORDER.len());
    for table in Table::CREATION_ORDER {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let (rows,): (i64,) = sqlx::query_as(&sql).fetch_one(pool).await?;
        let rows = u64::try_from(rows)
            .map_err(|e| DbError::Invariant(format!("negative count for {table}: {e}")))?;
        counts.push(TableCount { table, rows });
    }
    Ok(counts)
}

/// Delete every row of every table in one transaction.
///
/// Tables are emptied in [`Table::DELETION_ORDER`], so no foreign key is
/// ever left dangling. Either all tables end up empty or none change.
///
/// # Errors
///
/// Returns [`DbError`] if any delete fails; the transaction is rolled back.
pub async fn reset_all(pool: &PgPool) -> Result<Vec<TableCount>, DbError> {
    let mut tx = pool.begin().await?;
    let mut removed = Vec::with_capacity(Table::DELETION_ORDER.len());

    for table in Table::DELETION_ORDER {
        let sql = format!("DELETE FROM {}", table.name());
        let result = sqlx::query(&sql).execute(&mut *tx).await?;
        tracing::debug!(%table, rows = result.rows_affected(), "Cleared table");
        removed.push(TableCount {
            table,
            rows: result.rows_affected(),
        });
    }

    tx.commit().await?;

    let total: u64 = removed.iter().map(|c| c.rows).sum();
    tracing::info!(rows = total, "Reset all tables");
    Ok(removed)
}
