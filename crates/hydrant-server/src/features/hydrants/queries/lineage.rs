//! Ledger chain of a single live hydrant
//!
//! Starts at the entry the hydrant row points to and follows
//! `previous_event_id` back to the `create` entry.

use mediator::Request;
use sqlx::PgPool;

use crate::models::HistoryEntry;

#[derive(Debug, Clone)]
pub struct GetLineageQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetLineageError {
    #[error("Hydrant with id: {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<HistoryEntry>, GetLineageError>> for GetLineageQuery {}

/// Returns the hydrant's entries newest first; the last one is its `create`.
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetLineageQuery,
) -> Result<Vec<HistoryEntry>, GetLineageError> {
    let entries = sqlx::query_as::<_, HistoryEntry>(
        r#"
        WITH RECURSIVE lineage AS (
            SELECT h.*, 0 AS depth
            FROM history h
            JOIN hydrants r ON r.history_id = h.id
            WHERE r.id = $1
            UNION ALL
            SELECT h.*, l.depth + 1
            FROM history h
            JOIN lineage l ON h.id = l.previous_event_id
        )
        SELECT id, action, previous_event_id, hydrant, location,
               inspection_date, defects, checked_by
        FROM lineage
        ORDER BY depth
        "#,
    )
    .bind(query.id)
    .fetch_all(&pool)
    .await?;

    // A live hydrant always points at least at its own create entry.
    if entries.is_empty() {
        return Err(GetLineageError::NotFound(query.id));
    }

    Ok(entries)
}
