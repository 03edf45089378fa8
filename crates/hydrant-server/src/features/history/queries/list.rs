//! List the full ledger

use mediator::Request;
use sqlx::PgPool;

use crate::models::HistoryEntry;

/// Query for every ledger entry, oldest first
#[derive(Debug, Clone, Default)]
pub struct ListHistoryQuery;

#[derive(Debug, thiserror::Error)]
pub enum ListHistoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<HistoryEntry>, ListHistoryError>> for ListHistoryQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    _query: ListHistoryQuery,
) -> Result<Vec<HistoryEntry>, ListHistoryError> {
    let entries = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT id, action, previous_event_id, hydrant, location,
               inspection_date, defects, checked_by
        FROM history
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(entries)
}
