//! Create hydrant command
//!
//! Writes the `create` ledger entry and the hydrant row pointing at it in a
//! single transaction.

use mediator::Request;
use sqlx::{PgConnection, PgPool};

use crate::db;
use crate::features::history::ledger::{self, NewEntry};
use crate::models::{HydrantFields, HydrantRecord};

/// Command to register a new hydrant
#[derive(Debug, Clone)]
pub struct CreateHydrantCommand {
    pub fields: HydrantFields,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateHydrantError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<HydrantRecord, CreateHydrantError>> for CreateHydrantCommand {}

/// Handles the create hydrant command
///
/// # Errors
///
/// - `Database` - Either insert failed; nothing was committed
#[tracing::instrument(skip(pool, command), fields(hydrant = %command.fields.name()))]
pub async fn handle(
    pool: PgPool,
    command: CreateHydrantCommand,
) -> Result<HydrantRecord, CreateHydrantError> {
    let mut tx = pool.begin().await?;

    let record = match insert(&mut tx, &command.fields).await {
        Ok(record) => record,
        Err(e) => {
            db::rollback(tx, "create_hydrant").await;
            return Err(e.into());
        },
    };

    tx.commit().await?;

    tracing::info!(
        hydrant_id = record.id,
        history_id = record.history_id,
        "Hydrant created"
    );

    Ok(record)
}

async fn insert(
    conn: &mut PgConnection,
    fields: &HydrantFields,
) -> Result<HydrantRecord, sqlx::Error> {
    let entry = ledger::append(&mut *conn, NewEntry::Create(fields)).await?;

    sqlx::query_as::<_, HydrantRecord>(
        r#"
        INSERT INTO hydrants
            (history_id, hydrant, location, inspection_date, defects, checked_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, history_id, hydrant, location, inspection_date, defects, checked_by
        "#,
    )
    .bind(entry.id)
    .bind(fields.name())
    .bind(fields.location())
    .bind(fields.inspection_date())
    .bind(fields.defects())
    .bind(fields.checked_by())
    .fetch_one(conn)
    .await
}
