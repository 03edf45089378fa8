//! Update hydrant command
//!
//! Replaces every field of a live hydrant. The previous values stay in the
//! ledger; the new `update` entry points back at the entry it supersedes.

use mediator::Request;
use sqlx::{PgConnection, PgPool};

use crate::db;
use crate::features::history::ledger::{self, NewEntry};
use crate::models::{HydrantFields, HydrantRecord};

/// Command to overwrite a hydrant with a full field set
#[derive(Debug, Clone)]
pub struct UpdateHydrantCommand {
    pub id: i64,
    pub fields: HydrantFields,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateHydrantError {
    #[error("Hydrant with id: {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<HydrantRecord, UpdateHydrantError>> for UpdateHydrantCommand {}

/// Handles the update hydrant command
///
/// The hydrant row is locked before the ledger is written, so concurrent
/// updates of one hydrant chain one after another instead of branching.
///
/// # Errors
///
/// - `NotFound` - No hydrant with this id; the ledger is untouched
/// - `Database` - A write failed; nothing was committed
#[tracing::instrument(skip(pool, command), fields(hydrant_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateHydrantCommand,
) -> Result<HydrantRecord, UpdateHydrantError> {
    let mut tx = pool.begin().await?;

    let record = match replace(&mut tx, command.id, &command.fields).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            db::rollback(tx, "update_hydrant").await;
            return Err(UpdateHydrantError::NotFound(command.id));
        },
        Err(e) => {
            db::rollback(tx, "update_hydrant").await;
            return Err(e.into());
        },
    };

    tx.commit().await?;

    tracing::info!(
        hydrant_id = record.id,
        history_id = record.history_id,
        "Hydrant updated"
    );

    Ok(record)
}

async fn replace(
    conn: &mut PgConnection,
    id: i64,
    fields: &HydrantFields,
) -> Result<Option<HydrantRecord>, sqlx::Error> {
    let current: Option<i64> =
        sqlx::query_scalar("SELECT history_id FROM hydrants WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    let Some(previous) = current else {
        return Ok(None);
    };

    let entry = ledger::append(&mut *conn, NewEntry::Update { previous, fields }).await?;

    let record = sqlx::query_as::<_, HydrantRecord>(
        r#"
        UPDATE hydrants
        SET history_id = $2, hydrant = $3, location = $4,
            inspection_date = $5, defects = $6, checked_by = $7
        WHERE id = $1
        RETURNING id, history_id, hydrant, location, inspection_date, defects, checked_by
        "#,
    )
    .bind(id)
    .bind(entry.id)
    .bind(fields.name())
    .bind(fields.location())
    .bind(fields.inspection_date())
    .bind(fields.defects())
    .bind(fields.checked_by())
    .fetch_one(conn)
    .await?;

    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::hydrants::commands::create::{self, CreateHydrantCommand};
    use crate::models::{HistoryAction, HistoryEntry};

    async fn ledger_count(pool: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM history").fetch_one(pool).await
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_update_chains_to_previous_entry(pool: PgPool) -> sqlx::Result<()> {
        let created = create::handle(
            pool.clone(),
            CreateHydrantCommand {
                fields: HydrantFields::new("H1", "Mill Lane").unwrap(),
            },
        )
        .await
        .unwrap();

        let fields = HydrantFields::new("H1-updated", "Mill Lane")
            .unwrap()
            .with_defects(Some("Leaking valve".to_string()))
            .unwrap();
        let updated = handle(
            pool.clone(),
            UpdateHydrantCommand {
                id: created.id,
                fields: fields.clone(),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_ne!(updated.history_id, created.history_id);
        assert!(updated.matches(&fields));

        let entry = sqlx::query_as::<_, HistoryEntry>(
            "SELECT id, action, previous_event_id, hydrant, location, inspection_date, defects, checked_by
             FROM history WHERE id = $1",
        )
        .bind(updated.history_id)
        .fetch_one(&pool)
        .await?;
        assert_eq!(entry.action, HistoryAction::Update);
        assert_eq!(entry.previous_event_id, Some(created.history_id));
        assert_eq!(entry.name.as_deref(), Some("H1-updated"));
        assert_eq!(entry.defects.as_deref(), Some("Leaking valve"));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_update_missing_is_not_found(pool: PgPool) -> sqlx::Result<()> {
        let before = ledger_count(&pool).await?;

        let result = handle(
            pool.clone(),
            UpdateHydrantCommand {
                id: 4242,
                fields: HydrantFields::new("H1", "Nowhere").unwrap(),
            },
        )
        .await;

        assert!(matches!(result, Err(UpdateHydrantError::NotFound(4242))));
        assert_eq!(ledger_count(&pool).await?, before);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_failed_update_keeps_prior_record(pool: PgPool) -> sqlx::Result<()> {
        let original = HydrantFields::new("H1", "Mill Lane")
            .unwrap()
            .with_checked_by(Some("Avery".to_string()))
            .unwrap();
        let created = create::handle(
            pool.clone(),
            CreateHydrantCommand {
                fields: original.clone(),
            },
        )
        .await
        .unwrap();
        let before = ledger_count(&pool).await?;

        // The ledger append succeeds; the row update that follows it does not.
        sqlx::query("ALTER TABLE hydrants ADD CONSTRAINT no_rejected CHECK (hydrant <> 'H-rejected')")
            .execute(&pool)
            .await?;

        let result = handle(
            pool.clone(),
            UpdateHydrantCommand {
                id: created.id,
                fields: HydrantFields::new("H-rejected", "Elsewhere").unwrap(),
            },
        )
        .await;
        assert!(matches!(result, Err(UpdateHydrantError::Database(_))));

        let stored = sqlx::query_as::<_, HydrantRecord>(
            "SELECT id, history_id, hydrant, location, inspection_date, defects, checked_by
             FROM hydrants WHERE id = $1",
        )
        .bind(created.id)
        .fetch_one(&pool)
        .await?;
        assert_eq!(stored.history_id, created.history_id);
        assert!(stored.matches(&original));
        assert_eq!(ledger_count(&pool).await?, before);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_concurrent_updates_form_a_single_chain(pool: PgPool) -> sqlx::Result<()> {
        let created = create::handle(
            pool.clone(),
            CreateHydrantCommand {
                fields: HydrantFields::new("H1", "Mill Lane").unwrap(),
            },
        )
        .await
        .unwrap();

        let updates = (0..4).map(|i| {
            handle(
                pool.clone(),
                UpdateHydrantCommand {
                    id: created.id,
                    fields: HydrantFields::new(format!("H1-rev{i}"), "Mill Lane").unwrap(),
                },
            )
        });
        for result in futures::future::join_all(updates).await {
            assert!(result.is_ok());
        }

        let predecessors: Vec<Option<i64>> = sqlx::query_scalar(
            "SELECT previous_event_id FROM history WHERE action = 'update' ORDER BY id",
        )
        .fetch_all(&pool)
        .await?;
        let mut distinct = predecessors.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), predecessors.len());
        Ok(())
    }
}
