//! Delete hydrant command
//!
//! Appends a terminal `delete` entry to the hydrant's lineage and removes the
//! live row. The ledger keeps every earlier entry.

use mediator::Request;
use sqlx::{PgConnection, PgPool};

use crate::db;
use crate::features::history::ledger::{self, NewEntry};

#[derive(Debug, Clone)]
pub struct DeleteHydrantCommand {
    pub id: i64,
}

/// Response from deleting a hydrant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteHydrantResponse {
    pub id: i64,
    /// Id of the `delete` ledger entry
    pub history_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteHydrantError {
    #[error("Hydrant with id: {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteHydrantResponse, DeleteHydrantError>> for DeleteHydrantCommand {}

/// Handles the delete hydrant command
///
/// # Errors
///
/// - `NotFound` - No hydrant with this id; the ledger is untouched
/// - `Database` - A write failed; the hydrant is still live
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    command: DeleteHydrantCommand,
) -> Result<DeleteHydrantResponse, DeleteHydrantError> {
    let mut tx = pool.begin().await?;

    let response = match remove(&mut tx, command.id).await {
        Ok(Some(response)) => response,
        Ok(None) => {
            db::rollback(tx, "delete_hydrant").await;
            return Err(DeleteHydrantError::NotFound(command.id));
        },
        Err(e) => {
            db::rollback(tx, "delete_hydrant").await;
            return Err(e.into());
        },
    };

    tx.commit().await?;

    tracing::info!(
        hydrant_id = response.id,
        history_id = response.history_id,
        "Hydrant deleted"
    );

    Ok(response)
}

async fn remove(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<DeleteHydrantResponse>, sqlx::Error> {
    let current: Option<i64> =
        sqlx::query_scalar("SELECT history_id FROM hydrants WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    let Some(previous) = current else {
        return Ok(None);
    };

    let entry = ledger::append(&mut *conn, NewEntry::Delete { previous }).await?;

    sqlx::query("DELETE FROM hydrants WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(Some(DeleteHydrantResponse {
        id,
        history_id: entry.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::hydrants::commands::create::{self, CreateHydrantCommand};
    use crate::models::HydrantFields;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete_appends_terminal_entry(pool: PgPool) -> sqlx::Result<()> {
        let created = create::handle(
            pool.clone(),
            CreateHydrantCommand {
                fields: HydrantFields::new("H1", "Mill Lane").unwrap(),
            },
        )
        .await
        .unwrap();

        let response = handle(pool.clone(), DeleteHydrantCommand { id: created.id })
            .await
            .unwrap();
        assert_eq!(response.id, created.id);

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hydrants")
            .fetch_one(&pool)
            .await?;
        assert_eq!(remaining, 0);

        let (action, previous, name): (String, Option<i64>, Option<String>) = sqlx::query_as(
            "SELECT action, previous_event_id, hydrant FROM history WHERE id = $1",
        )
        .bind(response.history_id)
        .fetch_one(&pool)
        .await?;
        assert_eq!(action, "delete");
        assert_eq!(previous, Some(created.history_id));
        assert_eq!(name, None);

        let ledger: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history")
            .fetch_one(&pool)
            .await?;
        assert_eq!(ledger, 2);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete_missing_is_not_found(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool.clone(), DeleteHydrantCommand { id: 77 }).await;
        assert!(matches!(result, Err(DeleteHydrantError::NotFound(77))));

        let ledger: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history")
            .fetch_one(&pool)
            .await?;
        assert_eq!(ledger, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_failed_delete_keeps_record(pool: PgPool) -> sqlx::Result<()> {
        let created = create::handle(
            pool.clone(),
            CreateHydrantCommand {
                fields: HydrantFields::new("H1", "Mill Lane").unwrap(),
            },
        )
        .await
        .unwrap();

        // The ledger append succeeds; the row delete that follows it does not.
        sqlx::query(
            "CREATE FUNCTION refuse_delete() RETURNS trigger LANGUAGE plpgsql AS $$
             BEGIN RAISE EXCEPTION 'hydrant deletes are blocked'; END $$",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE TRIGGER refuse_delete BEFORE DELETE ON hydrants
             FOR EACH ROW EXECUTE FUNCTION refuse_delete()",
        )
        .execute(&pool)
        .await?;

        let result = handle(pool.clone(), DeleteHydrantCommand { id: created.id }).await;
        assert!(matches!(result, Err(DeleteHydrantError::Database(_))));

        let (history_id, name): (i64, String) =
            sqlx::query_as("SELECT history_id, hydrant FROM hydrants WHERE id = $1")
                .bind(created.id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(history_id, created.history_id);
        assert_eq!(name, "H1");

        let ledger: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history")
            .fetch_one(&pool)
            .await?;
        assert_eq!(ledger, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_second_delete_is_not_found(pool: PgPool) -> sqlx::Result<()> {
        let created = create::handle(
            pool.clone(),
            CreateHydrantCommand {
                fields: HydrantFields::new("H1", "Mill Lane").unwrap(),
            },
        )
        .await
        .unwrap();

        handle(pool.clone(), DeleteHydrantCommand { id: created.id }).await.unwrap();
        let again = handle(pool.clone(), DeleteHydrantCommand { id: created.id }).await;
        assert!(matches!(again, Err(DeleteHydrantError::NotFound(_))));
        Ok(())
    }
}
