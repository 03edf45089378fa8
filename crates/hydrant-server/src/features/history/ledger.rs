//! Append-only writes to the `history` ledger
//!
//! Ledger rows are only ever inserted, never updated or deleted. Callers pass
//! the connection of an open transaction so the entry commits or rolls back
//! together with the hydrant row it describes.

use sqlx::PgConnection;

use crate::models::{HistoryAction, HistoryEntry, HydrantFields};

/// A ledger entry about to be written.
///
/// The variants encode the linkage rules: only `Create` starts a lineage
/// without a predecessor, and only `Delete` carries no field snapshot.
#[derive(Debug, Clone, Copy)]
pub enum NewEntry<'a> {
    Create(&'a HydrantFields),
    Update { previous: i64, fields: &'a HydrantFields },
    Delete { previous: i64 },
}

impl NewEntry<'_> {
    pub fn action(&self) -> HistoryAction {
        match self {
            Self::Create(_) => HistoryAction::Create,
            Self::Update { .. } => HistoryAction::Update,
            Self::Delete { .. } => HistoryAction::Delete,
        }
    }

    pub fn previous(&self) -> Option<i64> {
        match self {
            Self::Create(_) => None,
            Self::Update { previous, .. } | Self::Delete { previous } => Some(*previous),
        }
    }

    fn snapshot(&self) -> Option<&HydrantFields> {
        match self {
            Self::Create(fields) | Self::Update { fields, .. } => Some(fields),
            Self::Delete { .. } => None,
        }
    }
}

/// Inserts one ledger entry and returns it with its assigned id.
pub async fn append(
    conn: &mut PgConnection,
    entry: NewEntry<'_>,
) -> Result<HistoryEntry, sqlx::Error> {
    let snapshot = entry.snapshot();

    let written = sqlx::query_as::<_, HistoryEntry>(
        r#"
        INSERT INTO history
            (action, previous_event_id, hydrant, location, inspection_date, defects, checked_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, action, previous_event_id, hydrant, location,
                  inspection_date, defects, checked_by
        "#,
    )
    .bind(entry.action().as_str())
    .bind(entry.previous())
    .bind(snapshot.map(HydrantFields::name))
    .bind(snapshot.map(HydrantFields::location))
    .bind(snapshot.and_then(HydrantFields::inspection_date))
    .bind(snapshot.and_then(HydrantFields::defects))
    .bind(snapshot.and_then(HydrantFields::checked_by))
    .fetch_one(conn)
    .await?;

    tracing::debug!(
        history_id = written.id,
        action = %written.action,
        previous_event_id = ?written.previous_event_id,
        "Ledger entry appended"
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn fields(name: &str) -> HydrantFields {
        HydrantFields::new(name, "Harbor Rd").unwrap()
    }

    #[test]
    fn test_new_entry_linkage() {
        let f = fields("H1");
        assert_eq!(NewEntry::Create(&f).previous(), None);
        assert_eq!(NewEntry::Update { previous: 4, fields: &f }.previous(), Some(4));
        assert_eq!(NewEntry::Delete { previous: 5 }.action(), HistoryAction::Delete);
        assert!(NewEntry::Delete { previous: 5 }.snapshot().is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_append_chain(pool: PgPool) -> sqlx::Result<()> {
        let mut conn = pool.acquire().await?;
        let f = fields("H1");

        let created = append(&mut conn, NewEntry::Create(&f)).await?;
        assert_eq!(created.action, HistoryAction::Create);
        assert_eq!(created.previous_event_id, None);
        assert_eq!(created.name.as_deref(), Some("H1"));
        assert_eq!(created.location.as_deref(), Some("Harbor Rd"));

        let deleted = append(&mut conn, NewEntry::Delete { previous: created.id }).await?;
        assert!(deleted.id > created.id);
        assert_eq!(deleted.previous_event_id, Some(created.id));
        assert_eq!(deleted.name, None);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_append_rejects_dangling_predecessor(pool: PgPool) -> sqlx::Result<()> {
        let mut conn = pool.acquire().await?;
        let f = fields("H1");

        let result = append(&mut conn, NewEntry::Update { previous: 999, fields: &f }).await;
        assert!(result.is_err());
        Ok(())
    }
}
