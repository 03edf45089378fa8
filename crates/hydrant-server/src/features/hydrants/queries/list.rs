//! List live hydrants

use mediator::Request;
use sqlx::PgPool;

use crate::models::HydrantRecord;

/// Query for every live hydrant, newest first
#[derive(Debug, Clone, Default)]
pub struct ListHydrantsQuery;

#[derive(Debug, thiserror::Error)]
pub enum ListHydrantsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<HydrantRecord>, ListHydrantsError>> for ListHydrantsQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    _query: ListHydrantsQuery,
) -> Result<Vec<HydrantRecord>, ListHydrantsError> {
    let records = sqlx::query_as::<_, HydrantRecord>(
        r#"
        SELECT id, history_id, hydrant, location, inspection_date, defects, checked_by
        FROM hydrants
        ORDER BY id DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::hydrants::commands::create::{self, CreateHydrantCommand};
    use crate::models::HydrantFields;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_list_newest_first(pool: PgPool) -> sqlx::Result<()> {
        for name in ["H1", "H2", "H3"] {
            create::handle(
                pool.clone(),
                CreateHydrantCommand {
                    fields: HydrantFields::new(name, "Canal St").unwrap(),
                },
            )
            .await
            .unwrap();
        }

        let records = handle(pool, ListHydrantsQuery).await.unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["H3", "H2", "H1"]);
        assert!(records.windows(2).all(|w| w[0].id > w[1].id));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_list_empty(pool: PgPool) -> sqlx::Result<()> {
        assert!(handle(pool, ListHydrantsQuery).await.unwrap().is_empty());
        Ok(())
    }
}
