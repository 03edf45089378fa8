//! History API routes
//!
//! - `GET /api/history` - Every ledger entry in insertion order

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use super::queries::{ListHistoryError, ListHistoryQuery};
use crate::api::response::ErrorResponse;

pub fn history_routes() -> Router<PgPool> {
    Router::new().route("/", get(list_history))
}

#[tracing::instrument(skip(pool))]
async fn list_history(State(pool): State<PgPool>) -> Result<Response, HistoryApiError> {
    let entries = super::queries::list::handle(pool, ListHistoryQuery).await?;
    Ok((StatusCode::OK, Json(entries)).into_response())
}

#[derive(Debug)]
enum HistoryApiError {
    ListError(ListHistoryError),
}

impl From<ListHistoryError> for HistoryApiError {
    fn from(err: ListHistoryError) -> Self {
        Self::ListError(err)
    }
}

impl IntoResponse for HistoryApiError {
    fn into_response(self) -> Response {
        match self {
            HistoryApiError::ListError(ListHistoryError::Database(e)) => {
                tracing::error!(error = %e, "Database error while listing history");
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}
