//! Hydrant API routes
//!
//! # Route Structure
//!
//! - `GET /api/hydrants` - List live hydrants, newest first
//! - `POST /api/hydrants` - Register a hydrant
//! - `PUT /api/hydrants/:id` - Replace every field of a hydrant
//! - `DELETE /api/hydrants/:id` - Delete a hydrant
//! - `GET /api/hydrants/:id/history` - Ledger chain of one hydrant
//!
//! Bodies are validated here, before any command runs. Validation failures
//! list every offending field under `error.details.fields`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use std::future::Future;

use super::{
    commands::{
        CreateHydrantCommand, CreateHydrantError, DeleteHydrantCommand, DeleteHydrantError,
        UpdateHydrantCommand, UpdateHydrantError,
    },
    queries::{GetLineageError, GetLineageQuery, ListHydrantsError, ListHydrantsQuery},
    types::HydrantPayload,
};
use crate::api::response::ErrorResponse;
use crate::features::shared::validation::{parse_id, ValidationErrors};

// ============================================================================
// Router Configuration
// ============================================================================

pub fn hydrants_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_hydrants).post(create_hydrant))
        .route("/:id", axum::routing::put(update_hydrant).delete(delete_hydrant))
        .route("/:id/history", get(get_lineage))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// `POST /api/hydrants`
///
/// - `201 Created` - Body is the stored record including its id
/// - `400 Bad Request` - Malformed JSON or invalid fields
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(pool, payload))]
async fn create_hydrant(
    State(pool): State<PgPool>,
    payload: Result<Json<HydrantPayload>, JsonRejection>,
) -> Result<Response, HydrantApiError> {
    let fields = parse_body(payload)?;

    let record =
        run_detached(super::commands::create::handle(pool, CreateHydrantCommand { fields })).await?;

    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// `PUT /api/hydrants/:id`
///
/// - `200 OK` - Body is the updated record
/// - `400 Bad Request` - Invalid id or fields
/// - `404 Not Found` - No live hydrant with this id
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(pool, payload))]
async fn update_hydrant(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    payload: Result<Json<HydrantPayload>, JsonRejection>,
) -> Result<Response, HydrantApiError> {
    let id = parse_id(&id)?;
    let fields = parse_body(payload)?;

    let record =
        run_detached(super::commands::update::handle(pool, UpdateHydrantCommand { id, fields }))
            .await?;

    Ok((StatusCode::OK, Json(record)).into_response())
}

/// `DELETE /api/hydrants/:id`
///
/// - `200 OK` - `{"message": "Hydrant deleted", "id": <id>}`
/// - `400 Bad Request` - Invalid id
/// - `404 Not Found` - No live hydrant with this id
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(pool))]
async fn delete_hydrant(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Response, HydrantApiError> {
    let id = parse_id(&id)?;

    let response =
        run_detached(super::commands::delete::handle(pool, DeleteHydrantCommand { id })).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Hydrant deleted", "id": response.id })),
    )
        .into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// `GET /api/hydrants`
#[tracing::instrument(skip(pool))]
async fn list_hydrants(State(pool): State<PgPool>) -> Result<Response, HydrantApiError> {
    let records = super::queries::list::handle(pool, ListHydrantsQuery).await?;
    Ok((StatusCode::OK, Json(records)).into_response())
}

/// `GET /api/hydrants/:id/history`
///
/// - `200 OK` - Ledger entries newest first, ending with the `create` entry
/// - `404 Not Found` - No live hydrant with this id
#[tracing::instrument(skip(pool))]
async fn get_lineage(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Response, HydrantApiError> {
    let id = parse_id(&id)?;
    let entries = super::queries::lineage::handle(pool, GetLineageQuery { id }).await?;
    Ok((StatusCode::OK, Json(entries)).into_response())
}

/// Runs a write on its own task so a client disconnect cannot cancel it
/// between statements.
async fn run_detached<T, E>(
    command: impl Future<Output = Result<T, E>> + Send + 'static,
) -> Result<T, HydrantApiError>
where
    T: Send + 'static,
    E: Send + 'static,
    HydrantApiError: From<E>,
{
    match tokio::spawn(command).await {
        Ok(result) => result.map_err(HydrantApiError::from),
        Err(e) => Err(HydrantApiError::Aborted(e)),
    }
}

fn parse_body(
    payload: Result<Json<HydrantPayload>, JsonRejection>,
) -> Result<crate::models::HydrantFields, HydrantApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        HydrantApiError::Validation(ValidationErrors::single("body", rejection.body_text()))
    })?;
    Ok(payload.validate()?)
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for hydrant API endpoints
#[derive(Debug)]
enum HydrantApiError {
    Validation(ValidationErrors),
    CreateError(CreateHydrantError),
    UpdateError(UpdateHydrantError),
    DeleteError(DeleteHydrantError),
    ListError(ListHydrantsError),
    LineageError(GetLineageError),
    Aborted(tokio::task::JoinError),
}

impl From<ValidationErrors> for HydrantApiError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err)
    }
}

impl From<CreateHydrantError> for HydrantApiError {
    fn from(err: CreateHydrantError) -> Self {
        Self::CreateError(err)
    }
}

impl From<UpdateHydrantError> for HydrantApiError {
    fn from(err: UpdateHydrantError) -> Self {
        Self::UpdateError(err)
    }
}

impl From<DeleteHydrantError> for HydrantApiError {
    fn from(err: DeleteHydrantError) -> Self {
        Self::DeleteError(err)
    }
}

impl From<ListHydrantsError> for HydrantApiError {
    fn from(err: ListHydrantsError) -> Self {
        Self::ListError(err)
    }
}

impl From<GetLineageError> for HydrantApiError {
    fn from(err: GetLineageError) -> Self {
        Self::LineageError(err)
    }
}

fn not_found(message: String) -> Response {
    let error = ErrorResponse::new("NOT_FOUND", message);
    (StatusCode::NOT_FOUND, Json(error)).into_response()
}

fn internal(operation: &str, err: &sqlx::Error) -> Response {
    tracing::error!(operation, error = %err, "Database error during hydrant request");
    let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}

impl IntoResponse for HydrantApiError {
    fn into_response(self) -> Response {
        match self {
            HydrantApiError::Validation(errors) => {
                let error = ErrorResponse::with_details(
                    "VALIDATION_ERROR",
                    errors.to_string(),
                    json!({ "fields": errors }),
                );
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },

            HydrantApiError::UpdateError(err @ UpdateHydrantError::NotFound(_)) => {
                not_found(err.to_string())
            },
            HydrantApiError::DeleteError(err @ DeleteHydrantError::NotFound(_)) => {
                not_found(err.to_string())
            },
            HydrantApiError::LineageError(err @ GetLineageError::NotFound(_)) => {
                not_found(err.to_string())
            },

            HydrantApiError::CreateError(CreateHydrantError::Database(e)) => internal("create", &e),
            HydrantApiError::UpdateError(UpdateHydrantError::Database(e)) => internal("update", &e),
            HydrantApiError::DeleteError(DeleteHydrantError::Database(e)) => internal("delete", &e),
            HydrantApiError::ListError(ListHydrantsError::Database(e)) => internal("list", &e),
            HydrantApiError::LineageError(GetLineageError::Database(e)) => {
                internal("lineage", &e)
            },
            HydrantApiError::Aborted(e) => {
                tracing::error!(error = %e, "Hydrant write task did not complete");
                let error = ErrorResponse::new("INTERNAL_ERROR", "The request could not be completed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}
