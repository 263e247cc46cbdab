//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::domain::OperationContext;
use crate::error::{AppError, AppResult};
use crate::handlers::{AddExpenseRecordHandler, AddRecordError, ListRecordsHandler, RecordResult};
use crate::identity::CallerIdentity;
use crate::state::AppState;

use super::extract::SubmittedFields;

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new().route("/records", post(add_record).get(list_records))
}

/// HTTP status for a rejected submission
pub fn status_for(error: &AddRecordError) -> StatusCode {
    match error {
        AddRecordError::Invalid(_) => StatusCode::BAD_REQUEST,
        AddRecordError::Unauthenticated => StatusCode::UNAUTHORIZED,
        AddRecordError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =========================================================================
// POST /records
// =========================================================================

/// Add an expense record from a submitted form
async fn add_record(
    State(state): State<AppState>,
    identity: Option<Extension<CallerIdentity>>,
    context: Option<Extension<OperationContext>>,
    SubmittedFields(fields): SubmittedFields,
) -> (StatusCode, Json<RecordResult>) {
    let context = context.map(|Extension(ctx)| ctx).unwrap_or_default();
    let identity = identity.map(|Extension(identity)| identity);

    let handler = AddExpenseRecordHandler::new(&state);

    match handler.execute(&fields, identity.as_ref(), &context).await {
        Ok(data) => (StatusCode::CREATED, Json(RecordResult::success(data))),
        Err(e) => (status_for(&e), Json(RecordResult::failure(e.to_string()))),
    }
}

// =========================================================================
// GET /records
// =========================================================================

/// List the caller's expense records
async fn list_records(
    State(state): State<AppState>,
    identity: Option<Extension<CallerIdentity>>,
) -> AppResult<Json<Value>> {
    let Some(Extension(identity)) = identity else {
        return Err(AppError::Unauthenticated);
    };

    let view = ListRecordsHandler::new(&state)
        .execute(identity.external_id())
        .await?;

    Ok(Json(view))
}
