use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::json;
use stackset_core::types::InstanceStatusFilter;

use super::StackSetRequest;
use crate::error::AppError;
use crate::state::AppState;

async fn list_matching(
    app: AppState,
    body: Result<Json<StackSetRequest>, JsonRejection>,
    filter: InstanceStatusFilter,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = StackSetRequest::parse(body)?;
    let instances = app
        .service
        .instances(&req.stack_set_name, filter, &req.ignore())
        .await?;

    if instances.is_empty() {
        return Ok(Json(json!({
            "message": format!("No {} instances found.", filter.label()),
        })));
    }
    Ok(Json(json!({ "instances": instances })))
}

/// POST /get_in_sync_instances
pub async fn get_in_sync_instances(
    State(app): State<AppState>,
    body: Result<Json<StackSetRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    list_matching(app, body, InstanceStatusFilter::InSync).await
}

/// POST /get_drifted_instances
pub async fn get_drifted_instances(
    State(app): State<AppState>,
    body: Result<Json<StackSetRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    list_matching(app, body, InstanceStatusFilter::Drifted).await
}

/// POST /get_succeeded_instances
pub async fn get_succeeded_instances(
    State(app): State<AppState>,
    body: Result<Json<StackSetRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    list_matching(app, body, InstanceStatusFilter::Succeeded).await
}

/// POST /get_failed_instances
pub async fn get_failed_instances(
    State(app): State<AppState>,
    body: Result<Json<StackSetRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    list_matching(app, body, InstanceStatusFilter::Failed).await
}

/// POST /get_skipped_suspended_account_instances
pub async fn get_skipped_suspended_account_instances(
    State(app): State<AppState>,
    body: Result<Json<StackSetRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    list_matching(app, body, InstanceStatusFilter::SkippedSuspendedAccount).await
}
