use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::json;
use stackset_core::types::RetryKind;
use stackset_core::Remediation;

use super::StackSetRequest;
use crate::error::AppError;
use crate::state::AppState;

/// POST /add_undeployed_accounts: deploy to organization accounts that have
/// no instance of the stack set yet.
pub async fn add_undeployed_accounts(
    State(app): State<AppState>,
    body: Result<Json<StackSetRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = StackSetRequest::parse(body)?;
    let outcome = app
        .service
        .add_undeployed_accounts(&req.stack_set_name, req.dry_run, &req.ignore())
        .await?;

    let body = match &outcome {
        Remediation::DryRun { targets } => json!({
            "message": "Dry run: following accounts would be added",
            "accounts": targets,
        }),
        Remediation::NothingFound => json!({
            "message": "Undeployed accounts added successfully.",
            "accounts": [],
        }),
        Remediation::Applied {
            targets,
            operation_ids,
        } => json!({
            "message": "Undeployed accounts added successfully.",
            "accounts": targets,
            "operationIds": operation_ids,
        }),
    };
    Ok(Json(body))
}

/// POST /remove_suspended_accounts: drop instances skipped because their
/// account is suspended or gone.
pub async fn remove_suspended_accounts(
    State(app): State<AppState>,
    body: Result<Json<StackSetRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = StackSetRequest::parse(body)?;
    let outcome = app
        .service
        .remove_suspended_accounts(&req.stack_set_name, req.dry_run, &req.ignore())
        .await?;

    let body = match &outcome {
        Remediation::NothingFound => json!({ "message": "No suspended accounts found." }),
        Remediation::DryRun { targets } => json!({
            "message": "Dry run: following accounts would be removed",
            "accounts": targets,
        }),
        Remediation::Applied {
            targets,
            operation_ids,
        } => json!({
            "message": "Suspended accounts removed successfully.",
            "accounts": targets,
            "operationIds": operation_ids,
        }),
    };
    Ok(Json(body))
}

async fn retry(
    app: AppState,
    body: Result<Json<StackSetRequest>, JsonRejection>,
    kind: RetryKind,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = StackSetRequest::parse(body)?;
    let outcome = app
        .service
        .retry_instances(&req.stack_set_name, kind, req.dry_run, &req.ignore())
        .await?;

    let body = match &outcome {
        Remediation::NothingFound => json!({
            "message": format!("No {kind} instances found."),
        }),
        Remediation::DryRun { targets } => json!({
            "message": "Dry run: following instances would be retried",
            "instances": targets,
        }),
        Remediation::Applied {
            targets,
            operation_ids,
        } => json!({
            "message": retried_message(kind),
            "instances": targets,
            "operationIds": operation_ids,
        }),
    };
    Ok(Json(body))
}

fn retried_message(kind: RetryKind) -> &'static str {
    match kind {
        RetryKind::Failed => "Failed instances retried successfully.",
        RetryKind::Drifted => "Drifted instances retried successfully.",
    }
}

/// POST /retry_failed_instances
pub async fn retry_failed_instances(
    State(app): State<AppState>,
    body: Result<Json<StackSetRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    retry(app, body, RetryKind::Failed).await
}

/// POST /retry_drifted_instances
pub async fn retry_drifted_instances(
    State(app): State<AppState>,
    body: Result<Json<StackSetRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    retry(app, body, RetryKind::Drifted).await
}
