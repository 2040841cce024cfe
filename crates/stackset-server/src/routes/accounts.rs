use axum::extract::State;
use axum::Json;
use stackset_core::model::OrganizationAccount;

use crate::error::AppError;
use crate::state::AppState;

/// GET /get_organization_accounts: every member account, sorted by name.
pub async fn get_organization_accounts(
    State(app): State<AppState>,
) -> Result<Json<Vec<OrganizationAccount>>, AppError> {
    let accounts = app.service.organization_accounts_by_name().await?;
    Ok(Json(accounts))
}
