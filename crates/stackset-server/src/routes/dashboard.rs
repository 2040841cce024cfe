use axum::extract::State;
use axum::Json;
use stackset_core::report::DashboardReport;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/stacksets: health of every ACTIVE stack set.
///
/// Instance listings are always re-fetched here; the page at `/` renders this.
pub async fn get_dashboard(State(app): State<AppState>) -> Result<Json<DashboardReport>, AppError> {
    let report = app.service.dashboard().await?;
    Ok(Json(report))
}
