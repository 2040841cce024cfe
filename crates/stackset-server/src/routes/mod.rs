pub mod accounts;
pub mod actions;
pub mod dashboard;
pub mod instances;

use crate::error::AppError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use stackset_core::selection::{ignore_set, IgnoreSet};

/// JSON body shared by every POST route.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSetRequest {
    pub stack_set_name: String,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub ignore_accounts: Vec<String>,
}

impl StackSetRequest {
    /// Unwrap the extractor result, turning malformed bodies and an empty
    /// stack set name into 400s with a JSON message.
    pub fn parse(body: Result<Json<Self>, JsonRejection>) -> Result<Self, AppError> {
        let Json(req) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
        if req.stack_set_name.trim().is_empty() {
            return Err(AppError::bad_request("stackSetName must not be empty"));
        }
        Ok(req)
    }

    pub fn ignore(&self) -> IgnoreSet {
        ignore_set(self.ignore_accounts.iter().cloned())
    }
}
