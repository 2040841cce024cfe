use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use stackset_core::error::StacksetError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. The body is always
/// `{"message": "..."}`, the same shape the action routes answer with.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(StacksetError::InvalidRequest(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<StacksetError>() {
            Some(e) => match e {
                StacksetError::StackSetNotFound(_) => StatusCode::NOT_FOUND,
                StacksetError::InvalidRequest(_)
                | StacksetError::InvalidCallAs(_)
                | StacksetError::InvalidStatusFilter(_)
                | StacksetError::InvalidRetryKind(_) => StatusCode::BAD_REQUEST,
                StacksetError::MissingRegion
                | StacksetError::NoOrganizationRoot
                | StacksetError::RootLookup(_)
                | StacksetError::ConfigNotFound(_)
                | StacksetError::Aws { .. }
                | StacksetError::Io(_)
                | StacksetError::Yaml(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "message": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
