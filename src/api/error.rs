//! Mapping from service errors to HTTP responses.

use crate::task::services::TaskLifecycleError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

const NOT_FOUND_DETAIL: &str = "Not found.";
const INTERNAL_DETAIL: &str = "Internal server error.";

/// Error returned by HTTP handlers.
///
/// Bodies have the shape `{"detail": <message>}`. State policy and
/// validation failures are client errors carrying the domain message
/// verbatim; storage failures are logged and reported generically.
#[derive(Debug)]
pub enum ApiError {
    /// The lifecycle service rejected or failed the request.
    Service(TaskLifecycleError),
    /// A task identifier in the path or body is not a UUID, so no task can
    /// match it.
    MalformedId(String),
}

impl ApiError {
    /// Returns the HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Service(TaskLifecycleError::Domain(_)) => StatusCode::BAD_REQUEST,
            Self::Service(TaskLifecycleError::NotFound(_)) | Self::MalformedId(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Service(TaskLifecycleError::Repository(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        Self::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Self::Service(TaskLifecycleError::Domain(err)) => err.to_string(),
            Self::Service(TaskLifecycleError::NotFound(_)) => NOT_FOUND_DETAIL.to_owned(),
            Self::MalformedId(raw) => {
                debug!(id = %raw, "malformed task identifier");
                NOT_FOUND_DETAIL.to_owned()
            }
            Self::Service(TaskLifecycleError::Repository(err)) => {
                error!(error = %err, "task repository failure");
                INTERNAL_DETAIL.to_owned()
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
