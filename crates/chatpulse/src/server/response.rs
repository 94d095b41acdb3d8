use crate::prelude::*;
use crate::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// JSON envelope of a failed job
#[derive(Debug, Serialize)]
pub(super) struct JobError {
    #[serde(skip)]
    status: StatusCode,

    error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl JobError {
    pub(super) fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }

    pub(super) fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<Error> for JobError {
    fn from(err: Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.message())
    }
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        debug!(status = %self.status, error = %self.error, "Responding with an error");
        (self.status, Json(self)).into_response()
    }
}
