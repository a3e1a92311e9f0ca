use super::dto::ErrorResponse;
use crate::error::{AssessmentError, CatalogError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Invalid or missing admin key")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::SessionNotFound => (StatusCode::NOT_FOUND, "session_not_found"),
            ApiError::PageNotFound(_) => (StatusCode::NOT_FOUND, "page_not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Assessment(e) => match e {
                AssessmentError::UnknownAnswer(_) | AssessmentError::AnswerCountMismatch { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_answers")
                }
                AssessmentError::AlreadyComplete | AssessmentError::Incomplete { .. } => {
                    (StatusCode::CONFLICT, "assessment_state")
                }
                AssessmentError::NoQuestions => {
                    (StatusCode::SERVICE_UNAVAILABLE, "assessment_unavailable")
                }
                AssessmentError::UnknownCategory(_)
                | AssessmentError::UnmappedQuestionCategory { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "assessment_misconfigured")
                }
            },
            ApiError::Catalog(_) => (StatusCode::BAD_REQUEST, "invalid_filter"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!("Request failed ({}): {:#}", status, self);
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::SessionNotFound, StatusCode::NOT_FOUND),
            (
                ApiError::Assessment(AssessmentError::UnknownAnswer("x".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::Assessment(AssessmentError::AlreadyComplete),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Assessment(AssessmentError::UnknownCategory("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
