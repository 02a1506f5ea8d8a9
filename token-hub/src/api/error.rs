//! Mapping of repository failures and request validation errors onto HTTP
//! responses.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::error::Error as _;
use token_hub_core::{ErrorKind, RepositoryError, StoreError};

const VALIDATION_CODE: &str = "VALIDATION_ERROR";
const PAYLOAD_TOO_LARGE_CODE: &str = "PAYLOAD_TOO_LARGE";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum ApiError {
    Repository(RepositoryError),
    Store(StoreError),
    /// Malformed request payload or parameters.
    Validation(String),
    /// Body rejected by an extractor with its own status, e.g. an oversized
    /// multipart upload.
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Repository(e) => Some(e.kind()),
            ApiError::Store(e) => Some(e.kind()),
            ApiError::Validation(_) | ApiError::Rejected { .. } => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        if let ApiError::Rejected { status, .. } = self {
            return *status;
        }
        match self.kind() {
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::Read) | Some(ErrorKind::Write) => StatusCode::INTERNAL_SERVER_ERROR,
            Some(ErrorKind::OutOfRange) | None => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Rejected { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                PAYLOAD_TOO_LARGE_CODE
            }
            _ => self.kind().map_or(VALIDATION_CODE, |kind| kind.as_str()),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Repository(e) => format!("{e}: {}", e.source),
            ApiError::Store(e) => e.to_string(),
            ApiError::Validation(message) | ApiError::Rejected { message, .. } => message.clone(),
        }
    }

    /// Full cause chain, for the server log only.
    fn detail(&self) -> String {
        let mut detail = self.message();
        let mut source = match self {
            ApiError::Repository(e) => e.source.source(),
            ApiError::Store(e) => e.source(),
            ApiError::Validation(_) | ApiError::Rejected { .. } => None,
        };
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        detail
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Repository(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        tracing::warn!(status = status.as_u16(), code, "{}", self.detail());
        (
            status,
            Json(ErrorResponse {
                error: self.message(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn store_kinds_map_to_statuses() {
        let not_found = ApiError::from(StoreError::NotFound {
            path: PathBuf::from("uploaded.csv"),
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.code(), "NOT_FOUND");

        let out_of_range = ApiError::from(StoreError::OutOfRange {
            path: PathBuf::from("uploaded.csv"),
            index: 9,
            len: 2,
        });
        assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);
        assert_eq!(out_of_range.code(), "OUT_OF_RANGE");

        let write = ApiError::from(StoreError::Write {
            path: PathBuf::from("uploaded.csv"),
            source: std::io::Error::other("disk full").into(),
        });
        assert_eq!(write.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(write.code(), "WRITE_ERROR");
        assert!(write.detail().ends_with("disk full"));
    }

    #[test]
    fn rejected_keeps_extractor_status() {
        let too_large = ApiError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "Request payload is too large".into(),
        };
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_large.code(), "PAYLOAD_TOO_LARGE");

        let bad = ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: "bad boundary".into(),
        };
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        assert_eq!(bad.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn repository_message_names_operation_and_file_once() {
        let repo = token_hub_core::TokenRepository::new(token_hub_core::CsvStore::new(
            "/nonexistent-dir/uploaded.csv",
        ));
        let err = ApiError::from(repo.list_all().unwrap_err());
        let message = err.message();
        assert!(message.starts_with("list all tokens failed: "));
        assert_eq!(message.matches("uploaded.csv").count(), 1);
        assert_eq!(err.detail(), message);
    }

    #[test]
    fn validation_is_bad_request() {
        let err = ApiError::validation("missing line");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
