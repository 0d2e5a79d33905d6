// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes the judging error taxonomy and its mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 400 Bad Request
    InvalidInput(String),
    UnsupportedLanguage(String),
    LanguageMismatch(String),
    AnswerCountMismatch(String),
    MalformedQuestion(String),

    // 404 Not Found
    QuestionNotFound(String),
    TestCaseNotFound(String),

    // 408 Request Timeout (polling ceiling exhausted)
    ExecutionTimeout(String),

    // 429 Too Many Requests (remote backend rate limit, surfaced as-is)
    TooManyRequests(String),

    // 503 Service Unavailable (remote backend unreachable)
    ServiceUnavailable(String),

    // 500 Internal Server Error
    ConfigurationError(String),
    Internal(String),
}

impl AppError {
    /// Machine-readable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::UnsupportedLanguage(_) => "unsupported_language",
            AppError::LanguageMismatch(_) => "language_mismatch",
            AppError::AnswerCountMismatch(_) => "answer_count_mismatch",
            AppError::MalformedQuestion(_) => "malformed_question",
            AppError::QuestionNotFound(_) => "question_not_found",
            AppError::TestCaseNotFound(_) => "test_case_not_found",
            AppError::ExecutionTimeout(_) => "execution_timeout",
            AppError::TooManyRequests(_) => "too_many_requests",
            AppError::ServiceUnavailable(_) => "service_unavailable",
            AppError::ConfigurationError(_) => "configuration_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Human-readable details carried by the variant.
    pub fn details(&self) -> &str {
        match self {
            AppError::InvalidInput(msg)
            | AppError::UnsupportedLanguage(msg)
            | AppError::LanguageMismatch(msg)
            | AppError::AnswerCountMismatch(msg)
            | AppError::MalformedQuestion(msg)
            | AppError::QuestionNotFound(msg)
            | AppError::TestCaseNotFound(msg)
            | AppError::ExecutionTimeout(msg)
            | AppError::TooManyRequests(msg)
            | AppError::ServiceUnavailable(msg)
            | AppError::ConfigurationError(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
/// Internal details are logged, never surfaced to clients.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            AppError::InvalidInput(msg)
            | AppError::UnsupportedLanguage(msg)
            | AppError::LanguageMismatch(msg)
            | AppError::AnswerCountMismatch(msg)
            | AppError::MalformedQuestion(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::QuestionNotFound(msg) | AppError::TestCaseNotFound(msg) => {
                (StatusCode::NOT_FOUND, msg.clone())
            }
            AppError::ExecutionTimeout(msg) => (StatusCode::REQUEST_TIMEOUT, msg.clone()),
            AppError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::ConfigurationError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service is misconfigured".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": self.kind(),
            "details": details,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::Internal`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Classifies transport errors at the execution-backend client boundary.
/// Raw reqwest errors never leak past this conversion.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            AppError::ServiceUnavailable(format!("Execution backend unreachable: {}", err))
        } else if err.is_decode() {
            AppError::Internal(format!("Execution backend returned malformed body: {}", err))
        } else {
            AppError::ServiceUnavailable(err.to_string())
        }
    }
}
