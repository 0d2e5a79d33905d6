// src/models/submission.rs
//
// Transient judge DTOs. A submission exists only for the duration of one
// request; only the aggregate run statistics are logged (see SubmissionRun).

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Redacted placeholder returned for hidden test cases.
pub const HIDDEN_PLACEHOLDER: &str = "Hidden";

/// Body of POST /api/execute: judge one test case.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub code: String,
    pub language: String,
    pub question_id: i64,
    pub test_case_index: usize,
    /// Optional raw input overriding the test case's stored input.
    #[serde(default)]
    pub input: Option<String>,
    /// Permits judging in a language other than the question's declared one.
    /// Logged as a warning when used.
    #[serde(default)]
    pub allow_language_override: bool,
}

/// Body of POST /api/run-tests: judge every test case of a question.
/// The language is implied by the question.
#[derive(Debug, Deserialize)]
pub struct RunTestsRequest {
    pub code: String,
    pub question_id: i64,
}

/// Outcome of judging one test case.
#[derive(Debug, Clone, Serialize)]
pub struct TestCaseVerdict {
    pub test_case_index: usize,
    pub passed: bool,
    pub output: String,
    pub expected: String,
    pub input: String,
    #[serde(skip_serializing_if = "is_false")]
    pub error: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl TestCaseVerdict {
    /// Replaces the sensitive fields with the literal "Hidden". The real
    /// values were already used for the pass/fail comparison.
    pub fn redacted(mut self) -> Self {
        self.input = HIDDEN_PLACEHOLDER.to_string();
        self.expected = HIDDEN_PLACEHOLDER.to_string();
        self
    }
}

/// Aggregate of a run-all-tests call.
#[derive(Debug, Serialize)]
pub struct SubmitAllResult {
    /// 0-100; `floor(100 / total) * passed`.
    pub score: f64,
    pub passed_tests: u32,
    pub total_tests: u32,
    pub results: Vec<TestCaseVerdict>,
}

/// Represents the append-only 'submission_runs' table: one row per
/// run-all-tests call, across all users.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionRun {
    pub id: Uuid,
    pub question_id: i64,
    pub total_tests: i32,
    pub passed_tests: i32,
    pub score: i32,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Aggregate view over the submission log, derived on read.
#[derive(Debug, FromRow, Serialize)]
pub struct QuestionStats {
    pub total_test_cases: i64,
    pub passed_test_cases: i64,
    pub score: i64,
    pub runs: i64,
}
