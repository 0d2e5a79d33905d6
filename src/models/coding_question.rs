// src/models/coding_question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::judge::backend::ResourceLimits;

/// One test case of a coding question. Hidden cases are judged against their
/// real values but redacted in anything returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub is_hidden: bool,
}

/// Represents the 'coding_questions' table in the database.
/// Created by admin tooling; read-only during judging.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CodingQuestion {
    pub id: i64,
    pub title: String,
    pub description: String,

    /// 'Easy', 'Medium' or 'Hard'.
    pub difficulty: String,
    pub category: String,

    /// The language this question is declared for. Submissions in another
    /// language are rejected unless the caller explicitly overrides.
    pub language: String,

    pub starter_code: Option<String>,
    pub constraints: Option<String>,

    /// Ordered list of test cases, stored as a JSON array.
    pub test_cases: Json<Vec<TestCase>>,

    /// CPU seconds; defaults apply when unset.
    pub time_limit_secs: Option<i32>,
    /// Kilobytes; defaults apply when unset.
    pub memory_limit_kb: Option<i32>,

    pub tags: Json<Vec<String>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl CodingQuestion {
    /// Resource limits for this question, falling back to the global
    /// defaults (5 s CPU / 128,000 KB).
    pub fn limits(&self) -> ResourceLimits {
        let defaults = ResourceLimits::default();
        ResourceLimits {
            cpu_time_secs: self
                .time_limit_secs
                .map(|s| s as f64)
                .unwrap_or(defaults.cpu_time_secs),
            memory_kb: self
                .memory_limit_kb
                .map(|kb| kb as u32)
                .unwrap_or(defaults.memory_kb),
        }
    }
}

/// DTO for sending a question to the client: hidden test cases are dropped
/// entirely so neither their inputs nor expected outputs leak.
#[derive(Debug, Serialize)]
pub struct PublicCodingQuestion {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub language: String,
    pub starter_code: Option<String>,
    pub constraints: Option<String>,
    pub sample_test_cases: Vec<TestCase>,
    pub total_test_cases: usize,
    pub tags: Json<Vec<String>>,
}

impl From<CodingQuestion> for PublicCodingQuestion {
    fn from(q: CodingQuestion) -> Self {
        let total_test_cases = q.test_cases.0.len();
        let sample_test_cases = q
            .test_cases
            .0
            .into_iter()
            .filter(|tc| !tc.is_hidden)
            .collect();
        PublicCodingQuestion {
            id: q.id,
            title: q.title,
            description: q.description,
            difficulty: q.difficulty,
            category: q.category,
            language: q.language,
            starter_code: q.starter_code,
            constraints: q.constraints,
            sample_test_cases,
            total_test_cases,
            tags: q.tags,
        }
    }
}

/// DTO for admin tooling creating a new coding question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCodingQuestionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub category: String,
    #[validate(length(min = 1, max = 40))]
    pub language: String,
    pub starter_code: Option<String>,
    pub constraints: Option<String>,
    #[validate(custom(function = validate_test_cases))]
    pub test_cases: Vec<TestCase>,
    pub time_limit_secs: Option<i32>,
    pub memory_limit_kb: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn validate_difficulty(difficulty: &str) -> Result<(), validator::ValidationError> {
    match difficulty {
        "Easy" | "Medium" | "Hard" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_difficulty")),
    }
}

fn validate_test_cases(test_cases: &[TestCase]) -> Result<(), validator::ValidationError> {
    if test_cases.is_empty() {
        return Err(validator::ValidationError::new("test_cases_cannot_be_empty"));
    }
    Ok(())
}
