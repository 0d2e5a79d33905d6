// src/judge/runner.rs
//
// Runs the judge engine across every test case of a question, strictly in
// declared order. Verdict order matches test-case order; hidden-case
// redaction and partial credit depend on that positional correspondence.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::judge::backend::ExecutionBackend;
use crate::judge::engine::{JudgeOptions, judge_test_case};
use crate::judge::language::Language;
use crate::models::coding_question::CodingQuestion;
use crate::models::submission::{QuestionStats, SubmissionRun, SubmitAllResult, TestCaseVerdict};

/// Integer per-test weight. 7 test cases weigh 14 points each, so 3 passing
/// score 42, never 43.
fn per_test_weight(total: u32) -> u32 {
    if total == 0 { 0 } else { 100 / total }
}

/// Judges every test case sequentially. One test case erroring does not
/// abort the rest; its verdict carries the error flag instead.
pub async fn run_all_tests(
    backend: &dyn ExecutionBackend,
    question: &CodingQuestion,
    code: &str,
    opts: &JudgeOptions,
) -> Result<SubmitAllResult, AppError> {
    let language = Language::parse(&question.language).ok_or_else(|| {
        AppError::UnsupportedLanguage(format!(
            "Question {} declares unsupported language '{}'",
            question.id, question.language
        ))
    })?;

    let cases = &question.test_cases.0;
    let total = cases.len() as u32;
    let mut passed_count = 0u32;
    let mut results = Vec::with_capacity(cases.len());

    for (index, test_case) in cases.iter().enumerate() {
        let verdict = match judge_test_case(backend, question, language, code, index, None, opts)
            .await
        {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(
                    question_id = question.id,
                    test_case = index,
                    error = %e.kind(),
                    "Test case errored; continuing with remaining cases"
                );
                let failed = TestCaseVerdict {
                    test_case_index: index,
                    passed: false,
                    output: format!("{}: {}", e.kind(), e.details()),
                    expected: test_case.expected_output.clone(),
                    input: test_case.input.clone(),
                    error: true,
                };
                if test_case.is_hidden {
                    failed.redacted()
                } else {
                    failed
                }
            }
        };

        if verdict.passed {
            passed_count += 1;
        }
        results.push(verdict);
    }

    let score = (per_test_weight(total) * passed_count) as f64;

    Ok(SubmitAllResult {
        score,
        passed_tests: passed_count,
        total_tests: total,
        results,
    })
}

/// Appends one row to the submission log. The question row itself is never
/// mutated; aggregates are derived on read.
pub async fn record_run(
    pool: &PgPool,
    question_id: i64,
    result: &SubmitAllResult,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO submission_runs (id, question_id, total_tests, passed_tests, score)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(question_id)
    .bind(result.total_tests as i32)
    .bind(result.passed_tests as i32)
    .bind(result.score as i32)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Derived aggregate across all historical runs of a question.
pub async fn question_stats(pool: &PgPool, question_id: i64) -> Result<QuestionStats, AppError> {
    let stats = sqlx::query_as::<_, QuestionStats>(
        r#"
        SELECT
            COALESCE(SUM(total_tests), 0)::BIGINT  AS total_test_cases,
            COALESCE(SUM(passed_tests), 0)::BIGINT AS passed_test_cases,
            COALESCE(SUM(score), 0)::BIGINT        AS score,
            COUNT(*)                               AS runs
        FROM submission_runs
        WHERE question_id = $1
        "#,
    )
    .bind(question_id)
    .fetch_one(pool)
    .await?;
    Ok(stats)
}

/// Most recent runs of a question, newest first.
pub async fn recent_runs(
    pool: &PgPool,
    question_id: i64,
    limit: i64,
) -> Result<Vec<SubmissionRun>, AppError> {
    let runs = sqlx::query_as::<_, SubmissionRun>(
        r#"
        SELECT id, question_id, total_tests, passed_tests, score, created_at
        FROM submission_runs
        WHERE question_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(question_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_test_weight_floors() {
        assert_eq!(per_test_weight(7), 14);
        assert_eq!(per_test_weight(3), 33);
        assert_eq!(per_test_weight(1), 100);
        assert_eq!(per_test_weight(0), 0);
    }

    #[test]
    fn floor_scoring_three_of_seven() {
        // 3 of 7 passing at weight 14 per test: 42, not 43.
        assert_eq!(per_test_weight(7) * 3, 42);
    }
}
