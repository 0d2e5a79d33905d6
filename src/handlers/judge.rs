// src/handlers/judge.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError,
    handlers::questions::fetch_question,
    judge::{
        engine::{JudgeOptions, judge_test_case, validate_submission},
        runner::{record_run, run_all_tests},
    },
    models::submission::{ExecuteRequest, RunTestsRequest},
    state::AppState,
};

/// POST /api/execute - judge a single test case.
///
/// Validation runs before any backend submission so malformed requests never
/// consume execution quota.
pub async fn execute(
    State(state): State<AppState>,
    Json(req): Json<ExecuteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = fetch_question(&state.pool, req.question_id).await?;
    let language = validate_submission(
        &req.code,
        &req.language,
        &question,
        req.allow_language_override,
    )?;

    let opts = JudgeOptions::from_config(&state.config);
    let verdict = judge_test_case(
        state.backend.as_ref(),
        &question,
        language,
        &req.code,
        req.test_case_index,
        req.input.as_deref(),
        &opts,
    )
    .await?;

    tracing::info!(
        question_id = question.id,
        test_case = req.test_case_index,
        passed = verdict.passed,
        "Judged single test case"
    );

    Ok(Json(verdict))
}

/// POST /api/run-tests - judge every test case of a question.
/// The language is implied by the question; the run is logged append-only.
pub async fn run_tests(
    State(state): State<AppState>,
    Json(req): Json<RunTestsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.code.trim().is_empty() {
        return Err(AppError::InvalidInput("Missing code".to_string()));
    }

    let question = fetch_question(&state.pool, req.question_id).await?;
    let opts = JudgeOptions::from_config(&state.config);
    let result = run_all_tests(state.backend.as_ref(), &question, &req.code, &opts).await?;

    record_run(&state.pool, question.id, &result).await?;

    tracing::info!(
        question_id = question.id,
        passed = result.passed_tests,
        total = result.total_tests,
        score = result.score,
        "Recorded submission run"
    );

    Ok(Json(result))
}
