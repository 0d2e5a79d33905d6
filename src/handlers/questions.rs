// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    judge::{language::Language, runner},
    models::coding_question::{CodingQuestion, CreateCodingQuestionRequest, PublicCodingQuestion},
};

const QUESTION_COLUMNS: &str = "id, title, description, difficulty, category, language, \
     starter_code, constraints, test_cases, time_limit_secs, memory_limit_kb, tags, created_at";

/// Loads a question for judging. Shared by the judge handlers.
pub async fn fetch_question(pool: &PgPool, id: i64) -> Result<CodingQuestion, AppError> {
    let query = format!("SELECT {QUESTION_COLUMNS} FROM coding_questions WHERE id = $1");
    sqlx::query_as::<_, CodingQuestion>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::QuestionNotFound(format!("Question {} not found", id)))
}

/// Retrieves the public view of a question: hidden test cases are dropped.
pub async fn get_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = fetch_question(&pool, id).await?;
    Ok(Json(PublicCodingQuestion::from(question)))
}

/// Aggregate run statistics, derived from the append-only submission log.
pub async fn get_question_stats(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    // 404 for unknown questions rather than an all-zero aggregate.
    fetch_question(&pool, id).await?;
    let stats = runner::question_stats(&pool, id).await?;
    Ok(Json(stats))
}

/// Recent entries from the submission log, newest first.
pub async fn get_question_runs(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    fetch_question(&pool, id).await?;
    let runs = runner::recent_runs(&pool, id, 20).await?;
    Ok(Json(runs))
}

/// Creates a new coding question.
/// Admin tooling only; authentication is enforced upstream.
pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateCodingQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::InvalidInput(validation_errors.to_string()));
    }
    if Language::parse(&payload.language).is_none() {
        return Err(AppError::UnsupportedLanguage(format!(
            "Unsupported language '{}'",
            payload.language
        )));
    }

    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO coding_questions
            (title, description, difficulty, category, language, starter_code,
             constraints, test_cases, time_limit_secs, memory_limit_kb, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.difficulty)
    .bind(&payload.category)
    .bind(payload.language.to_lowercase())
    .bind(&payload.starter_code)
    .bind(&payload.constraints)
    .bind(SqlJson(&payload.test_cases))
    .bind(payload.time_limit_secs)
    .bind(payload.memory_limit_kb)
    .bind(SqlJson(&payload.tags))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create coding question: {:?}", e);
        AppError::Internal(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": row.0 }))))
}
