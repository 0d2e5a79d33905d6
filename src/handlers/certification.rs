// src/handlers/certification.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    judge::scorer::score_certification,
    models::certification::{Certification, CertificationOutcome, SubmitCertificationRequest},
    state::AppState,
    utils::certificate::{generate_certificate_id, render_certificate},
};

/// POST /api/certification/submit - score a mixed MCQ + coding batch and
/// issue a certification outcome.
///
/// Persistence is deliberately non-transactional, in a fixed order:
/// 1. certification record save - failure aborts the request;
/// 2. certificate artifact synthesis - failure is logged and swallowed;
/// 3. profile summary upsert - replaces a prior entry for the category only
///    when the new percentage is strictly greater.
pub async fn submit_certification(
    State(state): State<AppState>,
    Json(req): Json<SubmitCertificationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.user_id.trim().is_empty() || req.category.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "userId and category are required".to_string(),
        ));
    }

    let scored = score_certification(&req.questions, &req.answers, state.config.coding_weight)?;

    // Failed attempts are recorded too; they are just excluded from earned
    // listings and never reach the profile summary.
    let certificate_id = generate_certificate_id();
    sqlx::query(
        r#"
        INSERT INTO certifications
            (certificate_id, user_id, user_name, category, score, mcq_total,
             percentage, passed, badge_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(&certificate_id)
    .bind(&req.user_id)
    .bind(&req.user_name)
    .bind(&req.category)
    .bind(scored.mcq_correct as i32)
    .bind(scored.mcq_total as i32)
    .bind(scored.percentage)
    .bind(scored.passed)
    .bind(scored.badge.as_str())
    .execute(&state.pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save certification record: {:?}", e);
        AppError::Internal(e.to_string())
    })?;

    let mut certificate_url = None;
    if scored.passed {
        certificate_url = match render_certificate(&certificate_id) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!(
                    certificate_id = %certificate_id,
                    "Certificate artifact generation failed: {}; record kept",
                    e.details()
                );
                None
            }
        };

        sqlx::query(
            r#"
            INSERT INTO user_certifications
                (user_id, category, certificate_id, percentage, badge_type)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, category) DO UPDATE SET
                certificate_id = EXCLUDED.certificate_id,
                percentage     = EXCLUDED.percentage,
                badge_type     = EXCLUDED.badge_type,
                earned_at      = NOW()
            WHERE user_certifications.percentage < EXCLUDED.percentage
            "#,
        )
        .bind(&req.user_id)
        .bind(&req.category)
        .bind(&certificate_id)
        .bind(scored.percentage)
        .bind(scored.badge.as_str())
        .execute(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert profile certification: {:?}", e);
            AppError::Internal(e.to_string())
        })?;
    }

    tracing::info!(
        user_id = %req.user_id,
        category = %req.category,
        percentage = scored.percentage,
        passed = scored.passed,
        badge = %scored.badge,
        "Certification scored"
    );

    let message = if scored.passed {
        format!(
            "Congratulations! You earned a {} badge in {}.",
            scored.badge, req.category
        )
    } else {
        "Score below the 65% pass mark. Keep practicing and try again.".to_string()
    };

    Ok(Json(CertificationOutcome {
        passed: scored.passed,
        score: scored.mcq_correct,
        total_questions: req.questions.len() as u32,
        percentage: scored.percentage,
        certificate_id: scored.passed.then_some(certificate_id),
        certificate_url,
        badge_type: scored.badge,
        message,
    }))
}

/// GET /api/certification/{user_id} - earned certifications only.
/// Failed attempts stay in the table but are excluded here.
pub async fn list_certifications(
    State(pool): State<PgPool>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let certifications = sqlx::query_as::<_, Certification>(
        r#"
        SELECT certificate_id, user_id, user_name, category, score, mcq_total,
               percentage, passed, badge_type, earned_at
        FROM certifications
        WHERE user_id = $1 AND passed
        ORDER BY earned_at DESC
        "#,
    )
    .bind(&user_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list certifications: {:?}", e);
        AppError::Internal(e.to_string())
    })?;

    Ok(Json(certifications))
}
