// src/judge/scorer.rs
//
// Combines a batch of mixed MCQ + coding question responses into a final
// certification outcome. Coding correctness is recorded but, by the
// documented default (coding_weight = 0), does not contribute to the
// percentage; the weight is an explicit policy knob rather than a silent fix.

use serde_json::Value;

use crate::config::PASSING_SCORE_PERCENTAGE;
use crate::error::AppError;
use crate::models::certification::{BadgeType, CertQuestion};

/// Pure scoring result, before any persistence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCertification {
    pub mcq_correct: u32,
    pub mcq_total: u32,
    pub coding_correct: u32,
    pub coding_total: u32,
    pub percentage: f64,
    pub passed: bool,
    pub badge: BadgeType,
}

/// Scores a certification batch.
///
/// `answers` is positionally matched to `questions` and must be the same
/// length. Every question must carry `_id`, `type` and `correctAnswer`.
/// `coding_weight` in [0, 1] blends coding correctness into the percentage;
/// at 0 the percentage reflects MCQ answers only.
pub fn score_certification(
    questions: &[CertQuestion],
    answers: &[Value],
    coding_weight: f64,
) -> Result<ScoredCertification, AppError> {
    if questions.len() != answers.len() {
        return Err(AppError::AnswerCountMismatch(format!(
            "Got {} answers for {} questions",
            answers.len(),
            questions.len()
        )));
    }

    let mut mcq_correct = 0u32;
    let mut mcq_total = 0u32;
    let mut coding_correct = 0u32;
    let mut coding_total = 0u32;

    for (index, (question, answer)) in questions.iter().zip(answers).enumerate() {
        let (Some(_), Some(question_type), Some(correct_answer)) = (
            question.id.as_ref(),
            question.question_type.as_deref(),
            question.correct_answer.as_ref(),
        ) else {
            return Err(AppError::MalformedQuestion(format!(
                "Question at index {} is missing _id, type or correctAnswer",
                index
            )));
        };

        let correct = answer == correct_answer;
        if question_type == "mcq" {
            mcq_total += 1;
            if correct {
                mcq_correct += 1;
            }
        } else {
            coding_total += 1;
            if correct {
                coding_correct += 1;
            }
        }
    }

    let mcq_percentage = if mcq_total > 0 {
        f64::from(mcq_correct) / f64::from(mcq_total) * 100.0
    } else {
        0.0
    };
    let coding_percentage = if coding_total > 0 {
        f64::from(coding_correct) / f64::from(coding_total) * 100.0
    } else {
        0.0
    };

    let percentage = if coding_weight > 0.0 && coding_total > 0 {
        (1.0 - coding_weight) * mcq_percentage + coding_weight * coding_percentage
    } else {
        mcq_percentage
    };

    Ok(ScoredCertification {
        mcq_correct,
        mcq_total,
        coding_correct,
        coding_total,
        percentage,
        passed: percentage >= PASSING_SCORE_PERCENTAGE,
        badge: BadgeType::from_percentage(percentage),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mcq(correct: &str) -> CertQuestion {
        CertQuestion {
            id: Some(json!("q")),
            question_type: Some("mcq".to_string()),
            correct_answer: Some(json!(correct)),
        }
    }

    fn coding(correct: &str) -> CertQuestion {
        CertQuestion {
            id: Some(json!("q")),
            question_type: Some("coding".to_string()),
            correct_answer: Some(json!(correct)),
        }
    }

    #[test]
    fn percentage_reflects_mcq_only_by_default() {
        // 10 MCQ with 8 correct plus 5 coding all "correct": 80%, not blended.
        let mut questions = Vec::new();
        let mut answers = Vec::new();
        for i in 0..10 {
            questions.push(mcq("A"));
            answers.push(json!(if i < 8 { "A" } else { "B" }));
        }
        for _ in 0..5 {
            questions.push(coding("ok"));
            answers.push(json!("ok"));
        }

        let scored = score_certification(&questions, &answers, 0.0).unwrap();
        assert_eq!(scored.mcq_correct, 8);
        assert_eq!(scored.mcq_total, 10);
        assert_eq!(scored.coding_correct, 5);
        assert_eq!(scored.percentage, 80.0);
        assert!(scored.passed);
        assert_eq!(scored.badge, BadgeType::Silver);
    }

    #[test]
    fn coding_weight_blends_when_set() {
        let questions = vec![mcq("A"), mcq("A"), coding("ok"), coding("ok")];
        let answers = vec![json!("A"), json!("B"), json!("ok"), json!("ok")];
        // mcq 50%, coding 100%, half weight each -> 75%.
        let scored = score_certification(&questions, &answers, 0.5).unwrap();
        assert_eq!(scored.percentage, 75.0);
        assert_eq!(scored.badge, BadgeType::Silver);
    }

    #[test]
    fn answer_count_mismatch_is_rejected() {
        let questions = vec![mcq("A")];
        let answers = vec![json!("A"), json!("B")];
        assert!(matches!(
            score_certification(&questions, &answers, 0.0),
            Err(AppError::AnswerCountMismatch(_))
        ));
    }

    #[test]
    fn malformed_question_is_rejected() {
        let questions = vec![CertQuestion {
            id: Some(json!("q")),
            question_type: None,
            correct_answer: Some(json!("A")),
        }];
        let answers = vec![json!("A")];
        assert!(matches!(
            score_certification(&questions, &answers, 0.0),
            Err(AppError::MalformedQuestion(_))
        ));
    }

    #[test]
    fn pass_boundary_is_inclusive_at_65() {
        // 13 of 20 correct = 65.0 exactly.
        let questions: Vec<_> = (0..20).map(|_| mcq("A")).collect();
        let answers: Vec<_> = (0..20)
            .map(|i| json!(if i < 13 { "A" } else { "B" }))
            .collect();
        let scored = score_certification(&questions, &answers, 0.0).unwrap();
        assert_eq!(scored.percentage, 65.0);
        assert!(scored.passed);

        // 12 of 20 = 60% fails.
        let answers: Vec<_> = (0..20)
            .map(|i| json!(if i < 12 { "A" } else { "B" }))
            .collect();
        let scored = score_certification(&questions, &answers, 0.0).unwrap();
        assert!(!scored.passed);
    }

    #[test]
    fn empty_batch_scores_zero() {
        let scored = score_certification(&[], &[], 0.0).unwrap();
        assert_eq!(scored.percentage, 0.0);
        assert!(!scored.passed);
        assert_eq!(scored.badge, BadgeType::Bronze);
    }

    #[test]
    fn zero_mcq_with_coding_only_defaults_to_zero_percentage() {
        let questions = vec![coding("ok"), coding("ok")];
        let answers = vec![json!("ok"), json!("ok")];
        let scored = score_certification(&questions, &answers, 0.0).unwrap();
        assert_eq!(scored.percentage, 0.0);
        assert!(!scored.passed);
    }
}
