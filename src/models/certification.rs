// src/models/certification.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::config::{GOLD_THRESHOLD, PLATINUM_THRESHOLD, SILVER_THRESHOLD};

/// Badge tier, derived from the certification percentage. Always recomputed
/// from the percentage before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeType {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl BadgeType {
    /// Evaluated high-to-low, inclusive at each boundary.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= PLATINUM_THRESHOLD {
            BadgeType::Platinum
        } else if percentage >= GOLD_THRESHOLD {
            BadgeType::Gold
        } else if percentage >= SILVER_THRESHOLD {
            BadgeType::Silver
        } else {
            BadgeType::Bronze
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeType::Platinum => "platinum",
            BadgeType::Gold => "gold",
            BadgeType::Silver => "silver",
            BadgeType::Bronze => "bronze",
        }
    }
}

impl std::fmt::Display for BadgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the 'certifications' table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Certification {
    pub certificate_id: String,
    pub user_id: String,
    pub user_name: String,
    pub category: String,
    /// MCQ correct count.
    pub score: i32,
    pub mcq_total: i32,
    pub percentage: f64,
    pub passed: bool,
    pub badge_type: String,
    pub earned_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One submitted question of a certification batch. The frontend sends its
/// own question payloads; `_id`, `type` and `correctAnswer` are required and
/// their absence is a malformed-question error.
#[derive(Debug, Clone, Deserialize)]
pub struct CertQuestion {
    #[serde(default, alias = "_id")]
    pub id: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub question_type: Option<String>,
    #[serde(default, alias = "correctAnswer")]
    pub correct_answer: Option<serde_json::Value>,
}

/// Body of POST /api/certification/submit.
#[derive(Debug, Deserialize)]
pub struct SubmitCertificationRequest {
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(alias = "userName")]
    pub user_name: String,
    pub category: String,
    /// Learner answers, positionally matched to `questions`.
    pub answers: Vec<serde_json::Value>,
    pub questions: Vec<CertQuestion>,
}

/// Certification outcome returned to the client.
#[derive(Debug, Serialize)]
pub struct CertificationOutcome {
    pub passed: bool,
    /// MCQ correct count.
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
    pub certificate_id: Option<String>,
    pub certificate_url: Option<String>,
    pub badge_type: BadgeType,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_boundaries_are_inclusive() {
        assert_eq!(BadgeType::from_percentage(95.0), BadgeType::Platinum);
        assert_eq!(BadgeType::from_percentage(94.999), BadgeType::Gold);
        assert_eq!(BadgeType::from_percentage(85.0), BadgeType::Gold);
        assert_eq!(BadgeType::from_percentage(84.999), BadgeType::Silver);
        assert_eq!(BadgeType::from_percentage(75.0), BadgeType::Silver);
        assert_eq!(BadgeType::from_percentage(74.999), BadgeType::Bronze);
        assert_eq!(BadgeType::from_percentage(0.0), BadgeType::Bronze);
    }

    #[test]
    fn badge_top_end() {
        assert_eq!(BadgeType::from_percentage(100.0), BadgeType::Platinum);
    }
}
