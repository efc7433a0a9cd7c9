//! Result types returned by [`crate::analytics::Analytics`] queries.
//!
//! Field names follow the JSON contract of the web frontend.

use serde::{Deserialize, Serialize};

use crate::analytics::tier::Tier;
use crate::analytics::trend::Prediction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentExists {
    pub exists: bool,
}

/// One row of a student's assessment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRow {
    pub id_assessment: i64,
    /// Always null; the frontend labels rows as "Assessment {id}".
    pub task: Option<String>,
    pub date_submitted: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentTable {
    pub rows: Vec<AssessmentRow>,
}

/// Next-assessment prediction; both fields are null when there is none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictedNext {
    pub id_assessment: Option<i64>,
    pub score: Option<f64>,
}

impl From<Option<Prediction>> for PredictedNext {
    fn from(prediction: Option<Prediction>) -> Self {
        match prediction {
            Some(p) => PredictedNext {
                id_assessment: Some(p.assessment_id),
                score: Some(p.score),
            },
            None => PredictedNext::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    #[serde(rename = "studentId")]
    pub student_id: String,
    pub average: f64,
    #[serde(rename = "status")]
    pub tier: Tier,
    pub predicted_next: PredictedNext,
}

/// Flat form of [`StudentSummary`] for CSV reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub student_id: String,
    pub average: f64,
    pub status: Tier,
    pub predicted_assessment_id: Option<i64>,
    pub predicted_score: Option<f64>,
}

impl From<&StudentSummary> for SummaryRow {
    fn from(summary: &StudentSummary) -> Self {
        SummaryRow {
            student_id: summary.student_id.clone(),
            average: summary.average,
            status: summary.tier,
            predicted_assessment_id: summary.predicted_next.id_assessment,
            predicted_score: summary.predicted_next.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedModules {
    pub count: usize,
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentAnalytics {
    pub assessment_id: i64,
    pub bins: Vec<f64>,
    pub counts: Vec<usize>,
    pub student_score: f64,
    pub percentile: f64,
    #[serde(rename = "status")]
    pub tier: Tier,
    #[serde(rename = "position_in_status")]
    pub position_in_tier: Option<usize>,
    #[serde(rename = "group_size_in_status")]
    pub group_size_in_tier: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRank {
    /// 1 = best.
    pub position: usize,
    pub total: usize,
    /// Higher is better.
    pub percentile: f64,
    pub student_average: f64,
    pub modules: Vec<String>,
}
