//! Record types for the three source tables and the merged view.

use serde::{Deserialize, Serialize};

/// A single row of `studentAssessment.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    #[serde(rename = "id_student")]
    pub student_id: i64,
    #[serde(rename = "id_assessment")]
    pub assessment_id: i64,
    /// `None` when the cell is empty or not a number.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub score: Option<f64>,
    #[serde(
        rename = "date_submitted",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub submission_marker: Option<String>,
}

/// A single row of `studentRegistration.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    #[serde(rename = "id_student")]
    pub student_id: i64,
    #[serde(rename = "code_module")]
    pub module_code: String,
    #[serde(rename = "code_presentation")]
    pub presentation_code: String,
    #[serde(
        rename = "date_unregistration",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub unregistration_marker: Option<String>,
}

impl RegistrationRecord {
    /// A registration without an unregistration marker counts as completed.
    pub fn is_completed(&self) -> bool {
        self.unregistration_marker.is_none()
    }
}

/// A single row of `studentInfo.csv`, reduced to the join columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "id_student")]
    pub student_id: i64,
    #[serde(rename = "code_module")]
    pub module_code: String,
    #[serde(rename = "code_presentation")]
    pub presentation_code: String,
}

/// An assessment row with the student's module context attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRecord {
    pub student_id: i64,
    pub assessment_id: i64,
    pub score: Option<f64>,
    pub submission_marker: Option<String>,
    pub module_code: Option<String>,
    pub presentation_code: Option<String>,
}

impl MergedRecord {
    pub(crate) fn from_parts(assessment: &AssessmentRecord, student: Option<&StudentRecord>) -> Self {
        MergedRecord {
            student_id: assessment.student_id,
            assessment_id: assessment.assessment_id,
            score: assessment.score,
            submission_marker: assessment.submission_marker.clone(),
            module_code: student.map(|s| s.module_code.clone()),
            presentation_code: student.map(|s| s.presentation_code.clone()),
        }
    }

    /// The score, if present and finite.
    pub fn scored(&self) -> Option<f64> {
        self.score.filter(|s| s.is_finite())
    }
}
