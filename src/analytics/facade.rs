//! Student-facing queries composed from the analytics building blocks.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use tracing::debug;

use crate::analytics::histogram::{DEFAULT_BIN_COUNT, SCORE_RANGE, histogram};
use crate::analytics::peers::PeerGroupRanker;
use crate::analytics::percentile::percentile;
use crate::analytics::tier::classify;
use crate::analytics::trend::predict_next;
use crate::analytics::types::{
    AssessmentAnalytics, AssessmentRow, AssessmentTable, CompletedModules, StudentExists,
    StudentRank, StudentSummary,
};
use crate::analytics::utility::{mean, round_to};
use crate::dataset::Dataset;
use crate::error::{AnalyticsError, Result};

/// Read-only query surface over a [`Dataset`] snapshot.
///
/// Every method is a pure function of the dataset and its arguments, so one
/// dataset can serve any number of concurrent callers.
#[derive(Clone, Copy)]
pub struct Analytics<'a> {
    dataset: &'a Dataset,
}

impl<'a> Analytics<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn student_exists(&self, student_id: i64) -> StudentExists {
        StudentExists {
            exists: self.dataset.has_student(student_id),
        }
    }

    /// The student's assessment rows sorted by assessment id.
    pub fn student_assessments(&self, student_id: i64) -> AssessmentTable {
        let mut records: Vec<_> = self.dataset.assessments_for(student_id).collect();
        records.sort_by_key(|a| a.assessment_id);

        let rows = records
            .into_iter()
            .map(|a| AssessmentRow {
                id_assessment: a.assessment_id,
                task: None,
                date_submitted: a.submission_marker.as_deref().map(normalize_date),
                score: a.score.filter(|s| s.is_finite()),
            })
            .collect();

        AssessmentTable { rows }
    }

    /// Average, tier and next-score prediction for a student.
    ///
    /// A student without scored assessments gets a zero average and no
    /// prediction rather than an error.
    #[tracing::instrument(skip(self))]
    pub fn student_summary(&self, student_id: i64) -> StudentSummary {
        let history = self.dataset.scored_history(student_id);
        let scores: Vec<f64> = history.iter().map(|(_, s)| *s).collect();

        let average = if scores.is_empty() {
            0.0
        } else {
            round_to(mean(&scores), 1)
        };
        let predicted = predict_next(&history);
        debug!(points = history.len(), average, has_prediction = predicted.is_some(), "Summary computed");

        StudentSummary {
            student_id: student_id.to_string(),
            average,
            tier: classify(average),
            predicted_next: predicted.into(),
        }
    }

    /// Modules whose registration has no unregistration marker, in record order.
    pub fn completed_modules(&self, student_id: i64) -> CompletedModules {
        let modules: Vec<String> = self
            .dataset
            .registrations_for(student_id)
            .filter(|r| r.is_completed())
            .map(|r| r.module_code.clone())
            .collect();

        CompletedModules {
            count: modules.len(),
            modules,
        }
    }

    /// Score distribution of an assessment and the student's place in it.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::NotFound`] when the assessment has no scored records
    /// or the student has none for it.
    #[tracing::instrument(skip(self))]
    pub fn assessment_analytics(
        &self,
        assessment_id: i64,
        student_id: i64,
    ) -> Result<AssessmentAnalytics> {
        let entries = self.dataset.scores_for_assessment(assessment_id);
        if entries.is_empty() {
            return Err(AnalyticsError::not_found(format!(
                "No scores for assessment {assessment_id}"
            )));
        }

        let student_score = entries
            .iter()
            .find(|(sid, _)| *sid == student_id)
            .map(|(_, score)| *score)
            .ok_or_else(|| {
                AnalyticsError::not_found(format!(
                    "Student {student_id} has no score for assessment {assessment_id}"
                ))
            })?;

        let scores: Vec<f64> = entries.iter().map(|(_, s)| *s).collect();
        let hist = histogram(&scores, DEFAULT_BIN_COUNT, SCORE_RANGE);
        let percentile = percentile(student_score, &scores)?;
        let tier = classify(student_score);

        let mut group: Vec<f64> = scores
            .iter()
            .copied()
            .filter(|s| classify(*s) == tier)
            .collect();
        group.sort_by(|a, b| b.total_cmp(a));

        let (position_in_tier, group_size_in_tier) = if group.is_empty() {
            (None, None)
        } else {
            let position = group.iter().position(|s| *s == student_score).map(|i| i + 1);
            (position, Some(group.len()))
        };

        Ok(AssessmentAnalytics {
            assessment_id,
            bins: hist.edges,
            counts: hist.counts,
            student_score,
            percentile,
            tier,
            position_in_tier,
            group_size_in_tier,
        })
    }

    /// Rank of the student among everyone sharing one of their modules.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::NotFound`] when the student has no scored
    /// assessments, no registrations, or is missing from the peer population.
    #[tracing::instrument(skip(self))]
    pub fn student_rank(&self, student_id: i64) -> Result<StudentRank> {
        let per_student = self.dataset.scores_by_student();

        let mut modules: Vec<String> = Vec::new();
        for r in self.dataset.registrations_for(student_id) {
            if !modules.contains(&r.module_code) {
                modules.push(r.module_code.clone());
            }
        }
        let module_set: HashSet<&str> = modules.iter().map(String::as_str).collect();

        let rank = PeerGroupRanker::new(self.dataset.registrations()).rank(
            student_id,
            &module_set,
            &per_student,
        )?;
        debug!(position = rank.position, total = rank.total, "Rank computed");

        Ok(StudentRank {
            position: rank.position,
            total: rank.total,
            percentile: rank.percentile,
            student_average: rank.student_average,
            modules,
        })
    }
}

/// Renders a submission marker as `YYYY-MM-DD` when it looks like a date.
///
/// ISO timestamps are cut at the date part; values that are not dates (such
/// as day offsets) pass through unchanged.
pub fn normalize_date(raw: &str) -> String {
    if raw.contains('T') {
        return raw.chars().take(10).collect();
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

    let date = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        });

    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => raw.to_string(),
    }
}
