//! Immutable in-memory store of the source tables.
//!
//! A [`Dataset`] is built once from the three tables and never mutated. The
//! merged assessment/student view is joined at construction; everything else
//! (per-student score maps, per-assessment populations) is derived on demand.

pub mod loader;
pub mod types;

use std::collections::HashMap;

use tracing::debug;

pub use types::{AssessmentRecord, MergedRecord, RegistrationRecord, StudentRecord};

#[derive(Debug, Default)]
pub struct Dataset {
    assessments: Vec<AssessmentRecord>,
    registrations: Vec<RegistrationRecord>,
    students: Vec<StudentRecord>,
    merged: Vec<MergedRecord>,
}

impl Dataset {
    pub fn new(
        assessments: Vec<AssessmentRecord>,
        registrations: Vec<RegistrationRecord>,
        students: Vec<StudentRecord>,
    ) -> Self {
        let merged = left_join(&assessments, &students);

        debug!(
            assessments = assessments.len(),
            registrations = registrations.len(),
            students = students.len(),
            merged = merged.len(),
            "Dataset built"
        );

        Dataset {
            assessments,
            registrations,
            students,
            merged,
        }
    }

    pub fn assessments(&self) -> &[AssessmentRecord] {
        &self.assessments
    }

    pub fn registrations(&self) -> &[RegistrationRecord] {
        &self.registrations
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn merged(&self) -> &[MergedRecord] {
        &self.merged
    }

    /// True when the student has at least one assessment record.
    pub fn has_student(&self, student_id: i64) -> bool {
        self.assessments.iter().any(|a| a.student_id == student_id)
    }

    /// Raw assessment rows for one student, in source order.
    pub fn assessments_for(&self, student_id: i64) -> impl Iterator<Item = &AssessmentRecord> {
        self.assessments
            .iter()
            .filter(move |a| a.student_id == student_id)
    }

    /// Registrations for one student, in source order.
    pub fn registrations_for(&self, student_id: i64) -> impl Iterator<Item = &RegistrationRecord> {
        self.registrations
            .iter()
            .filter(move |r| r.student_id == student_id)
    }

    /// `(assessment_id, score)` pairs for every scored merged row of a student.
    pub fn scored_history(&self, student_id: i64) -> Vec<(i64, f64)> {
        self.merged
            .iter()
            .filter(|m| m.student_id == student_id)
            .filter_map(|m| m.scored().map(|s| (m.assessment_id, s)))
            .collect()
    }

    /// `(student_id, score)` pairs for every scored merged row of an assessment.
    pub fn scores_for_assessment(&self, assessment_id: i64) -> Vec<(i64, f64)> {
        self.merged
            .iter()
            .filter(|m| m.assessment_id == assessment_id)
            .filter_map(|m| m.scored().map(|s| (m.student_id, s)))
            .collect()
    }

    /// All scored merged rows grouped by student.
    pub fn scores_by_student(&self) -> HashMap<i64, Vec<f64>> {
        let mut by_student: HashMap<i64, Vec<f64>> = HashMap::new();
        for m in &self.merged {
            if let Some(score) = m.scored() {
                by_student.entry(m.student_id).or_default().push(score);
            }
        }
        by_student
    }
}

/// Left join of assessments onto student info by `student_id`.
///
/// Every assessment row appears at least once; a student with several info
/// rows yields one merged row per info row.
fn left_join(assessments: &[AssessmentRecord], students: &[StudentRecord]) -> Vec<MergedRecord> {
    let mut info: HashMap<i64, Vec<&StudentRecord>> = HashMap::new();
    for s in students {
        info.entry(s.student_id).or_default().push(s);
    }

    let mut merged = Vec::with_capacity(assessments.len());
    for a in assessments {
        match info.get(&a.student_id) {
            Some(matches) => {
                merged.extend(matches.iter().map(|s| MergedRecord::from_parts(a, Some(s))));
            }
            None => merged.push(MergedRecord::from_parts(a, None)),
        }
    }
    merged
}
