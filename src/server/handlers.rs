//! Route handlers for the student analytics API.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analytics::Analytics;
use crate::analytics::types::{
    AssessmentAnalytics, AssessmentTable, CompletedModules, StudentExists, StudentRank,
    StudentSummary,
};
use crate::dataset::Dataset;
use crate::error::{AnalyticsError, parse_id};
use crate::server::error::ApiError;

/// Shared, read-only state.
pub struct AppState {
    pub dataset: Dataset,
}

impl AppState {
    fn analytics(&self) -> Analytics<'_> {
        Analytics::new(&self.dataset)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    pub student_id: Option<String>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// A malformed id is reported as a missing student, not a bad request.
pub async fn student_exists(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Json<StudentExists> {
    match parse_id(&student_id, "student_id") {
        Ok(id) => Json(state.analytics().student_exists(id)),
        Err(_) => Json(StudentExists { exists: false }),
    }
}

pub async fn student_assessments(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<Json<AssessmentTable>, ApiError> {
    let id = parse_id(&student_id, "student_id")?;
    Ok(Json(state.analytics().student_assessments(id)))
}

pub async fn student_summary(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentSummary>, ApiError> {
    let id = parse_id(&student_id, "student_id")?;
    let mut summary = state.analytics().student_summary(id);
    summary.student_id = student_id;
    Ok(Json(summary))
}

pub async fn student_modules(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<Json<CompletedModules>, ApiError> {
    let id = parse_id(&student_id, "student_id")?;
    Ok(Json(state.analytics().completed_modules(id)))
}

pub async fn student_rank(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentRank>, ApiError> {
    let id = parse_id(&student_id, "student_id")?;
    Ok(Json(state.analytics().student_rank(id)?))
}

pub async fn assessment_analytics(
    State(state): State<Arc<AppState>>,
    Path(assessment_id): Path<String>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<AssessmentAnalytics>, ApiError> {
    let assessment_id = parse_id(&assessment_id, "assessment_id")?;
    let raw_student = params
        .student_id
        .ok_or_else(|| AnalyticsError::invalid_argument("student_id is required"))?;
    let student_id = parse_id(&raw_student, "student_id")?;

    Ok(Json(
        state
            .analytics()
            .assessment_analytics(assessment_id, student_id)?,
    ))
}
