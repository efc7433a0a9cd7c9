//! Least-squares trend over a student's assessment history.
//!
//! The assessment id is used as the x axis. It is an identifier rather than a
//! point in time, but ids grow with the course schedule closely enough to
//! order a student's results.

use serde::{Deserialize, Serialize};

use crate::analytics::utility::round_to;

/// Extrapolated score for the assessment following the history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub assessment_id: i64,
    pub score: f64,
}

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Ordinary least squares over `(x, y)` points.
    ///
    /// Returns `None` for fewer than two points or when every `x` is the same.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });

        if sxx == 0.0 || !sxx.is_finite() {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        (slope.is_finite() && intercept.is_finite()).then_some(LinearFit { slope, intercept })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Predicts the score of assessment `max(id) + 1` from `(assessment_id, score)` history.
///
/// The result is rounded to two decimals and deliberately not clamped to
/// [0, 100]. A sparse or degenerate history yields `None`.
pub fn predict_next(history: &[(i64, f64)]) -> Option<Prediction> {
    let points: Vec<(f64, f64)> = history
        .iter()
        .filter(|(_, score)| score.is_finite())
        .map(|&(id, score)| (id as f64, score))
        .collect();

    let fit = LinearFit::fit(&points)?;

    let next_id = history
        .iter()
        .filter(|(_, score)| score.is_finite())
        .map(|(id, _)| *id)
        .max()?
        .checked_add(1)?;

    let score = round_to(fit.at(next_id as f64), 2);
    score.is_finite().then_some(Prediction {
        assessment_id: next_id,
        score,
    })
}
