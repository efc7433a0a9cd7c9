use serde::Serialize;

pub const DEFAULT_BIN_COUNT: usize = 10;
pub const SCORE_RANGE: (f64, f64) = (0.0, 100.0);

/// Fixed-range histogram: `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Buckets `scores` into `bin_count` equal-width bins spanning `range`.
///
/// Edges depend only on `range`, never on the data, so histograms of
/// different assessments line up. The top edge belongs to the last bin and
/// values outside the range are dropped.
pub fn histogram(scores: &[f64], bin_count: usize, range: (f64, f64)) -> Histogram {
    let bins = bin_count.max(1);
    let (lower, upper) = range;
    let span = upper - lower;

    let edges: Vec<f64> = (0..=bins)
        .map(|i| lower + span * i as f64 / bins as f64)
        .collect();
    let mut counts = vec![0usize; bins];

    for &score in scores {
        if !score.is_finite() || score < lower || score > upper {
            continue;
        }
        let idx = ((score - lower) * bins as f64 / span).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    Histogram { edges, counts }
}
