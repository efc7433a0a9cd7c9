//! Ranking a student against the students who share a module with them.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::analytics::percentile::percentile;
use crate::analytics::utility::mean;
use crate::dataset::RegistrationRecord;
use crate::error::{AnalyticsError, Result};

/// A student's place within their peer population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerRank {
    /// 1 = best average.
    pub position: usize,
    pub total: usize,
    pub percentile: f64,
    pub student_average: f64,
}

/// Builds peer populations from module registrations.
pub struct PeerGroupRanker<'a> {
    registrations: &'a [RegistrationRecord],
}

impl<'a> PeerGroupRanker<'a> {
    pub fn new(registrations: &'a [RegistrationRecord]) -> Self {
        Self { registrations }
    }

    /// Every student registered in at least one of `modules`.
    pub fn peers(&self, modules: &HashSet<&str>) -> HashSet<i64> {
        self.registrations
            .iter()
            .filter(|r| modules.contains(r.module_code.as_str()))
            .map(|r| r.student_id)
            .collect()
    }

    /// Ranks `student_id` by average score among the peers of `modules`.
    ///
    /// Averages span all of a peer's scores, not only those in the shared
    /// modules. Peers are ordered by descending average with ties broken by
    /// ascending student id; the percentile is computed over the averages, so
    /// tied students share it even though their positions differ.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::NotFound`] when the student has no scores, `modules`
    /// is empty, or the student is missing from the peer population.
    pub fn rank(
        &self,
        student_id: i64,
        modules: &HashSet<&str>,
        per_student_scores: &HashMap<i64, Vec<f64>>,
    ) -> Result<PeerRank> {
        if per_student_scores
            .get(&student_id)
            .is_none_or(|scores| scores.is_empty())
        {
            return Err(AnalyticsError::not_found(format!(
                "No scored assessments for student {student_id}"
            )));
        }
        if modules.is_empty() {
            return Err(AnalyticsError::not_found(format!(
                "No module membership for student {student_id}"
            )));
        }

        let mut averages: Vec<(i64, f64)> = self
            .peers(modules)
            .into_iter()
            .filter_map(|peer| {
                per_student_scores
                    .get(&peer)
                    .filter(|scores| !scores.is_empty())
                    .map(|scores| (peer, mean(scores)))
            })
            .collect();

        averages.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let index = averages
            .iter()
            .position(|(peer, _)| *peer == student_id)
            .ok_or_else(|| {
                AnalyticsError::not_found(format!(
                    "Student {student_id} not found in peer population"
                ))
            })?;
        let student_average = averages[index].1;

        let values: Vec<f64> = averages.iter().map(|(_, avg)| *avg).collect();
        let percentile = percentile(student_average, &values)?;

        Ok(PeerRank {
            position: index + 1,
            total: averages.len(),
            percentile,
            student_average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::registration;

    fn scores(entries: Vec<(i64, Vec<f64>)>) -> HashMap<i64, Vec<f64>> {
        entries.into_iter().collect()
    }

    fn modules<'a>(codes: &[&'a str]) -> HashSet<&'a str> {
        codes.iter().copied().collect()
    }

    #[test]
    fn test_tied_averages_share_percentile() {
        let regs = vec![
            registration(1, "AAA", false),
            registration(2, "AAA", false),
            registration(3, "AAA", false),
        ];
        let per_student = scores(vec![(1, vec![90.0]), (2, vec![80.0]), (3, vec![70.0, 90.0])]);
        let ranker = PeerGroupRanker::new(&regs);

        let second = ranker.rank(2, &modules(&["AAA"]), &per_student).unwrap();
        let third = ranker.rank(3, &modules(&["AAA"]), &per_student).unwrap();

        assert_eq!(second.position, 2);
        assert_eq!(third.position, 3);
        assert_eq!(third.total, 3);
        assert_eq!(third.student_average, 80.0);
        assert_eq!(second.percentile, third.percentile);
        assert!((third.percentile - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_any_shared_module_makes_a_peer() {
        let regs = vec![
            registration(1, "AAA", false),
            registration(1, "BBB", true),
            registration(2, "BBB", false),
            registration(3, "CCC", false),
        ];
        let ranker = PeerGroupRanker::new(&regs);

        let peers = ranker.peers(&modules(&["AAA", "BBB"]));
        assert_eq!(peers, HashSet::from([1, 2]));
    }

    #[test]
    fn test_peer_average_spans_all_scores() {
        let regs = vec![registration(1, "AAA", false), registration(2, "AAA", false)];
        // Student 2 scores highly in another module; it still counts.
        let per_student = scores(vec![(1, vec![70.0]), (2, vec![40.0, 100.0, 100.0])]);
        let ranker = PeerGroupRanker::new(&regs);

        let rank = ranker.rank(1, &modules(&["AAA"]), &per_student).unwrap();
        assert_eq!(rank.position, 2);
        assert_eq!(rank.percentile, 25.0);
    }

    #[test]
    fn test_peers_without_scores_are_left_out() {
        let regs = vec![registration(1, "AAA", false), registration(2, "AAA", false)];
        let per_student = scores(vec![(1, vec![70.0])]);
        let ranker = PeerGroupRanker::new(&regs);

        let rank = ranker.rank(1, &modules(&["AAA"]), &per_student).unwrap();
        assert_eq!(rank.position, 1);
        assert_eq!(rank.total, 1);
        assert_eq!(rank.percentile, 50.0);
    }

    #[test]
    fn test_student_without_scores() {
        let regs = vec![registration(1, "AAA", false)];
        let ranker = PeerGroupRanker::new(&regs);
        let err = ranker
            .rank(1, &modules(&["AAA"]), &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::NotFound(_)));
    }

    #[test]
    fn test_student_without_modules() {
        let ranker = PeerGroupRanker::new(&[]);
        let per_student = scores(vec![(1, vec![70.0])]);
        let err = ranker.rank(1, &HashSet::new(), &per_student).unwrap_err();
        assert!(matches!(err, AnalyticsError::NotFound(_)));
    }

    #[test]
    fn test_student_outside_population() {
        let regs = vec![registration(2, "AAA", false)];
        let per_student = scores(vec![(1, vec![70.0]), (2, vec![60.0])]);
        let ranker = PeerGroupRanker::new(&regs);

        let err = ranker.rank(1, &modules(&["AAA"]), &per_student).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::NotFound("Student 1 not found in peer population".to_string())
        );
    }
}
