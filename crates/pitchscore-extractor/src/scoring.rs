//! Overall score derived from the section sub-scores

use pitchscore_domain::{CriteriaMatrix, Score, ScorecardRecord};

/// Mean of a section's rated leaf scores; 0 when nothing is rated
pub fn section_score(matrix: &CriteriaMatrix) -> f64 {
    let (sum, count) = matrix
        .rated_scores()
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Unweighted mean of the five section sub-scores, rounded to two decimals
///
/// Sections: ProductMarketFit, GTMExecution, SupplyChainOps, BusinessModel,
/// FoundersEvaluation. A section without rated criteria counts as 0.
pub fn derive_overall_score(record: &ScorecardRecord) -> Score {
    let sections = record.scored_sections();
    let total: f64 = sections.iter().map(|(_, m)| section_score(m)).sum();
    let mean = total / sections.len() as f64;
    Score::new((mean * 100.0).round() / 100.0)
}

/// Replace the model's overall score with the derived one
pub fn apply_derived_score(record: &mut ScorecardRecord) {
    record.overall_score = derive_overall_score(record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchscore_domain::ScoredCriterion;

    fn matrix(scores: &[Score]) -> CriteriaMatrix {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| ScoredCriterion::new(format!("c{}", i), *s, Vec::new()))
            .collect()
    }

    #[test]
    fn test_section_score_mean() {
        let m = matrix(&[Score::Rated(80.0), Score::Rated(60.0), Score::Unrated]);
        assert_eq!(section_score(&m), 70.0);
        assert_eq!(section_score(&CriteriaMatrix::default()), 0.0);
        assert_eq!(section_score(&matrix(&[Score::Unrated])), 0.0);
    }

    #[test]
    fn test_derived_score_counts_empty_sections_as_zero() {
        let record = ScorecardRecord {
            product_market_fit: matrix(&[Score::Rated(80.0)]),
            gtm_execution: matrix(&[Score::Rated(70.0)]),
            founders: matrix(&[Score::Rated(90.0)]),
            ..Default::default()
        };
        // (80 + 70 + 0 + 0 + 90) / 5
        assert_eq!(derive_overall_score(&record), Score::Rated(48.0));
    }

    #[test]
    fn test_derived_score_rounds_to_two_decimals() {
        let record = ScorecardRecord {
            product_market_fit: matrix(&[Score::Rated(100.0), Score::Rated(0.0), Score::Rated(0.0)]),
            ..Default::default()
        };
        // 33.333.../5 = 6.666...
        assert_eq!(derive_overall_score(&record), Score::Rated(6.67));
    }

    #[test]
    fn test_apply_overrides_model_score() {
        let mut record = ScorecardRecord {
            overall_score: Score::Rated(99.0),
            business_model: matrix(&[Score::Rated(50.0)]),
            ..Default::default()
        };
        apply_derived_score(&mut record);
        assert_eq!(record.overall_score, Score::Rated(10.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use pitchscore_domain::ScoredCriterion;
    use proptest::prelude::*;

    fn arb_matrix() -> impl Strategy<Value = CriteriaMatrix> {
        proptest::collection::vec(proptest::option::of(0.0f64..=100.0), 0..6).prop_map(|scores| {
            scores
                .into_iter()
                .map(|s| ScoredCriterion::new("c", s.map(Score::new).unwrap_or_default(), Vec::new()))
                .collect()
        })
    }

    proptest! {
        /// Property: derived score is deterministic, in range and has at
        /// most two decimals
        #[test]
        fn test_derived_score_bounds(
            a in arb_matrix(), b in arb_matrix(), c in arb_matrix(),
            d in arb_matrix(), e in arb_matrix(),
        ) {
            let record = ScorecardRecord {
                product_market_fit: a,
                gtm_execution: b,
                supply_chain_ops: c,
                business_model: d,
                founders: e,
                ..Default::default()
            };

            let score = derive_overall_score(&record);
            prop_assert_eq!(score, derive_overall_score(&record));

            let value = score.value().unwrap();
            prop_assert!((0.0..=100.0).contains(&value));
            prop_assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-6);
        }
    }
}
