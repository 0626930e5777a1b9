use crate::models::{CandidateCondition, ConfidenceBands};

/// Lowest confidence counted as high.
pub const HIGH_THRESHOLD: u8 = 70;
/// Lowest confidence counted as medium.
pub const MEDIUM_THRESHOLD: u8 = 40;

/// Distribute diagnostic weight over high/medium/low bands.
///
/// Each condition contributes `confidence / total` to the band its own
/// confidence falls in. Empty or zero-total input yields
/// [`ConfidenceBands::DEFAULT`]. Bands are renormalized and rounded to two
/// decimals.
pub fn calculate_confidence_scores(conditions: &[CandidateCondition]) -> ConfidenceBands {
    let total: f64 = conditions.iter().map(|c| f64::from(c.confidence)).sum();
    if conditions.is_empty() || total <= 0.0 {
        return ConfidenceBands::DEFAULT;
    }

    let (mut high, mut medium, mut low) = (0.0_f64, 0.0_f64, 0.0_f64);
    for c in conditions {
        let weight = f64::from(c.confidence) / total;
        if c.confidence >= HIGH_THRESHOLD {
            high += weight;
        } else if c.confidence >= MEDIUM_THRESHOLD {
            medium += weight;
        } else {
            low += weight;
        }
    }

    let sum = high + medium + low;
    if sum > 0.0 {
        high /= sum;
        medium /= sum;
        low /= sum;
    }

    ConfidenceBands {
        high: round2(high),
        medium: round2(medium),
        low: round2(low),
    }
}

/// Two-decimal rounding, halves to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UrgencyTier;

    fn cond(confidence: u8) -> CandidateCondition {
        CandidateCondition {
            condition: format!("c{confidence}"),
            confidence,
            explanation: String::new(),
            urgency: UrgencyTier::Routine,
            specialty: "Primary Care".into(),
        }
    }

    #[test]
    fn empty_list_gets_default() {
        assert_eq!(calculate_confidence_scores(&[]), ConfidenceBands::DEFAULT);
    }

    #[test]
    fn zero_total_gets_default() {
        assert_eq!(
            calculate_confidence_scores(&[cond(0), cond(0)]),
            ConfidenceBands::DEFAULT
        );
    }

    #[test]
    fn weights_split_by_threshold() {
        let bands = calculate_confidence_scores(&[cond(90), cond(40)]);
        assert_eq!(bands.high, 0.69);
        assert_eq!(bands.medium, 0.31);
        assert_eq!(bands.low, 0.0);
    }

    #[test]
    fn threshold_boundaries() {
        let bands = calculate_confidence_scores(&[cond(70), cond(69), cond(39)]);
        // 70 -> high, 69 -> medium, 39 -> low; total 178
        assert_eq!(bands.high, 0.39);
        assert_eq!(bands.medium, 0.39);
        assert_eq!(bands.low, 0.22);
    }

    #[test]
    fn single_low_condition_takes_all_weight() {
        let bands = calculate_confidence_scores(&[cond(25)]);
        assert_eq!(bands.low, 1.0);
        assert_eq!(bands.high + bands.medium, 0.0);
    }

    #[test]
    fn bands_sum_to_one_for_many_inputs() {
        let samples: Vec<Vec<u8>> = vec![
            vec![95, 60, 30],
            vec![33, 33, 34],
            vec![1, 2, 3, 4, 5],
            vec![100, 100, 100, 45, 10],
            vec![71, 41, 11],
            vec![88],
        ];
        for confidences in samples {
            let conditions: Vec<_> = confidences.iter().copied().map(cond).collect();
            let bands = calculate_confidence_scores(&conditions);
            // compare in hundredths; 0.85 + 0.13 + 0.03 is not exactly 1.01 in f64
            let hundredths = (bands.total() * 100.0).round();
            assert!((hundredths - 100.0).abs() <= 1.0, "{confidences:?} -> {bands:?}");
        }
    }

    #[test]
    fn half_hundredths_round_to_even() {
        // weights are exactly 0.5 / 0.375 / 0.125
        let bands = calculate_confidence_scores(&[cond(80), cond(60), cond(20)]);
        assert_eq!(bands.high, 0.5);
        assert_eq!(bands.medium, 0.38);
        assert_eq!(bands.low, 0.12);
        assert!((bands.total() - 1.0).abs() <= 0.01);
    }

    #[test]
    fn order_does_not_matter() {
        let a = calculate_confidence_scores(&[cond(80), cond(50), cond(20)]);
        let b = calculate_confidence_scores(&[cond(20), cond(80), cond(50)]);
        assert_eq!(a, b);
    }
}
