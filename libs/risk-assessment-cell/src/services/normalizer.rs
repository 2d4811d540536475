use crate::models::{RawRiskVector, RiskCategory, RiskScores};

/// Scale a raw risk in `[0, 1]` to an integer percentage clamped into `[0, 100]`.
///
/// The scaled value is truncated toward zero before clamping.
pub fn normalize(raw: f64) -> i32 {
    // `as` saturates on overflow and maps NaN to 0.
    let truncated = (raw * 100.0).trunc() as i64;
    truncated.clamp(0, 100) as i32
}

pub fn risk_scores(raw: &RawRiskVector) -> RiskScores {
    RiskScores {
        heart_disease: normalize(raw.get(RiskCategory::HeartDisease)),
        diabetes: normalize(raw.get(RiskCategory::Diabetes)),
        stroke: normalize(raw.get(RiskCategory::Stroke)),
        hypertension: normalize(raw.get(RiskCategory::Hypertension)),
    }
}

/// `100 - mean(normalize(r))`, truncated to an integer.
///
/// Not clamped: each category is already bounded, so the result stays in
/// `[0, 100]`. The bounds tests below pin that down.
pub fn health_score(raw: &RawRiskVector) -> i32 {
    let values = raw.values();
    let total: i32 = values.iter().map(|r| normalize(*r)).sum();
    let mean = f64::from(total) / values.len() as f64;
    (100.0 - mean).trunc() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fixed_points() {
        assert_eq!(normalize(0.0), 0);
        assert_eq!(normalize(1.0), 100);
        assert_eq!(normalize(-5.0), 0);
        assert_eq!(normalize(2.0), 100);
    }

    #[test]
    fn test_normalize_truncates() {
        assert_eq!(normalize(0.129), 12);
        assert_eq!(normalize(0.999), 99);
        assert_eq!(normalize(-0.009), 0);
    }

    #[test]
    fn test_normalize_is_monotonic_and_bounded() {
        let mut previous = normalize(-2.0);
        let mut raw = -2.0;
        while raw <= 3.0 {
            let current = normalize(raw);
            assert!((0..=100).contains(&current), "normalize({}) = {}", raw, current);
            assert!(current >= previous, "normalize not monotonic at {}", raw);
            previous = current;
            raw += 0.001;
        }
    }

    #[test]
    fn test_normalize_extremes() {
        assert_eq!(normalize(f64::INFINITY), 100);
        assert_eq!(normalize(f64::NEG_INFINITY), 0);
        assert_eq!(normalize(f64::NAN), 0);
    }

    #[test]
    fn test_health_score_example() {
        let raw = RawRiskVector::new([0.1, 0.2, 0.3, 0.4]);

        let scores = risk_scores(&raw);
        assert_eq!(
            scores,
            RiskScores {
                heart_disease: 10,
                diabetes: 20,
                stroke: 30,
                hypertension: 40,
            }
        );
        assert_eq!(health_score(&raw), 75);
    }

    #[test]
    fn test_health_score_truncates_fractional_mean() {
        // mean(10, 20, 30, 41) = 25.25
        let raw = RawRiskVector::new([0.1, 0.2, 0.3, 0.415]);
        assert_eq!(health_score(&raw), 74);
    }

    #[test]
    fn test_health_score_bounds() {
        assert_eq!(health_score(&RawRiskVector::new([-1.0; 4])), 100);
        assert_eq!(health_score(&RawRiskVector::new([5.0; 4])), 0);
        assert_eq!(health_score(&RawRiskVector::new([0.0; 4])), 100);
        assert_eq!(health_score(&RawRiskVector::new([1.0; 4])), 0);

        for a in [-3.0, 0.0, 0.25, 0.5, 0.99, 1.0, 7.0] {
            for b in [-1.0, 0.33, 0.75, 2.0] {
                let score = health_score(&RawRiskVector::new([a, b, a, b]));
                assert!((0..=100).contains(&score), "health_score out of bounds: {}", score);
            }
        }
    }
}
