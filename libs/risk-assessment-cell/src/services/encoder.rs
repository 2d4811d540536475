use crate::models::{FeatureVector, HealthMetrics};

/// Encode health metrics into the fixed feature order the predictors were trained on.
///
/// Gender is a binary flag: a case-insensitive match on `"male"` encodes as 1,
/// anything else as 0. Values are passed through unchanged, including
/// out-of-range ones.
pub fn encode(metrics: &HealthMetrics) -> FeatureVector {
    FeatureVector::new([
        f64::from(metrics.age),
        flag(metrics.gender.eq_ignore_ascii_case("male")),
        metrics.height,
        metrics.weight,
        metrics.blood_pressure_systolic,
        metrics.blood_pressure_diastolic,
        metrics.heart_rate,
        metrics.blood_sugar,
        metrics.cholesterol,
        flag(metrics.smoking),
        metrics.alcohol_consumption,
        metrics.physical_activity_hours,
    ])
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
