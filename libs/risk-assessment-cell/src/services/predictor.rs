//! Predictor port: the seam between the scoring ensemble and concrete model runtimes.

use crate::models::{FeatureVector, RiskAssessmentError};

/// A pretrained risk model.
///
/// Implementations are loaded once at startup and shared read-only across
/// requests, so `predict` must be safe to call concurrently.
#[cfg_attr(test, mockall::automock)]
pub trait RiskPredictor: Send + Sync {
    /// Stable identifier used in logs and error reports.
    fn name(&self) -> &'static str;

    /// Number of features the model expects.
    fn input_width(&self) -> usize;

    /// Run inference and return one raw score per risk category.
    ///
    /// # Errors
    /// Returns `RiskAssessmentError::InputShape` if the vector does not match
    /// `input_width`, or `RiskAssessmentError::PredictorFailure` if inference fails.
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, RiskAssessmentError>;
}

/// Reject a feature vector whose width does not match what the model was trained on.
pub(crate) fn check_input_width(
    predictor: &str,
    expected: usize,
    features: &FeatureVector,
) -> Result<(), RiskAssessmentError> {
    if features.len() != expected {
        return Err(RiskAssessmentError::InputShape {
            stage: format!("{} input", predictor),
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}
