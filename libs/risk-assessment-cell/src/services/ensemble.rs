use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::models::{FeatureVector, RawRiskVector, RiskAssessmentError, RISK_CATEGORY_COUNT};
use crate::services::predictor::RiskPredictor;

/// Averages a gradient-boosted tree model and a quantized network per risk category.
///
/// Both predictors are injected so callers decide where they come from. A
/// failure in either one fails the whole score; there is no single-model fallback.
pub struct RiskScoringEnsemble {
    gradient_boosted: Arc<dyn RiskPredictor>,
    neural_network: Arc<dyn RiskPredictor>,
}

impl RiskScoringEnsemble {
    pub fn new(
        gradient_boosted: Arc<dyn RiskPredictor>,
        neural_network: Arc<dyn RiskPredictor>,
    ) -> Self {
        Self {
            gradient_boosted,
            neural_network,
        }
    }

    pub fn predictor_names(&self) -> Vec<String> {
        vec![
            self.gradient_boosted.name().to_string(),
            self.neural_network.name().to_string(),
        ]
    }

    /// Element-wise mean of both predictors' outputs.
    pub fn score(&self, features: &FeatureVector) -> Result<RawRiskVector, RiskAssessmentError> {
        let boosted = run_predictor(self.gradient_boosted.as_ref(), features)?;
        let network = run_predictor(self.neural_network.as_ref(), features)?;

        let mut averaged = [0.0; RISK_CATEGORY_COUNT];
        for (slot, (a, b)) in averaged.iter_mut().zip(boosted.iter().zip(&network)) {
            *slot = (a + b) / 2.0;
        }

        debug!("Ensemble raw risk vector: {:?}", averaged);
        Ok(RawRiskVector::new(averaged))
    }
}

impl fmt::Debug for RiskScoringEnsemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiskScoringEnsemble")
            .field("gradient_boosted", &self.gradient_boosted.name())
            .field("neural_network", &self.neural_network.name())
            .finish()
    }
}

fn run_predictor(
    predictor: &dyn RiskPredictor,
    features: &FeatureVector,
) -> Result<[f64; RISK_CATEGORY_COUNT], RiskAssessmentError> {
    let output = predictor.predict(features)?;

    if output.len() != RISK_CATEGORY_COUNT {
        return Err(RiskAssessmentError::InputShape {
            stage: format!("{} output", predictor.name()),
            expected: RISK_CATEGORY_COUNT,
            actual: output.len(),
        });
    }

    if let Some(bad) = output.iter().find(|value| !value.is_finite()) {
        return Err(RiskAssessmentError::PredictorFailure {
            predictor: predictor.name().to_string(),
            reason: format!("non-finite score {}", bad),
        });
    }

    let mut scores = [0.0; RISK_CATEGORY_COUNT];
    scores.copy_from_slice(&output);
    Ok(scores)
}
