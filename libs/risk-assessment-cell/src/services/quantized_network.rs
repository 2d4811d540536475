//! Int8-quantized feed-forward network loaded from a JSON export.
//!
//! Inputs are standardized with the training scaler, then each dense layer
//! dequantizes its weights with a per-layer scale. Arithmetic runs in f32.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::{FeatureVector, RiskAssessmentError, FEATURE_COUNT, RISK_CATEGORY_COUNT};
use crate::services::predictor::{check_input_width, RiskPredictor};

const PREDICTOR_NAME: &str = "quantized_neural_network";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    Linear,
}

impl Activation {
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Linear => x,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    /// Row-major `[out][in]`
    pub weights: Vec<Vec<i8>>,
    pub weight_scale: f32,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

impl DenseLayer {
    fn input_width(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or(0)
    }

    fn output_width(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                let sum: f32 = row
                    .iter()
                    .zip(input)
                    .map(|(w, x)| f32::from(*w) * self.weight_scale * x)
                    .sum();
                self.activation.apply(sum + bias)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantizedNetwork {
    pub input_mean: Vec<f32>,
    pub input_scale: Vec<f32>,
    pub layers: Vec<DenseLayer>,
}

impl QuantizedNetwork {
    /// Load and validate a network export from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RiskAssessmentError> {
        let path = path.as_ref();
        let location = path.display().to_string();

        let contents = fs::read_to_string(path).map_err(|e| RiskAssessmentError::ModelLoad {
            path: location.clone(),
            reason: e.to_string(),
        })?;

        let network = Self::from_json(&contents).map_err(|e| match e {
            RiskAssessmentError::ModelLoad { reason, .. } => RiskAssessmentError::ModelLoad {
                path: location.clone(),
                reason,
            },
            other => other,
        })?;

        info!(
            "Loaded quantized network from {} ({} layers, {} -> {})",
            location,
            network.layers.len(),
            network.input_width(),
            network.output_width()
        );

        Ok(network)
    }

    /// Parse and validate a network export.
    pub fn from_json(json: &str) -> Result<Self, RiskAssessmentError> {
        let network: Self =
            serde_json::from_str(json).map_err(|e| RiskAssessmentError::ModelLoad {
                path: "<inline>".to_string(),
                reason: format!("invalid network JSON: {}", e),
            })?;
        network.validate()?;
        Ok(network)
    }

    pub fn output_width(&self) -> usize {
        self.layers.last().map(DenseLayer::output_width).unwrap_or(0)
    }

    fn validate(&self) -> Result<(), RiskAssessmentError> {
        let invalid = |reason: String| RiskAssessmentError::ModelLoad {
            path: "<inline>".to_string(),
            reason,
        };

        if self.layers.is_empty() {
            return Err(invalid("network has no layers".to_string()));
        }
        if self.input_mean.len() != self.input_scale.len() {
            return Err(invalid(format!(
                "input_mean has {} values but input_scale has {}",
                self.input_mean.len(),
                self.input_scale.len()
            )));
        }
        if self.input_scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(invalid("input_scale values must be finite and non-zero".to_string()));
        }

        let mut width = self.input_mean.len();
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.weights.is_empty() {
                return Err(invalid(format!("layer {} has no output units", index)));
            }
            if layer.weights.iter().any(|row| row.len() != width) {
                return Err(invalid(format!(
                    "layer {} expects {} inputs per unit",
                    index, width
                )));
            }
            if layer.bias.len() != layer.output_width() {
                return Err(invalid(format!(
                    "layer {} has {} biases for {} units",
                    index,
                    layer.bias.len(),
                    layer.output_width()
                )));
            }
            width = layer.output_width();
        }

        if self.input_width() != FEATURE_COUNT {
            warn!(
                "Quantized network expects {} features, encoder produces {}",
                self.input_width(),
                FEATURE_COUNT
            );
        }
        if self.output_width() != RISK_CATEGORY_COUNT {
            warn!(
                "Quantized network has {} outputs, expected {}",
                self.output_width(),
                RISK_CATEGORY_COUNT
            );
        }

        Ok(())
    }
}

impl RiskPredictor for QuantizedNetwork {
    fn name(&self) -> &'static str {
        PREDICTOR_NAME
    }

    fn input_width(&self) -> usize {
        self.layers
            .first()
            .map(DenseLayer::input_width)
            .unwrap_or(self.input_mean.len())
    }

    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, RiskAssessmentError> {
        check_input_width(PREDICTOR_NAME, self.input_width(), features)?;

        let mut activations: Vec<f32> = features
            .as_slice()
            .iter()
            .zip(self.input_mean.iter().zip(&self.input_scale))
            .map(|(x, (mean, scale))| (*x as f32 - mean) / scale)
            .collect();

        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        debug!("{} raw output: {:?}", PREDICTOR_NAME, activations);
        Ok(activations.into_iter().map(f64::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn identity_network() -> serde_json::Value {
        // One linear layer: output k = 0.5 * standardized input k, for k < 4.
        let weights: Vec<Vec<i8>> = (0..4)
            .map(|row| (0..12).map(|col| if row == col { 64 } else { 0 }).collect())
            .collect();

        json!({
            "input_mean": vec![0.0; 12],
            "input_scale": vec![1.0; 12],
            "layers": [{
                "weights": weights,
                "weight_scale": 1.0 / 128.0,
                "bias": [0.0, 0.0, 0.0, 0.1],
                "activation": "linear"
            }]
        })
    }

    #[test]
    fn test_forward_dequantizes_weights() {
        let network = QuantizedNetwork::from_json(&identity_network().to_string()).unwrap();
        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 2.0;
        values[1] = -1.0;

        let output = network.predict(&FeatureVector::new(values)).unwrap();

        assert_eq!(output.len(), 4);
        assert!((output[0] - 1.0).abs() < 1e-6);
        assert!((output[1] + 0.5).abs() < 1e-6);
        assert!((output[3] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_standardizes_inputs() {
        let mut export = identity_network();
        export["input_mean"][0] = json!(50.0);
        export["input_scale"][0] = json!(10.0);
        let network = QuantizedNetwork::from_json(&export.to_string()).unwrap();

        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 70.0;
        let output = network.predict(&FeatureVector::new(values)).unwrap();

        // (70 - 50) / 10 = 2.0, times 0.5
        assert!((output[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_relu_and_sigmoid_activations() {
        assert_eq!(Activation::Relu.apply(-3.0), 0.0);
        assert_eq!(Activation::Relu.apply(2.5), 2.5);
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-6);
        assert_eq!(Activation::Linear.apply(-1.25), -1.25);
    }

    #[test]
    fn test_rejects_broken_layer_chain() {
        let mut export = identity_network();
        export["layers"][0]["bias"] = json!([0.0, 0.0]);

        let result = QuantizedNetwork::from_json(&export.to_string());
        assert_matches!(result, Err(RiskAssessmentError::ModelLoad { reason, .. }) if reason.contains("biases"));
    }

    #[test]
    fn test_rejects_zero_scale() {
        let mut export = identity_network();
        export["input_scale"][3] = json!(0.0);

        let result = QuantizedNetwork::from_json(&export.to_string());
        assert_matches!(result, Err(RiskAssessmentError::ModelLoad { .. }));
    }

    #[test]
    fn test_width_mismatch_is_input_shape_error() {
        let export = json!({
            "input_mean": vec![0.0; 10],
            "input_scale": vec![1.0; 10],
            "layers": [{
                "weights": vec![vec![1i8; 10]; 4],
                "weight_scale": 0.01,
                "bias": [0.0, 0.0, 0.0, 0.0],
                "activation": "sigmoid"
            }]
        });
        let network = QuantizedNetwork::from_json(&export.to_string()).unwrap();

        let result = network.predict(&FeatureVector::new([0.0; FEATURE_COUNT]));
        assert_matches!(
            result,
            Err(RiskAssessmentError::InputShape { expected: 10, actual: 12, .. })
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", identity_network()).unwrap();

        let network = QuantizedNetwork::from_file(file.path()).unwrap();
        assert_eq!(network.input_width(), 12);
        assert_eq!(network.output_width(), 4);

        let missing = QuantizedNetwork::from_file("/nonexistent/network.json");
        assert_matches!(missing, Err(RiskAssessmentError::ModelLoad { path, .. }) if path == "/nonexistent/network.json");
    }
}
