use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

// ==============================================================================
// INPUT MODELS
// ==============================================================================

/// Health metrics submitted for a single risk assessment.
///
/// Every field is required. Values are not range-checked here; request
/// validation only guarantees the types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub age: i32,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub blood_pressure_systolic: f64,
    pub blood_pressure_diastolic: f64,
    pub heart_rate: f64,
    pub blood_sugar: f64,
    pub cholesterol: f64,
    pub smoking: bool,
    /// Units per week
    pub alcohol_consumption: f64,
    /// Hours per week
    pub physical_activity_hours: f64,
}

/// Number of features every predictor is fed.
pub const FEATURE_COUNT: usize = 12;

/// Feature names in encoding order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "gender_is_male",
    "height",
    "weight",
    "blood_pressure_systolic",
    "blood_pressure_diastolic",
    "heart_rate",
    "blood_sugar",
    "cholesterol",
    "smoking",
    "alcohol_consumption",
    "physical_activity_hours",
];

/// Fixed-order numeric encoding of [`HealthMetrics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }
}

// ==============================================================================
// RISK MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    HeartDisease,
    Diabetes,
    Stroke,
    Hypertension,
}

pub const RISK_CATEGORY_COUNT: usize = 4;

impl RiskCategory {
    /// Categories in predictor output order.
    pub const ALL: [RiskCategory; RISK_CATEGORY_COUNT] = [
        RiskCategory::HeartDisease,
        RiskCategory::Diabetes,
        RiskCategory::Stroke,
        RiskCategory::Hypertension,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::HeartDisease => "heart_disease",
            RiskCategory::Diabetes => "diabetes",
            RiskCategory::Stroke => "stroke",
            RiskCategory::Hypertension => "hypertension",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            RiskCategory::HeartDisease => 0,
            RiskCategory::Diabetes => 1,
            RiskCategory::Stroke => 2,
            RiskCategory::Hypertension => 3,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Averaged, un-normalized ensemble output, one value per [`RiskCategory`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRiskVector([f64; RISK_CATEGORY_COUNT]);

impl RawRiskVector {
    pub fn new(values: [f64; RISK_CATEGORY_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, category: RiskCategory) -> f64 {
        self.0[category.index()]
    }

    pub fn values(&self) -> &[f64; RISK_CATEGORY_COUNT] {
        &self.0
    }
}

/// Per-category risk on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScores {
    pub heart_disease: i32,
    pub diabetes: i32,
    pub stroke: i32,
    pub hypertension: i32,
}

impl RiskScores {
    pub fn get(&self, category: RiskCategory) -> i32 {
        match category {
            RiskCategory::HeartDisease => self.heart_disease,
            RiskCategory::Diabetes => self.diabetes,
            RiskCategory::Stroke => self.stroke,
            RiskCategory::Hypertension => self.hypertension,
        }
    }
}

// ==============================================================================
// RECOMMENDATION MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Exercise,
    Diet,
    Lifestyle,
    Medical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Exercise,
    Diet,
    Lifestyle,
    Medical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub difficulty: Difficulty,
    pub category: TaskCategory,
    #[serde(default)]
    pub completed: bool,
    pub deadline: Option<DateTime<Utc>>,
}

impl Task {
    /// New, not yet completed task without a deadline.
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        points: u32,
        difficulty: Difficulty,
        category: TaskCategory,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            points,
            difficulty,
            category,
            completed: false,
            deadline: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecommendation {
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub tasks: Vec<Task>,
    pub potential_points: u32,
}

impl HealthRecommendation {
    /// Builds a recommendation whose `potential_points` is the sum of its task points.
    pub fn new(
        recommendation_type: RecommendationType,
        priority: Priority,
        title: &str,
        description: &str,
        impact: &str,
        tasks: Vec<Task>,
    ) -> Self {
        let potential_points = tasks.iter().map(|task| task.points).sum();

        Self {
            recommendation_type,
            priority,
            title: title.to_string(),
            description: description.to_string(),
            impact: impact.to_string(),
            tasks,
            potential_points,
        }
    }
}

// ==============================================================================
// RESULT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentResult {
    pub health_score: i32,
    pub risk_scores: RiskScores,
    pub recommendations: Vec<HealthRecommendation>,
    pub total_available_points: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatus {
    pub status: String,
    pub predictors: Vec<String>,
    pub feature_count: usize,
    pub risk_categories: Vec<RiskCategory>,
    pub rule_count: usize,
}

// ==============================================================================
// ERROR MODELS
// ==============================================================================

#[derive(Error, Debug)]
pub enum RiskAssessmentError {
    #[error("Input shape mismatch in {stage}: expected {expected} values, got {actual}")]
    InputShape {
        stage: String,
        expected: usize,
        actual: usize,
    },

    #[error("Predictor {predictor} failed: {reason}")]
    PredictorFailure { predictor: String, reason: String },

    #[error("Rule evaluation error: {0}")]
    RuleEvaluation(String),

    #[error("Failed to load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },
}

impl From<RiskAssessmentError> for AppError {
    /// Every assessment failure reaches the caller as the same opaque error;
    /// the detail only goes to the logs.
    fn from(err: RiskAssessmentError) -> Self {
        tracing::error!("Risk assessment failed: {}", err);
        AppError::Internal("Risk assessment failed".to_string())
    }
}
