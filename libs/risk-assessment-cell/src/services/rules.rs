//! Recommendation rule table.
//!
//! Each rule pairs a predicate over the submitted metrics with a builder for
//! the recommendation it emits. Rules are evaluated in declaration order,
//! independently of each other, and any number of them may fire.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{
    Difficulty, HealthMetrics, HealthRecommendation, Priority, RecommendationType,
    RiskAssessmentError, RiskScores, Task, TaskCategory,
};

pub type RulePredicate = fn(&HealthMetrics, &RiskScores) -> bool;
pub type RecommendationBuilder = fn() -> HealthRecommendation;

#[derive(Clone, Copy)]
pub struct RecommendationRule {
    pub name: &'static str,
    pub applies: RulePredicate,
    pub build: RecommendationBuilder,
}

impl std::fmt::Debug for RecommendationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationRule")
            .field("name", &self.name)
            .finish()
    }
}

// ==============================================================================
// STANDARD RULES
// ==============================================================================

/// Weekly activity below three hours.
pub const LOW_ACTIVITY: RecommendationRule = RecommendationRule {
    name: "low_activity",
    applies: low_activity_applies,
    build: low_activity_recommendation,
};

/// Systolic above 140 or diastolic above 90.
pub const HIGH_BLOOD_PRESSURE: RecommendationRule = RecommendationRule {
    name: "high_blood_pressure",
    applies: high_blood_pressure_applies,
    build: blood_pressure_recommendation,
};

/// Blood sugar above 100 mg/dL.
pub const HIGH_BLOOD_SUGAR: RecommendationRule = RecommendationRule {
    name: "high_blood_sugar",
    applies: high_blood_sugar_applies,
    build: blood_sugar_recommendation,
};

fn low_activity_applies(metrics: &HealthMetrics, _: &RiskScores) -> bool {
    metrics.physical_activity_hours < 3.0
}

fn high_blood_pressure_applies(metrics: &HealthMetrics, _: &RiskScores) -> bool {
    metrics.blood_pressure_systolic > 140.0 || metrics.blood_pressure_diastolic > 90.0
}

fn high_blood_sugar_applies(metrics: &HealthMetrics, _: &RiskScores) -> bool {
    metrics.blood_sugar > 100.0
}

fn low_activity_recommendation() -> HealthRecommendation {
    HealthRecommendation::new(
        RecommendationType::Exercise,
        Priority::High,
        "Increase Physical Activity",
        "Regular exercise helps improve overall health and reduce health risks.",
        "Reduces risk of heart disease and improves fitness",
        vec![
            Task::new(
                "exercise_1",
                "Daily Walk",
                "Take a 30-minute walk today",
                50,
                Difficulty::Easy,
                TaskCategory::Exercise,
            ),
            Task::new(
                "exercise_2",
                "Strength Training",
                "Complete 15 minutes of basic strength exercises",
                75,
                Difficulty::Medium,
                TaskCategory::Exercise,
            ),
        ],
    )
}

fn blood_pressure_recommendation() -> HealthRecommendation {
    HealthRecommendation::new(
        RecommendationType::Lifestyle,
        Priority::High,
        "Blood Pressure Management",
        "Managing blood pressure is crucial for heart health.",
        "Reduces risk of cardiovascular complications",
        vec![
            Task::new(
                "bp_1",
                "BP Monitoring",
                "Record your blood pressure twice today",
                30,
                Difficulty::Easy,
                TaskCategory::Medical,
            ),
            Task::new(
                "bp_2",
                "Salt Reduction",
                "Keep sodium intake under 2000mg today",
                60,
                Difficulty::Medium,
                TaskCategory::Diet,
            ),
        ],
    )
}

fn blood_sugar_recommendation() -> HealthRecommendation {
    HealthRecommendation::new(
        RecommendationType::Diet,
        Priority::High,
        "Blood Sugar Control",
        "Maintaining healthy blood sugar levels is essential.",
        "Reduces risk of diabetes complications",
        vec![
            Task::new(
                "sugar_1",
                "Glucose Check",
                "Check blood sugar before and after meals",
                40,
                Difficulty::Easy,
                TaskCategory::Medical,
            ),
            Task::new(
                "sugar_2",
                "Carb Control",
                "Stay within your daily carb target",
                80,
                Difficulty::Hard,
                TaskCategory::Diet,
            ),
        ],
    )
}

// ==============================================================================
// ENGINE
// ==============================================================================

#[derive(Debug, Clone)]
pub struct RecommendationRuleEngine {
    rules: Vec<RecommendationRule>,
}

impl Default for RecommendationRuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl RecommendationRuleEngine {
    /// The built-in rule table: low activity, high blood pressure, high blood sugar.
    pub fn standard() -> Self {
        Self {
            rules: vec![LOW_ACTIVITY, HIGH_BLOOD_PRESSURE, HIGH_BLOOD_SUGAR],
        }
    }

    /// Build an engine from a custom rule table.
    ///
    /// Every builder is run once up front, so a malformed table is rejected
    /// here instead of surfacing mid-request.
    ///
    /// # Errors
    /// Returns `RiskAssessmentError::RuleEvaluation` for duplicate rule names,
    /// rules without tasks, zero-point tasks, or task ids shared between rules.
    pub fn with_rules(rules: Vec<RecommendationRule>) -> Result<Self, RiskAssessmentError> {
        let engine = Self { rules };
        engine.validate()?;
        Ok(engine)
    }

    pub fn rules(&self) -> &[RecommendationRule] {
        &self.rules
    }

    pub fn validate(&self) -> Result<(), RiskAssessmentError> {
        let mut rule_names = HashSet::new();
        let mut task_ids = HashSet::new();

        for rule in &self.rules {
            if !rule_names.insert(rule.name) {
                return Err(RiskAssessmentError::RuleEvaluation(format!(
                    "duplicate rule name {}",
                    rule.name
                )));
            }

            let recommendation = (rule.build)();
            if recommendation.tasks.is_empty() {
                return Err(RiskAssessmentError::RuleEvaluation(format!(
                    "rule {} emits no tasks",
                    rule.name
                )));
            }

            for task in &recommendation.tasks {
                if task.points == 0 {
                    return Err(RiskAssessmentError::RuleEvaluation(format!(
                        "task {} in rule {} has no points",
                        task.id, rule.name
                    )));
                }
                if !task_ids.insert(task.id.clone()) {
                    return Err(RiskAssessmentError::RuleEvaluation(format!(
                        "task id {} is used by more than one task",
                        task.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Evaluate every rule against the metrics and collect what fires, in table order.
    pub fn generate(
        &self,
        metrics: &HealthMetrics,
        risk_scores: &RiskScores,
    ) -> Vec<HealthRecommendation> {
        self.rules
            .iter()
            .filter(|rule| {
                let fired = (rule.applies)(metrics, risk_scores);
                debug!("Rule {} fired: {}", rule.name, fired);
                fired
            })
            .map(|rule| (rule.build)())
            .collect()
    }
}
