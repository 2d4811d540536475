use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{error, instrument};

use shared_models::error::AppError;

use crate::models::{HealthMetrics, PipelineStatus, RiskAssessmentResult};
use crate::services::RiskAssessmentPipeline;

#[instrument(skip(pipeline, payload))]
pub async fn predict_risk(
    State(pipeline): State<Arc<RiskAssessmentPipeline>>,
    payload: Result<Json<HealthMetrics>, JsonRejection>,
) -> Result<Json<RiskAssessmentResult>, AppError> {
    let Json(metrics) = payload.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;

    // Inference is CPU-bound; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || pipeline.assess(&metrics))
        .await
        .map_err(|e| {
            error!("Risk assessment task panicked or was cancelled: {}", e);
            AppError::Internal("Risk assessment failed".to_string())
        })??;

    Ok(Json(result))
}

#[instrument(skip(pipeline))]
pub async fn pipeline_status(
    State(pipeline): State<Arc<RiskAssessmentPipeline>>,
) -> Json<PipelineStatus> {
    Json(pipeline.status())
}
