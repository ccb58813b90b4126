use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::json;
use uuid::Uuid;

use crate::helper::error_chain_fmt;
use crate::use_cases::log_consumption::{
    LogConsumptionError, LogConsumptionRequest, LogConsumptionUseCase,
};

fn default_completion_percentage() -> f64 {
    100.0
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct ConsumptionBodyData {
    pub content_id: Uuid,
    pub watch_duration_seconds: Option<f64>,
    #[serde(default = "default_completion_percentage")]
    pub completion_percentage: f64,
    pub rating: Option<u8>,
    pub feedback: Option<String>,
    #[serde(default)]
    pub learned_concepts: Vec<String>,
}

#[tracing::instrument(name = "Log consumption handler", skip(log_consumption, body), fields(content_id = %body.content_id))]
pub async fn log_consumption(
    log_consumption: web::Data<LogConsumptionUseCase>,
    path: web::Path<Uuid>,
    body: web::Json<ConsumptionBodyData>,
) -> Result<HttpResponse, ConsumptionError> {
    let body = body.into_inner();

    let record = log_consumption
        .execute(
            path.into_inner(),
            LogConsumptionRequest {
                content_id: body.content_id,
                watch_duration_seconds: body.watch_duration_seconds,
                completion_percentage: body.completion_percentage,
                rating: body.rating,
                feedback: body.feedback,
                learned_concepts: body.learned_concepts,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(record))
}

#[derive(thiserror::Error)]
pub enum ConsumptionError {
    #[error(transparent)]
    EngineError(#[from] LogConsumptionError),
}

impl std::fmt::Debug for ConsumptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ConsumptionError {
    fn status_code(&self) -> StatusCode {
        match self {
            ConsumptionError::EngineError(
                LogConsumptionError::AgentNotFound(_) | LogConsumptionError::ContentNotFound(_),
            ) => StatusCode::NOT_FOUND,
            ConsumptionError::EngineError(LogConsumptionError::InvalidRecord(_)) => {
                StatusCode::BAD_REQUEST
            }
            ConsumptionError::EngineError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json!({ "error": self.to_string() }))
    }
}
