use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use uuid::Uuid;

use crate::helper::error_chain_fmt;
use crate::ports::agent_repository::{AgentRepository, AgentRepositoryError};
use crate::use_cases::log_consumption::{
    LogConsumptionError, LogConsumptionUseCase, DEFAULT_HISTORY_LIMIT,
};

#[tracing::instrument(name = "Agent profile handler", skip(agent_repository))]
pub async fn get_agent(
    agent_repository: web::Data<dyn AgentRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AgentProfileError> {
    let agent_id = path.into_inner();

    let agent = agent_repository
        .get(agent_id)
        .await?
        .ok_or(AgentProfileError::AgentNotFound(agent_id))?;

    Ok(HttpResponse::Ok().json(agent))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQueryParams {
    pub limit: Option<usize>,
}

#[tracing::instrument(name = "Consumption history handler", skip(log_consumption))]
pub async fn get_agent_history(
    log_consumption: web::Data<LogConsumptionUseCase>,
    path: web::Path<Uuid>,
    query: web::Query<HistoryQueryParams>,
) -> Result<HttpResponse, AgentProfileError> {
    let history = log_consumption
        .history(
            path.into_inner(),
            query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
        )
        .await?;

    Ok(HttpResponse::Ok().json(history))
}

#[derive(thiserror::Error)]
pub enum AgentProfileError {
    #[error("Agent {0} does not exist")]
    AgentNotFound(Uuid),
    #[error(transparent)]
    RepositoryError(#[from] AgentRepositoryError),
    #[error(transparent)]
    HistoryError(#[from] LogConsumptionError),
}

impl std::fmt::Debug for AgentProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AgentProfileError {
    fn status_code(&self) -> StatusCode {
        match self {
            AgentProfileError::AgentNotFound(_)
            | AgentProfileError::HistoryError(LogConsumptionError::AgentNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AgentProfileError::RepositoryError(_) | AgentProfileError::HistoryError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
