use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::{json, Value as JsonValue};
use tracing::info;

use crate::helper::error_chain_fmt;
use crate::use_cases::register_agent::{
    RegisterAgentError, RegisterAgentRequest, RegisterAgentUseCase,
};

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct RegisterAgentBodyData {
    pub name: String,
    pub description: Option<String>,
    pub agent_type: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub metadata: JsonValue,
}

#[tracing::instrument(name = "Register agent handler", skip(register_agent, body), fields(agent_name = %body.name))]
pub async fn register_agent(
    register_agent: web::Data<RegisterAgentUseCase>,
    body: web::Json<RegisterAgentBodyData>,
) -> Result<HttpResponse, RegistrationError> {
    let body = body.into_inner();

    let agent = register_agent
        .execute(RegisterAgentRequest {
            name: body.name,
            description: body.description,
            agent_type: body.agent_type,
            interests: body.interests,
            metadata: body.metadata,
        })
        .await?;

    info!(agent_id = %agent.id, "Successfully registered agent");
    Ok(HttpResponse::Ok().json(agent))
}

#[derive(thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    EngineError(#[from] RegisterAgentError),
}

impl std::fmt::Debug for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for RegistrationError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegistrationError::EngineError(RegisterAgentError::InvalidName) => {
                StatusCode::BAD_REQUEST
            }
            RegistrationError::EngineError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json!({ "error": self.to_string() }))
    }
}
