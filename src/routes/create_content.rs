use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::{json, Value as JsonValue};
use tracing::info;

use crate::domain::entities::content::ContentType as ContentKind;
use crate::helper::error_chain_fmt;
use crate::use_cases::create_content::{
    CreateContentError, CreateContentRequest, CreateContentUseCase,
};

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct CreateContentBodyData {
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentKind,
    pub source_url: Option<String>,
    pub transcript: Option<String>,
    pub raw_text: Option<String>,
    pub summary: Option<String>,
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: JsonValue,
}

#[tracing::instrument(name = "Create content handler", skip(create_content, body), fields(title = %body.title))]
pub async fn create_content(
    create_content: web::Data<CreateContentUseCase>,
    body: web::Json<CreateContentBodyData>,
) -> Result<HttpResponse, ContentCreationError> {
    let body = body.into_inner();

    let content = create_content
        .execute(CreateContentRequest {
            title: body.title,
            description: body.description,
            content_type: body.content_type,
            source_url: body.source_url,
            transcript: body.transcript,
            raw_text: body.raw_text,
            summary: body.summary,
            duration_seconds: body.duration_seconds,
            tags: body.tags,
            metadata: body.metadata,
        })
        .await?;

    info!(content_id = %content.id, "Successfully created content");
    Ok(HttpResponse::Ok().json(content))
}

#[derive(thiserror::Error)]
pub enum ContentCreationError {
    #[error(transparent)]
    EngineError(#[from] CreateContentError),
}

impl std::fmt::Debug for ContentCreationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContentCreationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContentCreationError::EngineError(CreateContentError::InvalidTitle) => {
                StatusCode::BAD_REQUEST
            }
            ContentCreationError::EngineError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json!({ "error": self.to_string() }))
    }
}
