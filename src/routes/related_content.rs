use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use uuid::Uuid;

use crate::helper::error_chain_fmt;
use crate::use_cases::generate_feed::DEFAULT_PAGE_SIZE;
use crate::use_cases::related_content::{RelatedContentError, RelatedContentUseCase};

#[derive(Debug, Deserialize)]
pub struct RelatedQueryParams {
    pub limit: Option<usize>,
}

#[tracing::instrument(name = "Related content handler", skip(related_content))]
pub async fn get_related_content(
    related_content: web::Data<RelatedContentUseCase>,
    path: web::Path<Uuid>,
    query: web::Query<RelatedQueryParams>,
) -> Result<HttpResponse, RelatedLookupError> {
    let related = related_content
        .execute(
            path.into_inner(),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;

    Ok(HttpResponse::Ok().json(related))
}

#[derive(thiserror::Error)]
pub enum RelatedLookupError {
    #[error(transparent)]
    EngineError(#[from] RelatedContentError),
}

impl std::fmt::Debug for RelatedLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for RelatedLookupError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelatedLookupError::EngineError(RelatedContentError::ContentNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            RelatedLookupError::EngineError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
