use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use tracing::info;

use crate::domain::entities::content::ContentType;
use crate::helper::error_chain_fmt;
use crate::use_cases::semantic_search::{SemanticSearchError, SemanticSearchUseCase};
use crate::use_cases::view_content::DEFAULT_LISTING_SIZE;

#[derive(Debug, Deserialize)]
pub struct SearchQueryParams {
    pub q: String,
    pub limit: Option<usize>,
    pub content_type: Option<ContentType>,
}

#[tracing::instrument(name = "Semantic search handler", skip(semantic_search))]
pub async fn search_content(
    semantic_search: web::Data<SemanticSearchUseCase>,
    query: web::Query<SearchQueryParams>,
) -> Result<HttpResponse, SearchError> {
    let query = query.into_inner();
    info!("Searching contents for query: {}", query.q);

    let results = semantic_search
        .execute(
            &query.q,
            query.limit.unwrap_or(DEFAULT_LISTING_SIZE),
            query.content_type,
        )
        .await?;

    Ok(HttpResponse::Ok().json(results))
}

#[derive(thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    EngineError(#[from] SemanticSearchError),
}

impl std::fmt::Debug for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::EngineError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
