use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::content::ContentType;
use crate::helper::error_chain_fmt;
use crate::use_cases::view_content::{
    ViewContentError, ViewContentUseCase, DEFAULT_LISTING_SIZE,
};

#[tracing::instrument(name = "Get content handler", skip(view_content))]
pub async fn get_content(
    view_content: web::Data<ViewContentUseCase>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, GetContentError> {
    let view = view_content.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(view))
}

#[derive(Debug, Deserialize)]
pub struct ListContentQueryParams {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub content_type: Option<ContentType>,
}

#[tracing::instrument(name = "List content handler", skip(view_content))]
pub async fn list_content(
    view_content: web::Data<ViewContentUseCase>,
    query: web::Query<ListContentQueryParams>,
) -> Result<HttpResponse, GetContentError> {
    let query = query.into_inner();

    let listed = view_content
        .list(
            query.skip.unwrap_or(0),
            query.limit.unwrap_or(DEFAULT_LISTING_SIZE),
            query.content_type,
        )
        .await?;

    Ok(HttpResponse::Ok().json(listed))
}

#[derive(thiserror::Error)]
pub enum GetContentError {
    #[error(transparent)]
    EngineError(#[from] ViewContentError),
}

impl std::fmt::Debug for GetContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for GetContentError {
    fn status_code(&self) -> StatusCode {
        match self {
            GetContentError::EngineError(ViewContentError::ContentNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            GetContentError::EngineError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
