use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::content::ContentType;
use crate::helper::error_chain_fmt;
use crate::use_cases::generate_feed::{
    FeedRequest, GenerateFeedError, GenerateFeedUseCase, DEFAULT_PAGE_SIZE,
    DEFAULT_SHORTS_PAGE_SIZE,
};

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    pub agent_id: Option<Uuid>,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
    pub content_type: Option<ContentType>,
    pub exclude_consumed: Option<bool>,
}

#[tracing::instrument(name = "Personalized feed handler", skip(generate_feed))]
pub async fn get_feed(
    generate_feed: web::Data<GenerateFeedUseCase>,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse, FeedError> {
    let query = query.into_inner();
    // One independent randomness source per request
    let mut rng = StdRng::from_entropy();

    let page = generate_feed
        .feed(
            FeedRequest {
                agent_id: query.agent_id,
                cursor: query.cursor,
                limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
                content_type: query.content_type,
                exclude_consumed: query.exclude_consumed.unwrap_or(true),
            },
            &mut rng,
        )
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

#[derive(Debug, Deserialize)]
pub struct ShortsFeedQueryParams {
    pub agent_id: Option<Uuid>,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

#[tracing::instrument(name = "Shorts feed handler", skip(generate_feed))]
pub async fn get_shorts_feed(
    generate_feed: web::Data<GenerateFeedUseCase>,
    query: web::Query<ShortsFeedQueryParams>,
) -> Result<HttpResponse, FeedError> {
    let query = query.into_inner();
    let mut rng = StdRng::from_entropy();

    let page = generate_feed
        .shorts(
            query.agent_id,
            query.cursor,
            query.limit.unwrap_or(DEFAULT_SHORTS_PAGE_SIZE),
            &mut rng,
        )
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

#[derive(Debug, Deserialize)]
pub struct TrendingFeedQueryParams {
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

#[tracing::instrument(name = "Trending feed handler", skip(generate_feed))]
pub async fn get_trending_feed(
    generate_feed: web::Data<GenerateFeedUseCase>,
    query: web::Query<TrendingFeedQueryParams>,
) -> Result<HttpResponse, FeedError> {
    let query = query.into_inner();
    let mut rng = StdRng::from_entropy();

    let page = generate_feed
        .trending(query.cursor, query.limit.unwrap_or(DEFAULT_PAGE_SIZE), &mut rng)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

#[derive(Debug, Deserialize)]
pub struct DiscoverFeedQueryParams {
    pub agent_id: Option<Uuid>,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

#[tracing::instrument(name = "Discovery feed handler", skip(generate_feed))]
pub async fn get_discover_feed(
    generate_feed: web::Data<GenerateFeedUseCase>,
    query: web::Query<DiscoverFeedQueryParams>,
) -> Result<HttpResponse, FeedError> {
    let query = query.into_inner();
    let mut rng = StdRng::from_entropy();

    let page = generate_feed
        .discover(
            query.agent_id,
            query.cursor,
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            &mut rng,
        )
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

#[derive(thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    EngineError(#[from] GenerateFeedError),
}

impl std::fmt::Debug for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for FeedError {
    fn status_code(&self) -> StatusCode {
        match self {
            FeedError::EngineError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
