use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::ports::agent_repository::AgentRepository;
use crate::ports::content_repository::ContentRepository;
use crate::ports::embedding_provider::EmbeddingProvider;
use crate::repositories::in_memory_agent_repository::InMemoryAgentRepository;
use crate::repositories::in_memory_content_repository::InMemoryContentRepository;
use crate::repositories::openai_embedding_provider::OpenAiEmbeddingProvider;
use crate::routes::{
    create_content, get_agent, get_agent_history, get_content, get_discover_feed, get_feed,
    get_related_content, get_shorts_feed, get_trending_feed, health_check, list_content,
    log_consumption, register_agent, search_content,
};
use crate::use_cases::create_content::CreateContentUseCase;
use crate::use_cases::generate_feed::GenerateFeedUseCase;
use crate::use_cases::log_consumption::LogConsumptionUseCase;
use crate::use_cases::register_agent::RegisterAgentUseCase;
use crate::use_cases::related_content::RelatedContentUseCase;
use crate::use_cases::semantic_search::SemanticSearchUseCase;
use crate::use_cases::view_content::ViewContentUseCase;

/// Holds the newly built server, and some useful properties
pub struct Application {
    server: Server,
    port: u16,
}

#[derive(thiserror::Error, Debug)]
pub enum ApplicationBuildError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl Application {
    /// # Parameters
    /// - nb_workers: number of actix-web workers
    ///   if `None`, the number of available physical CPUs is used as the worker count.
    #[tracing::instrument(name = "Building application", skip(settings))]
    pub async fn build(
        settings: Settings,
        nb_workers: Option<usize>,
    ) -> Result<Self, ApplicationBuildError> {
        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let content_repository: Arc<dyn ContentRepository> =
            Arc::new(InMemoryContentRepository::new());
        let agent_repository: Arc<dyn AgentRepository> = Arc::new(InMemoryAgentRepository::new());
        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(OpenAiEmbeddingProvider::new(&settings.embedding));

        let server = run(
            listener,
            nb_workers,
            content_repository,
            agent_repository,
            embedding_provider,
        )?;

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// This function only returns when the application is stopped
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        info!("Running server ...");
        self.server.await
    }
}

/// listener: the consumer binds their own port
///
/// TracingLogger middleware: helps collecting telemetry data.
/// It generates a unique identifier for each incoming request: `request_id`.
///
/// # Parameters
/// - nb_workers: number of actix-web workers
///   if `None`, the number of available physical CPUs is used as the worker count.
pub fn run(
    listener: TcpListener,
    nb_workers: Option<usize>,
    content_repository: Arc<dyn ContentRepository>,
    agent_repository: Arc<dyn AgentRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
) -> Result<Server, std::io::Error> {
    // Use cases are built once and shared among all workers: they only hold
    // `Arc`s to the repositories and are read-only themselves.
    let generate_feed_use_case = Data::new(GenerateFeedUseCase::new(
        content_repository.clone(),
        agent_repository.clone(),
    ));
    let related_content_use_case =
        Data::new(RelatedContentUseCase::new(content_repository.clone()));
    let register_agent_use_case = Data::new(RegisterAgentUseCase::new(
        agent_repository.clone(),
        embedding_provider.clone(),
    ));
    let log_consumption_use_case = Data::new(LogConsumptionUseCase::new(
        content_repository.clone(),
        agent_repository.clone(),
    ));
    let create_content_use_case = Data::new(CreateContentUseCase::new(
        content_repository.clone(),
        embedding_provider.clone(),
    ));
    let view_content_use_case = Data::new(ViewContentUseCase::new(content_repository.clone()));
    let semantic_search_use_case = Data::new(SemanticSearchUseCase::new(
        content_repository,
        embedding_provider,
    ));

    // The profile route reads the agent repository directly
    let agent_repository = Data::from(agent_repository);

    let server = HttpServer::new(move || {
        info!("Starting actix-web worker");

        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/feed", web::get().to(get_feed))
            .route("/feed/shorts", web::get().to(get_shorts_feed))
            .route("/feed/trending", web::get().to(get_trending_feed))
            .route("/feed/discover", web::get().to(get_discover_feed))
            .route("/agents/register", web::post().to(register_agent))
            .route("/agents/{agent_id}", web::get().to(get_agent))
            .route("/agents/{agent_id}/history", web::get().to(get_agent_history))
            .route(
                "/agents/{agent_id}/consumption",
                web::post().to(log_consumption),
            )
            .route("/contents", web::post().to(create_content))
            .route("/contents", web::get().to(list_content))
            // Registered before the `{content_id}` routes so the literal
            // segment wins
            .route("/contents/search/semantic", web::get().to(search_content))
            .route("/contents/{content_id}", web::get().to(get_content))
            .route(
                "/contents/{content_id}/related",
                web::get().to(get_related_content),
            )
            .app_data(generate_feed_use_case.clone())
            .app_data(related_content_use_case.clone())
            .app_data(register_agent_use_case.clone())
            .app_data(log_consumption_use_case.clone())
            .app_data(create_content_use_case.clone())
            .app_data(view_content_use_case.clone())
            .app_data(semantic_search_use_case.clone())
            .app_data(agent_repository.clone())
    })
    .listen(listener)?;

    // If no workers were set, use the actix-web settings (number of workers = number of physical CPUs)
    if let Some(nb_workers) = nb_workers {
        return Ok(server.workers(nb_workers).run());
    }

    Ok(server.run())
}
