use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use content_feed_service::domain::entities::content::ContentType;
use content_feed_service::domain::services::ranking::StrategyKind;
use content_feed_service::use_cases::generate_feed::GenerateFeedUseCase;
use content_feed_service::use_cases::log_consumption::{
    LogConsumptionRequest, LogConsumptionUseCase,
};
use content_feed_service::use_cases::register_agent::{
    RegisterAgentRequest, RegisterAgentUseCase,
};

use crate::helpers::{repositories, seed_content, FakeEmbeddingProvider};

#[tokio::test]
async fn discovery_serves_a_permutation_of_the_pool() {
    let (content_repository, agent_repository) = repositories();

    let mut pool_ids = HashSet::new();
    for i in 0..6 {
        let content = seed_content(
            &content_repository,
            &format!("content {}", i),
            ContentType::Video,
            None,
            0,
        )
        .await;
        pool_ids.insert(content.id);
    }

    let feed = GenerateFeedUseCase::new(content_repository, agent_repository);
    let mut rng = StdRng::seed_from_u64(7);

    let page = feed.discover(None, None, 6, &mut rng).await.unwrap();

    let served: HashSet<Uuid> = page.items.iter().map(|item| item.content.id).collect();
    assert_eq!(served, pool_ids);
    assert_eq!(page.items.len(), 6);
    for item in &page.items {
        assert_eq!(item.rationale.strategy, StrategyKind::Discovery);
    }
}

#[tokio::test]
async fn discovery_shuffling_is_deterministic_for_a_fixed_seed() {
    let (content_repository, agent_repository) = repositories();
    for i in 0..8 {
        seed_content(
            &content_repository,
            &format!("content {}", i),
            ContentType::Video,
            None,
            0,
        )
        .await;
    }

    let feed = GenerateFeedUseCase::new(content_repository, agent_repository);

    let mut first_rng = StdRng::seed_from_u64(99);
    let first = feed.discover(None, None, 8, &mut first_rng).await.unwrap();

    let mut second_rng = StdRng::seed_from_u64(99);
    let second = feed
        .discover(None, None, 8, &mut second_rng)
        .await
        .unwrap();

    let first_ids: Vec<Uuid> = first.items.iter().map(|item| item.content.id).collect();
    let second_ids: Vec<Uuid> = second.items.iter().map(|item| item.content.id).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn discovery_never_serves_what_the_agent_already_consumed() {
    let (content_repository, agent_repository) = repositories();

    let register = RegisterAgentUseCase::new(
        agent_repository.clone(),
        Arc::new(FakeEmbeddingProvider::new()),
    );
    let agent = register
        .execute(RegisterAgentRequest {
            name: "explorer".to_string(),
            description: None,
            agent_type: None,
            interests: vec![],
            metadata: JsonValue::Null,
        })
        .await
        .unwrap();

    let log = LogConsumptionUseCase::new(content_repository.clone(), agent_repository.clone());

    let mut consumed_ids = HashSet::new();
    let mut fresh_ids = HashSet::new();
    for i in 0..5 {
        let content = seed_content(
            &content_repository,
            &format!("content {}", i),
            ContentType::Video,
            None,
            0,
        )
        .await;

        if i < 2 {
            log.execute(
                agent.id,
                LogConsumptionRequest {
                    content_id: content.id,
                    watch_duration_seconds: None,
                    completion_percentage: 100.0,
                    rating: None,
                    feedback: None,
                    learned_concepts: vec![],
                },
            )
            .await
            .unwrap();
            consumed_ids.insert(content.id);
        } else {
            fresh_ids.insert(content.id);
        }
    }

    let feed = GenerateFeedUseCase::new(content_repository, agent_repository);
    let mut rng = StdRng::seed_from_u64(1);

    let page = feed
        .discover(Some(agent.id), None, 10, &mut rng)
        .await
        .unwrap();

    let served: HashSet<Uuid> = page.items.iter().map(|item| item.content.id).collect();
    assert_eq!(served, fresh_ids);
    assert!(served.is_disjoint(&consumed_ids));
    assert_eq!(page.total_available, 3);
}
