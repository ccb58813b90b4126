use std::sync::Arc;

use claims::assert_err;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use content_feed_service::domain::entities::content::ContentType;
use content_feed_service::domain::services::ranking::StrategyKind;
use content_feed_service::use_cases::generate_feed::{FeedRequest, GenerateFeedUseCase};
use content_feed_service::use_cases::register_agent::{
    RegisterAgentRequest, RegisterAgentUseCase,
};
use content_feed_service::use_cases::related_content::{
    RelatedContentError, RelatedContentUseCase,
};
use content_feed_service::use_cases::semantic_search::SemanticSearchUseCase;

use crate::helpers::{
    repositories, seed_content, FailingEmbeddingProvider, FakeEmbeddingProvider,
};

fn register_request(name: &str, interests: Vec<&str>) -> RegisterAgentRequest {
    RegisterAgentRequest {
        name: name.to_string(),
        description: None,
        agent_type: None,
        interests: interests.into_iter().map(String::from).collect(),
        metadata: JsonValue::Null,
    }
}

#[tokio::test]
async fn a_warmed_agent_gets_a_semantically_ordered_feed() {
    let (content_repository, agent_repository) = repositories();
    let provider = Arc::new(
        FakeEmbeddingProvider::new().with_vector("ai coding", vec![1.0, 0.0, 0.0, 0.0]),
    );

    let register = RegisterAgentUseCase::new(agent_repository.clone(), provider);
    let agent = register
        .execute(register_request("learner", vec!["ai", "coding"]))
        .await
        .unwrap();
    assert!(agent.has_preference_vector());

    seed_content(
        &content_repository,
        "exact match",
        ContentType::Video,
        Some(vec![2.0, 0.0, 0.0, 0.0]),
        0,
    )
    .await;
    seed_content(
        &content_repository,
        "close match",
        ContentType::Video,
        Some(vec![1.0, 1.0, 0.0, 0.0]),
        0,
    )
    .await;
    seed_content(
        &content_repository,
        "far match",
        ContentType::Video,
        Some(vec![0.0, 1.0, 0.0, 0.0]),
        0,
    )
    .await;
    seed_content(&content_repository, "blind", ContentType::Video, None, 0).await;

    let feed = GenerateFeedUseCase::new(content_repository, agent_repository);
    let mut rng = StdRng::seed_from_u64(0);

    let page = feed
        .feed(
            FeedRequest {
                agent_id: Some(agent.id),
                limit: 3,
                ..FeedRequest::default()
            },
            &mut rng,
        )
        .await
        .unwrap();

    let titles: Vec<&str> = page
        .items
        .iter()
        .map(|item| item.content.title.as_str())
        .collect();
    assert_eq!(titles, vec!["exact match", "close match", "far match"]);

    for item in &page.items {
        assert_eq!(item.rationale.strategy, StrategyKind::Semantic);
    }

    // Similarity = 1 - distance, so scores are non-increasing down the page
    let scores: Vec<f32> = page
        .items
        .iter()
        .map(|item| item.content.relevance_score.unwrap())
        .collect();
    assert!((scores[0] - 1.0).abs() < 1e-6);
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }

    // The embedding-less content is not part of the semantic pool at all
    assert_eq!(page.total_available, 3);
}

#[tokio::test]
async fn semantic_ordering_continues_across_pages() {
    let (content_repository, agent_repository) = repositories();
    let provider =
        Arc::new(FakeEmbeddingProvider::new().with_vector("rust", vec![1.0, 0.0, 0.0, 0.0]));

    let register = RegisterAgentUseCase::new(agent_repository.clone(), provider);
    let agent = register
        .execute(register_request("paginator", vec!["rust"]))
        .await
        .unwrap();

    // Distances: 0.0 < ~0.3 < 1.0 < 2.0
    let ranked_titles = ["d0", "d1", "d2", "d3"];
    for (title, embedding) in ranked_titles.iter().zip([
        vec![1.0, 0.0, 0.0, 0.0],
        vec![1.0, 1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![-1.0, 0.0, 0.0, 0.0],
    ]) {
        seed_content(
            &content_repository,
            title,
            ContentType::Text,
            Some(embedding),
            0,
        )
        .await;
    }

    let feed = GenerateFeedUseCase::new(content_repository, agent_repository);
    let mut rng = StdRng::seed_from_u64(0);

    let first_page = feed
        .feed(
            FeedRequest {
                agent_id: Some(agent.id),
                limit: 2,
                ..FeedRequest::default()
            },
            &mut rng,
        )
        .await
        .unwrap();
    let second_page = feed
        .feed(
            FeedRequest {
                agent_id: Some(agent.id),
                cursor: first_page.next_cursor.clone(),
                limit: 2,
                ..FeedRequest::default()
            },
            &mut rng,
        )
        .await
        .unwrap();

    let walked: Vec<&str> = first_page
        .items
        .iter()
        .chain(second_page.items.iter())
        .map(|item| item.content.title.as_str())
        .collect();
    assert_eq!(walked, ranked_titles);
    assert!(second_page.next_cursor.is_none());
}

#[tokio::test]
async fn a_failing_provider_degrades_registration_to_the_default_strategy() {
    let (content_repository, agent_repository) = repositories();

    let register = RegisterAgentUseCase::new(
        agent_repository.clone(),
        Arc::new(FailingEmbeddingProvider),
    );
    let agent = register
        .execute(register_request("unlucky", vec!["ai"]))
        .await
        .unwrap();

    // Registered fine, just without a preference vector
    assert!(!agent.has_preference_vector());

    seed_content(&content_repository, "anything", ContentType::Video, None, 0).await;

    let feed = GenerateFeedUseCase::new(content_repository, agent_repository);
    let mut rng = StdRng::seed_from_u64(0);

    let page = feed
        .feed(
            FeedRequest {
                agent_id: Some(agent.id),
                ..FeedRequest::default()
            },
            &mut rng,
        )
        .await
        .unwrap();

    for item in &page.items {
        assert_ne!(item.rationale.strategy, StrategyKind::Semantic);
    }
}

#[tokio::test]
async fn related_content_excludes_itself_and_the_unembedded() {
    let (content_repository, _) = repositories();

    let anchor = seed_content(
        &content_repository,
        "anchor",
        ContentType::Video,
        Some(vec![1.0, 0.0, 0.0, 0.0]),
        0,
    )
    .await;
    seed_content(
        &content_repository,
        "close neighbor",
        ContentType::Video,
        Some(vec![1.0, 0.5, 0.0, 0.0]),
        0,
    )
    .await;
    seed_content(
        &content_repository,
        "far neighbor",
        ContentType::Video,
        Some(vec![0.0, 0.0, 1.0, 0.0]),
        0,
    )
    .await;
    seed_content(&content_repository, "blind", ContentType::Video, None, 0).await;

    let related = RelatedContentUseCase::new(content_repository);
    let views = related.execute(anchor.id, 5).await.unwrap();

    let titles: Vec<&str> = views.iter().map(|view| view.title.as_str()).collect();
    assert_eq!(titles, vec!["close neighbor", "far neighbor"]);
    assert!(views.iter().all(|view| view.id != anchor.id));
    assert!(views.len() <= 5);
}

#[tokio::test]
async fn related_content_of_an_unknown_id_is_an_error() {
    let (content_repository, _) = repositories();
    let related = RelatedContentUseCase::new(content_repository);

    let result = related.execute(Uuid::new_v4(), 5).await;

    assert_err!(&result);
    assert!(matches!(
        result,
        Err(RelatedContentError::ContentNotFound(_))
    ));
}

#[tokio::test]
async fn semantic_search_ranks_the_pool_against_the_query() {
    let (content_repository, _) = repositories();
    let provider = Arc::new(
        FakeEmbeddingProvider::new().with_vector("memory tricks", vec![0.0, 1.0, 0.0, 0.0]),
    );

    seed_content(
        &content_repository,
        "mnemonics",
        ContentType::Text,
        Some(vec![0.0, 2.0, 0.0, 0.0]),
        0,
    )
    .await;
    seed_content(
        &content_repository,
        "woodworking",
        ContentType::Text,
        Some(vec![1.0, 0.0, 0.0, 0.0]),
        0,
    )
    .await;

    let search = SemanticSearchUseCase::new(content_repository, provider);
    let results = search.execute("memory tricks", 10, None).await.unwrap();

    let titles: Vec<&str> = results.iter().map(|view| view.title.as_str()).collect();
    assert_eq!(titles, vec!["mnemonics", "woodworking"]);
    assert!(results[0].relevance_score.unwrap() > results[1].relevance_score.unwrap());
}
