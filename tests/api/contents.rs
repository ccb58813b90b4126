use serde_json::json;
use uuid::Uuid;

use crate::helpers::{spawn_app, ContentViewResponse};

#[tokio::test]
async fn created_content_shows_up_in_the_listing() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/contents", app.address))
        .json(&json!({
            "title": "Borrow checker deep dive",
            "content_type": "video",
            "tags": ["rust", "memory"],
            "duration_seconds": 900.0
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(200, response.status().as_u16());

    let listed = app.list_content().await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Borrow checker deep dive");
    assert_eq!(listed[0].content_type, "video");
    assert_eq!(listed[0].tags, vec!["rust", "memory"]);
}

#[tokio::test]
async fn creating_content_with_an_empty_title_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/contents", app.address))
        .json(&json!({ "title": " ", "content_type": "text" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn fetching_content_counts_views() {
    let app = spawn_app().await;
    let content = app.create_content("viewed twice", "image").await;

    for _ in 0..2 {
        let response = app
            .api_client
            .get(format!("{}/contents/{}", app.address, content.id))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(200, response.status().as_u16());

        let view: ContentViewResponse = response.json().await.unwrap();
        assert_eq!(view.id, content.id);
        assert_eq!(view.content_type, "image");
    }

    let listed = app.list_content().await;
    assert_eq!(listed[0].view_count, 2);
}

#[tokio::test]
async fn fetching_unknown_content_is_a_404() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("{}/contents/{}", app.address, Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn the_listing_is_paginated_newest_first() {
    let app = spawn_app().await;
    for i in 0..5 {
        app.create_content(&format!("content {}", i), "text").await;
    }

    let listed: Vec<crate::helpers::ContentResponse> = app
        .api_client
        .get(format!("{}/contents?skip=1&limit=2", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "content 3");
    assert_eq!(listed[1].title, "content 2");
}

#[tokio::test]
async fn related_content_of_unknown_content_is_a_404() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!(
            "{}/contents/{}/related",
            app.address,
            Uuid::new_v4()
        ))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn related_content_without_an_embedding_is_empty() {
    let app = spawn_app().await;
    // No provider in tests: the content is stored without an embedding
    let content = app.create_content("unembedded", "text").await;
    app.create_content("a neighbor candidate", "text").await;

    let related: Vec<ContentViewResponse> = app
        .api_client
        .get(format!("{}/contents/{}/related", app.address, content.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(related.is_empty());
}

#[tokio::test]
async fn semantic_search_without_a_provider_returns_nothing() {
    let app = spawn_app().await;
    app.create_content("rust ownership", "text").await;

    let response = app
        .api_client
        .get(format!(
            "{}/contents/search/semantic?q=ownership",
            app.address
        ))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(200, response.status().as_u16());

    let results: Vec<ContentViewResponse> = response.json().await.unwrap();
    assert!(results.is_empty());
}
