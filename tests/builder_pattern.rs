//! Tests for client construction and the offline behaviour of each client.
//!
//! Clients here point at a closed local port, so any request that does go
//! out fails immediately with a connection error.

use concertrs::{
    ArtistSession, CatalogClient, DEFAULT_MARKET, Error, EventsClient, SEARCH_ERROR_MESSAGE,
    TokenCache,
};
use std::sync::Arc;

static CLOSED_PORT: &str = "http://127.0.0.1:1";

fn direct_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn offline_catalog() -> CatalogClient {
    CatalogClient::new("test_client_id".to_string(), "test_client_secret".to_string())
        .with_client(direct_client())
        .with_base_url(format!("{CLOSED_PORT}/v1"))
        .with_auth_url(format!("{CLOSED_PORT}/api/token"))
}

fn offline_events() -> EventsClient {
    EventsClient::new("test_api_key".to_string())
        .with_client(direct_client())
        .with_base_url(format!("{CLOSED_PORT}/discovery/v2"))
}

#[test]
fn test_builder_pattern_defaults() {
    let client = CatalogClient::new("test_client_id".to_string(), "test_client_secret".to_string());

    assert_eq!(client.get_market(), DEFAULT_MARKET);
    assert_eq!(client.get_base_url(), "https://api.spotify.com/v1");
    assert_eq!(
        client.credentials().auth_url(),
        "https://accounts.spotify.com/api/token"
    );
    assert_eq!(client.credentials().client_id(), "test_client_id");
    assert!(client.token_cache().credential().is_none());

    let events = EventsClient::new("test_api_key".to_string());
    assert_eq!(events.get_base_url(), "https://app.ticketmaster.com/discovery/v2");
}

#[test]
fn test_builder_pattern_chaining() {
    let custom_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap();

    let client = CatalogClient::new("test_client_id".to_string(), "test_client_secret".to_string())
        .with_client(custom_client)
        .with_market("GB".to_string())
        .with_base_url("http://localhost:9000/v1/".to_string())
        .with_auth_url("http://localhost:9000/token".to_string());

    assert_eq!(client.get_market(), "GB");
    assert_eq!(client.get_base_url(), "http://localhost:9000/v1");
    assert_eq!(client.credentials().auth_url(), "http://localhost:9000/token");
}

#[test]
fn test_builder_pattern_shared_token_cache() {
    let cache = Arc::new(TokenCache::new());

    let first = CatalogClient::new("id".to_string(), "secret".to_string())
        .with_token_cache(cache.clone());
    let second = CatalogClient::new("id".to_string(), "secret".to_string())
        .with_token_cache(cache.clone());

    assert!(Arc::ptr_eq(first.token_cache(), second.token_cache()));
    assert!(Arc::ptr_eq(first.token_cache(), &cache));
}

#[tokio::test]
async fn test_blank_search_makes_no_request() {
    let client = offline_catalog();

    assert!(client.search_artists("", None).await.unwrap().is_empty());
    assert!(client.search_artists("   ", Some(5)).await.unwrap().is_empty());

    // No token exchange happened either
    assert!(client.token_cache().credential().is_none());
}

#[tokio::test]
async fn test_catalog_errors_propagate() {
    let client = offline_catalog();

    let err = client.search_artists("Radiohead", None).await.unwrap_err();
    assert!(
        matches!(err, Error::Http(_)),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.status(), None);
    assert!(client.token_cache().credential().is_none());

    let err = client.artist_top_tracks("4Z8W4fKeB5YxbusRsdQVPb", None).await.unwrap_err();
    assert!(
        matches!(err, Error::Http(_)),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_event_search_failure_returns_empty() {
    let client = offline_events();
    assert!(client.search_events("Radiohead", None).await.is_empty());
}

#[tokio::test]
async fn test_session_with_unreachable_providers() {
    let session = ArtistSession::new(Arc::new(offline_catalog()), Arc::new(offline_events()));

    session.search("Radiohead").await;
    let state = session.snapshot();
    assert_eq!(state.error.as_deref(), Some(SEARCH_ERROR_MESSAGE));
    assert!(!state.search_loading);

    let artist = concertrs::Artist {
        id: "4Z8W4fKeB5YxbusRsdQVPb".to_string(),
        name: "Radiohead".to_string(),
        ..Default::default()
    };
    session.select_artist(artist).await;

    let state = session.snapshot();
    assert_eq!(state.selected_artist.unwrap().name, "Radiohead");
    assert!(!state.top_tracks.loading);
    assert!(state.top_tracks.items.is_empty());
    assert!(state.top_tracks.error.is_some());
    // Events soft-fail: empty, no error
    assert!(!state.events.loading);
    assert!(state.events.items.is_empty());
    assert!(state.events.error.is_none());
    // The search banner is cleared on selection
    assert!(state.error.is_none());
}
