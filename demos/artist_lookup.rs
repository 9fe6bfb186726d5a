//! Artist lookup example: search, pick the first match, show top tracks and
//! upcoming concerts.
//!
//! This example shows how to:
//! - Build both clients from credentials in the environment
//! - Drive an ArtistSession the way a front-end would
//! - Render tracks and events with the formatting helpers

use concertrs::{ArtistSession, CatalogClient, EventsClient, format_followers};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "Radiohead".to_string());

    let client_id = std::env::var("SPOTIFY_CLIENT_ID")?;
    let client_secret = std::env::var("SPOTIFY_CLIENT_SECRET")?;
    let api_key = std::env::var("TICKETMASTER_API_KEY")?;

    let session = ArtistSession::new(
        Arc::new(CatalogClient::new(client_id, client_secret)),
        Arc::new(EventsClient::new(api_key)),
    );

    println!("Searching for: {query}");
    session.search(&query).await;

    let state = session.snapshot();
    if let Some(error) = state.error {
        eprintln!("{error}");
        return Ok(());
    }

    println!("\nArtists:");
    for artist in &state.search_results {
        println!(
            "  - {} ({} followers, popularity {})",
            artist.name,
            format_followers(artist.followers.total),
            artist.popularity
        );
    }

    let Some(artist) = state.search_results.first().cloned() else {
        println!("No artists found");
        return Ok(());
    };

    println!("\nSelected: {}", artist.name);
    if !artist.genres.is_empty() {
        println!("Genres: {}", artist.genres.iter().take(3).cloned().collect::<Vec<_>>().join(", "));
    }

    session.select_artist(artist).await;
    let state = session.snapshot();

    println!("\nUpcoming concerts:");
    if state.events.items.is_empty() {
        println!("  No upcoming concerts");
    }
    for event in &state.events.items {
        println!(
            "  - {} | {} | {} | {} | {}",
            event.formatted_date(),
            event.venue.name,
            event.location(),
            event.price(),
            event.status_label()
        );
    }

    if !state.top_tracks.items.is_empty() {
        println!("\nTop tracks:");
        for (i, track) in state.top_tracks.items.iter().enumerate() {
            println!("  {:>2}. {} ({}) - {}", i + 1, track.name, track.duration(), track.album.name);
        }
    }

    Ok(())
}
