use crate::CatalogClient;
use crate::Error;
use crate::List;
use crate::artist::Artist;
use serde::{Deserialize, Serialize};

/// Number of artists requested when no limit is given.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Results from an artist search in the Spotify catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResults {
    /// Matching artists
    #[serde(default)]
    pub artists: List<Artist>,
}

impl CatalogClient {
    /// Search the catalog for artists matching `query`.
    ///
    /// An empty or whitespace-only query returns an empty list without
    /// touching the network or the token cache.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text search string
    /// * `limit` - Maximum number of artists to return (default: 10)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: concertrs::CatalogClient) -> Result<(), concertrs::Error> {
    /// let artists = client.search_artists("The Beatles", None).await?;
    /// for artist in artists {
    ///     println!("Artist: {}", artist.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search_artists(&self, query: &str, limit: Option<u32>) -> Result<Vec<Artist>, Error> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).to_string();

        let resp: SearchResults = self
            .request(
                "/search",
                &[("q", query), ("type", "artist"), ("limit", limit.as_str())],
            )
            .await?;

        Ok(resp.artists.items)
    }
}
