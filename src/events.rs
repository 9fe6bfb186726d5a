use crate::Error;
use crate::event::{EventSearchResponse, NormalizedEvent};
use url::Url;

pub(crate) static TICKETMASTER_API_BASE_URL: &str = "https://app.ticketmaster.com/discovery/v2";

/// Number of events requested when no size is given.
pub const DEFAULT_EVENT_PAGE_SIZE: u32 = 20;

const MUSIC_CLASSIFICATION: &str = "Music";
const DATE_ASCENDING: &str = "date,asc";

/// Client for the Ticketmaster Discovery API.
///
/// Authenticates with a static API key sent as a query parameter.
///
/// Unlike [`CatalogClient`](crate::CatalogClient), event lookups never fail:
/// network errors, error statuses and malformed payloads are logged and
/// turned into an empty result, so callers can't tell "no concerts" apart
/// from "provider unavailable".
///
/// # Example
///
/// ```no_run
/// use concertrs::EventsClient;
///
/// # async fn example() {
/// let client = EventsClient::new("api_key".to_string());
/// for event in client.search_events("Radiohead", None).await {
///     println!("{} - {} ({})", event.formatted_date(), event.name, event.location());
/// }
/// # }
/// ```
pub struct EventsClient {
    pub client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl EventsClient {
    /// Create a new EventsClient with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: TICKETMASTER_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom HTTP client using the builder pattern.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point the client at a different Discovery API root.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn events_url(&self, keyword: &str, size: u32) -> Result<Url, Error> {
        let mut url = Url::parse(&format!("{}/events.json", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("keyword", keyword)
            .append_pair("classificationName", MUSIC_CLASSIFICATION)
            .append_pair("sort", DATE_ASCENDING)
            .append_pair("size", &size.to_string());
        Ok(url)
    }

    /// Search upcoming music events for an artist, soonest first.
    ///
    /// An empty or whitespace-only name returns an empty list without a
    /// request. Any failure also yields an empty list.
    ///
    /// # Arguments
    ///
    /// * `artist_name` - Keyword to search for, usually the artist's name
    /// * `size` - Maximum number of events to return (default: 20)
    pub async fn search_events(&self, artist_name: &str, size: Option<u32>) -> Vec<NormalizedEvent> {
        if artist_name.trim().is_empty() {
            return Vec::new();
        }

        match self
            .fetch_events(artist_name, size.unwrap_or(DEFAULT_EVENT_PAGE_SIZE))
            .await
        {
            Ok(resp) => resp.into_events(),
            Err(e) => {
                log::error!("Error searching events for {:?}: {}", artist_name, e);
                Vec::new()
            }
        }
    }

    async fn fetch_events(&self, keyword: &str, size: u32) -> Result<EventSearchResponse, Error> {
        let url = self.events_url(keyword, size)?;

        // The API key travels in the query string, keep it out of the logs
        log::debug!("GET {}/events.json keyword={:?} size={}", self.base_url, keyword, size);

        let resp = self.client.get(url).send().await?.error_for_status()?;
        let body = resp.bytes().await?;

        let value: serde_json::Value = serde_json::from_slice(&body)?;

        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "Response {}",
                serde_json::to_string_pretty(&value).unwrap_or_default()
            );
        }

        Ok(serde_json::from_value(value)?)
    }
}
