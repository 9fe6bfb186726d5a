use crate::ApiError;
use crate::ClientCredentials;
use crate::Error;
use crate::TokenCache;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

pub(crate) static SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Market used for top tracks when none is configured.
pub const DEFAULT_MARKET: &str = "US";

/// Client for read-only access to the Spotify Web API catalog.
///
/// Every request is authenticated with a bearer token obtained through the
/// client-credentials grant. Tokens are held in a [`TokenCache`] so repeated
/// calls within the token's lifetime don't re-authenticate.
///
/// # Example
///
/// ```no_run
/// use concertrs::CatalogClient;
///
/// # async fn example() -> Result<(), concertrs::Error> {
/// let client = CatalogClient::new("client_id".to_string(), "client_secret".to_string());
///
/// let artists = client.search_artists("Radiohead", Some(5)).await?;
/// for artist in artists {
///     println!("{} ({} followers)", artist.name, artist.followers());
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Failures propagate to the caller: [`Error::Authentication`] when the
/// token exchange is rejected, [`Error::Api`] for any non-success response
/// from the catalog.
pub struct CatalogClient {
    pub client: reqwest::Client,
    credentials: ClientCredentials,
    token_cache: Arc<TokenCache>,
    base_url: String,
    market: Option<String>,
}

impl CatalogClient {
    /// Create a new CatalogClient with the given client ID and secret.
    ///
    /// The client gets its own [`TokenCache`]. Use
    /// [`with_token_cache`](Self::with_token_cache) to share one.
    pub fn new(client_id: String, client_secret: String) -> Self {
        let client = reqwest::Client::new();
        Self {
            credentials: ClientCredentials::new(client_id, client_secret)
                .with_client(client.clone()),
            client,
            token_cache: Arc::new(TokenCache::new()),
            base_url: SPOTIFY_API_BASE_URL.to_string(),
            market: None,
        }
    }

    /// Set a custom HTTP client using the builder pattern.
    ///
    /// The same client is used for the token exchange.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use concertrs::CatalogClient;
    ///
    /// let custom_client = reqwest::Client::builder()
    ///     .timeout(std::time::Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = CatalogClient::new("id".to_string(), "secret".to_string())
    ///     .with_client(custom_client);
    /// ```
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.credentials = self.credentials.with_client(client.clone());
        self.client = client;
        self
    }

    /// Point the client at a different catalog API root.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Point the token exchange at a different token endpoint.
    pub fn with_auth_url(mut self, auth_url: String) -> Self {
        self.credentials = self.credentials.with_auth_url(auth_url);
        self
    }

    /// Share an existing token cache using the builder pattern.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use concertrs::{CatalogClient, TokenCache};
    /// use std::sync::Arc;
    ///
    /// let cache = Arc::new(TokenCache::new());
    /// let client = CatalogClient::new("id".to_string(), "secret".to_string())
    ///     .with_token_cache(cache.clone());
    /// ```
    pub fn with_token_cache(mut self, token_cache: Arc<TokenCache>) -> Self {
        self.token_cache = token_cache;
        self
    }

    /// Set the default market (two-letter ISO country code) for top tracks.
    pub fn with_market(mut self, market: String) -> Self {
        self.market = Some(market);
        self
    }

    /// The configured market, or [`DEFAULT_MARKET`].
    pub fn get_market(&self) -> String {
        self.market
            .clone()
            .unwrap_or_else(|| DEFAULT_MARKET.to_string())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_cache(&self) -> &Arc<TokenCache> {
        &self.token_cache
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Obtain a bearer token, authenticating only if the cache is empty or
    /// expired.
    pub async fn access_token(&self) -> Result<String, Error> {
        self.token_cache.get_token(&self.credentials).await
    }

    pub(crate) fn endpoint_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    /// Issue an authenticated GET against `path` (relative to the base URL)
    /// and decode the JSON body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.endpoint_url(path, params)?;
        let token = self.access_token().await?;

        log::debug!("GET {}", url);

        let resp = self
            .client
            .get(url.clone())
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;

        let status_code = resp.status().as_u16();

        if !resp.status().is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            let err = ApiError::from_body(status_code, &body);
            if log::log_enabled!(log::Level::Debug) {
                log::debug!("Requested URL: {}", url);
                log::debug!("Catalog API Error: {}", err);
            }
            return Err(Error::Api(err));
        }

        let body = resp.bytes().await?;

        // If it's an empty body, just encode a null value
        let value = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body)?
        };

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Requested URL: {}", url);
            log::trace!(
                "Response {}",
                serde_json::to_string_pretty(&value).unwrap_or_default()
            );
        }

        match serde_json::from_value(value) {
            Ok(t) => Ok(t),
            Err(e) => {
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!("Requested URL: {}", url);
                    log::debug!("JSON deserialization error: {}", e);
                }
                Err(Error::SerdeJson(e))
            }
        }
    }
}
