use crate::Error;
use arc_swap::ArcSwapOption;
use base64::Engine;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

pub(crate) static SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/api/token";

/// Seconds shaved off the provider's reported lifetime before a credential
/// is considered expired.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// Source of the current instant for token expiry checks.
///
/// The default [`SystemClock`] reads the wall clock. Tests can provide their
/// own implementation to simulate expiry without waiting.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by `chrono::Utc::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Body returned by the token endpoint for a client-credentials grant.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessTokenResponse {
    /// Bearer token to send with catalog requests
    pub access_token: String,
    /// Type of token (typically "Bearer")
    #[serde(default)]
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// A cached bearer token and the instant after which it must not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Build a credential from a token response obtained at `now`.
    ///
    /// The expiry is pulled in by [`TOKEN_EXPIRY_MARGIN_SECS`]. Lifetimes too
    /// large to represent are clamped to the latest representable instant.
    pub fn from_response(resp: AccessTokenResponse, now: DateTime<Utc>) -> Self {
        let lifetime = resp.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        let expires_at = TimeDelta::try_seconds(lifetime)
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(if lifetime > 0 {
                DateTime::<Utc>::MAX_UTC
            } else {
                DateTime::<Utc>::MIN_UTC
            });

        Self {
            access_token: resp.access_token,
            expires_at,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Performs the authentication exchange that yields a fresh access token.
///
/// [`ClientCredentials`] is the implementation used against the real token
/// endpoint.
pub trait TokenExchange: Send + Sync {
    fn exchange(&self) -> impl Future<Output = Result<AccessTokenResponse, Error>> + Send;
}

/// OAuth2 client-credentials grant against the catalog's token endpoint.
///
/// # Example
///
/// ```no_run
/// use concertrs::{ClientCredentials, TokenCache};
///
/// # async fn example() -> Result<(), concertrs::Error> {
/// let credentials = ClientCredentials::new("client_id".to_string(), "client_secret".to_string());
/// let cache = TokenCache::new();
/// let token = cache.get_token(&credentials).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    client: reqwest::Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_url: SPOTIFY_AUTH_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_auth_url(mut self, auth_url: String) -> Self {
        self.auth_url = auth_url;
        self
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Value of the `Authorization` header sent to the token endpoint.
    pub fn basic_authorization(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw.as_bytes());
        format!("Basic {encoded}")
    }
}

impl TokenExchange for ClientCredentials {
    async fn exchange(&self) -> Result<AccessTokenResponse, Error> {
        log::debug!("Requesting client-credentials token from {}", self.auth_url);

        let resp = self
            .client
            .post(&self.auth_url)
            .header(reqwest::header::AUTHORIZATION, self.basic_authorization())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            log::debug!("Token endpoint rejected credentials: {}", status);
            return Err(Error::Authentication {
                status: status.as_u16(),
            });
        }

        let token: AccessTokenResponse = resp.json().await?;
        Ok(token)
    }
}

/// Holds at most one bearer credential and refreshes it once it expires.
///
/// A `TokenCache` is meant to be constructed once and shared (usually via
/// `Arc`) by every client that authenticates with the same credentials.
/// Reads are lock-free. There is no guard against concurrent refreshes: two
/// callers that both see an expired credential will both run the exchange
/// and the later store wins. Either credential is valid.
pub struct TokenCache {
    credential: ArcSwapOption<Credential>,
    clock: Arc<dyn Clock>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            credential: ArcSwapOption::from(None),
            clock,
        }
    }

    /// The currently cached credential, valid or not.
    pub fn credential(&self) -> Option<Arc<Credential>> {
        self.credential.load_full()
    }

    /// Whether a credential is cached and still inside its safe lifetime.
    pub fn is_valid(&self) -> bool {
        self.credential()
            .map(|credential| credential.is_valid_at(self.clock.now()))
            .unwrap_or(false)
    }

    /// Drop the cached credential so the next call re-authenticates.
    pub fn clear(&self) {
        self.credential.store(None);
    }

    /// Return a valid bearer token, running `exchange` only when the cache
    /// is empty or expired.
    ///
    /// A failed exchange leaves the cache as it was.
    pub async fn get_token<X: TokenExchange>(&self, exchange: &X) -> Result<String, Error> {
        if let Some(credential) = self.credential() {
            if credential.is_valid_at(self.clock.now()) {
                return Ok(credential.access_token.clone());
            }
            log::debug!("Cached token expired at {}, refreshing", credential.expires_at);
        }

        let resp = exchange.exchange().await?;
        let credential = Credential::from_response(resp, self.clock.now());
        let token = credential.access_token.clone();

        self.credential.store(Some(Arc::new(credential)));

        Ok(token)
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}
