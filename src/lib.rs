#![doc = include_str!("../README.md")]

mod album;
mod artist;
mod catalog;
mod event;
mod events;
mod search;
mod session;
mod token;
mod track;

pub use album::*;
pub use artist::*;
pub use catalog::*;
pub use event::*;
pub use events::*;
pub use search::*;
pub use session::*;
pub use token::*;
pub use track::*;

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Error response from the catalog API.
///
/// The catalog wraps errors as `{"error": {"status": 404, "message": "..."}}`.
/// When the body is missing or not in that shape only the HTTP status is
/// kept.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    pub(crate) fn from_body(status: u16, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: ApiError,
        }

        match serde_json::from_slice::<Envelope>(body) {
            Ok(envelope) => ApiError {
                status,
                message: envelope.error.message,
            },
            Err(_) => ApiError {
                status,
                message: String::new(),
            },
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "status {}", self.status)
        } else {
            write!(f, "status {} {}", self.status, self.message)
        }
    }
}

/// Errors that can occur when using the concertrs library.
///
/// Only [`CatalogClient`] surfaces these. [`EventsClient::search_events`]
/// logs its failures and returns an empty list instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (network issues, timeouts, etc.)
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The token endpoint rejected the client credentials
    #[error("Failed to authenticate with the catalog API (status {status})")]
    Authentication { status: u16 },
    /// The catalog API returned a non-success status
    #[error("Catalog API error: {0}")]
    Api(ApiError),
    /// JSON serialization/deserialization failed
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    /// A request URL could not be built from the configured base URL
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl Error {
    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { status } => Some(*status),
            Error::Api(err) => Some(err.status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// A link to the resource on the provider's own website.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// A page of results as returned by the catalog's list endpoints.
///
/// Only the first page is ever requested; `total` tells how many items the
/// catalog holds in all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List<T> {
    /// Items in the current page
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Offset of the current page
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of items per page
    #[serde(default)]
    pub limit: usize,
    /// Total number of items available
    #[serde(default)]
    pub total: usize,
}

impl<T> List<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            limit: 0,
            total: 0,
        }
    }
}

// Utility function to deserialize a null value as a default value
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    Option::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}
