use crate::CatalogClient;
use crate::Error;
use crate::ExternalUrls;
use crate::Image;
use crate::List;
use crate::artist::ArtistSummary;
use crate::deserialize_null_default;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

/// Number of albums requested when no limit is given.
pub const DEFAULT_ALBUM_LIMIT: u32 = 10;

/// Represents an album (or single) from the Spotify catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Album {
    /// Unique album identifier
    pub id: String,
    /// Album title
    pub name: String,
    /// Kind of release
    pub album_type: AlbumType,
    /// Release date, at the precision the catalog knows it ("2000", "2000-10", "2000-10-02")
    #[serde(default)]
    pub release_date: Option<String>,
    /// Number of tracks on the release
    #[serde(default)]
    pub total_tracks: u32,
    /// Cover art, largest first
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    /// Credited artists
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub artists: Vec<ArtistSummary>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Album {
    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}

/// Type of release.
#[derive(Debug, Serialize, Deserialize, EnumString, AsRefStr, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlbumType {
    Album,
    Single,
    Compilation,
    AppearsOn,
}

/// Release groups requested from the albums endpoint.
const ALBUM_INCLUDE_GROUPS: [AlbumType; 2] = [AlbumType::Album, AlbumType::Single];

impl CatalogClient {
    /// Get an artist's albums and singles.
    ///
    /// # Arguments
    ///
    /// * `artist_id` - The unique identifier of the artist
    /// * `limit` - Maximum number of albums to return (default: 10)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: concertrs::CatalogClient) -> Result<(), concertrs::Error> {
    /// let albums = client.artist_albums("4Z8W4fKeB5YxbusRsdQVPb", Some(20)).await?;
    /// for album in albums {
    ///     println!("Album: {}", album.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn artist_albums(
        &self,
        artist_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Album>, Error> {
        let limit = limit.unwrap_or(DEFAULT_ALBUM_LIMIT).to_string();
        let include_groups = include_groups();

        let path = format!("/artists/{artist_id}/albums");
        let resp: List<Album> = self
            .request(
                &path,
                &[("limit", limit.as_str()), ("include_groups", include_groups.as_str())],
            )
            .await?;

        Ok(resp.items)
    }
}

fn include_groups() -> String {
    ALBUM_INCLUDE_GROUPS
        .iter()
        .map(|group| group.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}
