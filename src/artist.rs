use crate::CatalogClient;
use crate::Error;
use crate::ExternalUrls;
use crate::deserialize_null_default;
use serde::{Deserialize, Serialize};

/// Maximum number of related artists returned by
/// [`CatalogClient::related_artists`].
pub const RELATED_ARTISTS_LIMIT: usize = 6;

/// Represents an artist from the Spotify catalog.
///
/// Values are passed through from the catalog as-is. `images` is ordered
/// largest first.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Artist {
    /// Unique artist identifier
    pub id: String,
    /// Artist name
    pub name: String,
    /// Genres associated with the artist, most relevant first
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub genres: Vec<String>,
    /// Profile images, largest first
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    /// Follower information
    #[serde(default)]
    pub followers: Followers,
    /// Popularity score between 0 and 100
    #[serde(default)]
    pub popularity: u32,
    /// Links to the artist on Spotify
    #[serde(default)]
    pub external_urls: ExternalUrls,
    /// Spotify URI for the artist
    #[serde(default)]
    pub uri: Option<String>,
}

impl Artist {
    /// URL of the largest profile image, if the artist has any.
    pub fn image_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }

    /// Follower count formatted for display, e.g. "2.3M".
    pub fn followers(&self) -> String {
        format_followers(self.followers.total)
    }
}

/// An image hosted by the catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Followers {
    /// Total number of followers
    #[serde(default)]
    pub total: u64,
}

/// A simplified representation of an artist used in track and album
/// listings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ArtistSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct RelatedArtists {
    #[serde(default)]
    artists: Vec<Artist>,
}

/// Format a follower count for display.
///
/// Counts of a million or more are shown in millions, counts of a thousand
/// or more in thousands, both with one decimal rounded half up. Smaller
/// counts are shown as-is.
///
/// # Example
///
/// ```
/// use concertrs::format_followers;
///
/// assert_eq!(format_followers(950), "950");
/// assert_eq!(format_followers(1_500), "1.5K");
/// assert_eq!(format_followers(2_300_000), "2.3M");
/// ```
pub fn format_followers(count: u64) -> String {
    let (divisor, suffix) = if count >= 1_000_000 {
        (1_000_000, "M")
    } else if count >= 1_000 {
        (1_000, "K")
    } else {
        return count.to_string();
    };

    let tenths = count / divisor * 10 + (count % divisor * 10 + divisor / 2) / divisor;
    format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
}

impl CatalogClient {
    /// Get artist information by ID.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: concertrs::CatalogClient) -> Result<(), concertrs::Error> {
    /// let artist = client.artist("4Z8W4fKeB5YxbusRsdQVPb").await?;
    /// println!("Artist: {}", artist.name);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn artist(&self, artist_id: &str) -> Result<Artist, Error> {
        let path = format!("/artists/{artist_id}");
        let resp: Artist = self.request(&path, &[]).await?;
        Ok(resp)
    }

    /// Get up to six artists related to the given artist.
    pub async fn related_artists(&self, artist_id: &str) -> Result<Vec<Artist>, Error> {
        let path = format!("/artists/{artist_id}/related-artists");
        let resp: RelatedArtists = self.request(&path, &[]).await?;
        Ok(resp.into_top())
    }
}

impl RelatedArtists {
    fn into_top(self) -> Vec<Artist> {
        let mut artists = self.artists;
        artists.truncate(RELATED_ARTISTS_LIMIT);
        artists
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_followers_thresholds() {
        assert_eq!(format_followers(0), "0");
        assert_eq!(format_followers(950), "950");
        assert_eq!(format_followers(999), "999");
        assert_eq!(format_followers(1_000), "1.0K");
        assert_eq!(format_followers(1_500), "1.5K");
        assert_eq!(format_followers(2_300_000), "2.3M");
        assert_eq!(format_followers(1_000_000), "1.0M");
    }

    #[test]
    fn test_format_followers_rounds_half_up() {
        assert_eq!(format_followers(1_050), "1.1K");
        assert_eq!(format_followers(1_049), "1.0K");
        assert_eq!(format_followers(12_345_678), "12.3M");
        assert_eq!(format_followers(999_950), "1000.0K");
    }

    #[test]
    fn test_related_artists_truncated() {
        let artists: Vec<String> = (0..20)
            .map(|i| format!(r#"{{"id": "a{i}", "name": "Artist {i}"}}"#))
            .collect();
        let json = format!(r#"{{"artists": [{}]}}"#, artists.join(","));

        let resp: RelatedArtists = serde_json::from_str(&json).unwrap();
        let top = resp.into_top();
        assert_eq!(top.len(), RELATED_ARTISTS_LIMIT);
        assert_eq!(top[0].id, "a0");
        assert_eq!(top[5].id, "a5");
    }

    #[test]
    fn test_artist_deserializes_with_null_lists() {
        let json = r#"{
            "id": "abc",
            "name": "Boards of Canada",
            "genres": null,
            "images": null,
            "followers": {"href": null, "total": 1234567},
            "popularity": 61
        }"#;

        let artist: Artist = serde_json::from_str(json).unwrap();
        assert!(artist.genres.is_empty());
        assert!(artist.image_url().is_none());
        assert_eq!(artist.followers(), "1.2M");
        assert_eq!(artist.popularity, 61);
    }
}
