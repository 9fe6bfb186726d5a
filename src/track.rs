use crate::CatalogClient;
use crate::Error;
use crate::ExternalUrls;
use crate::Image;
use crate::artist::ArtistSummary;
use crate::deserialize_null_default;
use serde::{Deserialize, Serialize};

/// Represents a track from the Spotify catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Track {
    /// Unique track identifier
    pub id: String,
    /// Track title
    pub name: String,
    /// Album the track appears on
    #[serde(default)]
    pub album: AlbumSummary,
    /// Artists credited on the track
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub artists: Vec<ArtistSummary>,
    /// Duration of the track in milliseconds
    pub duration_ms: u64,
    /// URL of a 30 second preview clip, when the catalog provides one
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Links to the track on Spotify
    #[serde(default)]
    pub external_urls: ExternalUrls,
    /// Whether the track contains explicit content
    #[serde(default)]
    pub explicit: bool,
    /// Popularity score between 0 and 100
    #[serde(default)]
    pub popularity: u32,
}

impl Track {
    /// Duration formatted as `m:ss`.
    pub fn duration(&self) -> String {
        format_duration(self.duration_ms)
    }

    /// URL of the largest album cover, if any.
    pub fn album_image_url(&self) -> Option<&str> {
        self.album.images.first().map(|image| image.url.as_str())
    }
}

/// A simplified representation of an album used in track listings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct AlbumSummary {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct TopTracks {
    #[serde(default)]
    tracks: Vec<Track>,
}

/// Format a duration in milliseconds as `m:ss`.
///
/// Partial seconds are dropped, not rounded.
///
/// # Example
///
/// ```
/// use concertrs::format_duration;
///
/// assert_eq!(format_duration(65_000), "1:05");
/// assert_eq!(format_duration(600_999), "10:00");
/// ```
pub fn format_duration(duration_ms: u64) -> String {
    let minutes = duration_ms / 60_000;
    let seconds = (duration_ms % 60_000) / 1_000;
    format!("{minutes}:{seconds:02}")
}

impl CatalogClient {
    /// Get an artist's top tracks in a market.
    ///
    /// # Arguments
    ///
    /// * `artist_id` - The unique identifier of the artist
    /// * `market` - Two-letter country code (default: the client's market, "US" unless configured)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: concertrs::CatalogClient) -> Result<(), concertrs::Error> {
    /// let tracks = client.artist_top_tracks("4Z8W4fKeB5YxbusRsdQVPb", None).await?;
    /// for track in tracks {
    ///     println!("{} ({})", track.name, track.duration());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn artist_top_tracks(
        &self,
        artist_id: &str,
        market: Option<&str>,
    ) -> Result<Vec<Track>, Error> {
        let market = market
            .map(|m| m.to_string())
            .unwrap_or_else(|| self.get_market());

        let path = format!("/artists/{artist_id}/top-tracks");
        let resp: TopTracks = self.request(&path, &[("market", market.as_str())]).await?;

        Ok(resp.tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_truncates() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65_000), "1:05");
        assert_eq!(format_duration(59_999), "0:59");
        assert_eq!(format_duration(600_999), "10:00");
        assert_eq!(format_duration(3_723_000), "62:03");
    }

    #[test]
    fn test_track_deserializes_null_preview() {
        let json = r#"{
            "id": "t1",
            "name": "Everything In Its Right Place",
            "album": {"id": "a1", "name": "Kid A", "images": [{"url": "https://i.scdn.co/image/kida", "width": 640, "height": 640}]},
            "artists": [{"id": "r1", "name": "Radiohead"}],
            "duration_ms": 251000,
            "preview_url": null,
            "explicit": false,
            "popularity": 70
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert!(track.preview_url.is_none());
        assert_eq!(track.duration(), "4:11");
        assert_eq!(track.album_image_url(), Some("https://i.scdn.co/image/kida"));
        assert_eq!(track.artists[0].name, "Radiohead");
    }
}
