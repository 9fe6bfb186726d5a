use crate::Artist;
use crate::CatalogClient;
use crate::Error;
use crate::EventsClient;
use crate::NormalizedEvent;
use crate::Track;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Number of artists requested per search.
pub const SEARCH_RESULT_LIMIT: u32 = 12;
/// Number of top tracks kept for the selected artist.
pub const TOP_TRACKS_SHOWN: usize = 10;
/// Banner text shown when an artist search fails.
pub const SEARCH_ERROR_MESSAGE: &str =
    "Failed to search artists. Please check your API credentials.";

/// Loading flag, items and error of one independently loaded list.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane<T> {
    pub loading: bool,
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> Default for Pane<T> {
    fn default() -> Self {
        Self {
            loading: false,
            items: Vec::new(),
            error: None,
        }
    }
}

impl<T> Pane<T> {
    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self, items: Vec<T>, error: Option<String>) {
        self.loading = false;
        self.items = items;
        self.error = error;
    }
}

/// Everything a front-end needs to render the search and artist detail
/// views.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub search_loading: bool,
    pub search_results: Vec<Artist>,
    /// Banner error for the search box
    pub error: Option<String>,
    pub selected_artist: Option<Artist>,
    pub top_tracks: Pane<Track>,
    pub events: Pane<NormalizedEvent>,
}

/// Drives artist search and the artist detail view.
///
/// Selecting an artist starts the top-tracks and events lookups together;
/// each one updates its own [`Pane`] as soon as it completes. Every search
/// and selection gets a generation number, and a result is only applied if
/// no newer search or selection has started since. A slow lookup for a
/// previously selected artist therefore can't overwrite the current one.
///
/// # Example
///
/// ```no_run
/// use concertrs::{ArtistSession, CatalogClient, EventsClient};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let session = ArtistSession::new(
///     Arc::new(CatalogClient::new("id".to_string(), "secret".to_string())),
///     Arc::new(EventsClient::new("key".to_string())),
/// );
///
/// session.search("Radiohead").await;
/// if let Some(artist) = session.snapshot().search_results.first().cloned() {
///     session.select_artist(artist).await;
/// }
/// println!("{} upcoming events", session.snapshot().events.items.len());
/// # }
/// ```
pub struct ArtistSession {
    catalog: Arc<CatalogClient>,
    events: Arc<EventsClient>,
    search_generation: AtomicU64,
    selection_generation: AtomicU64,
    state: Mutex<SessionState>,
}

impl ArtistSession {
    pub fn new(catalog: Arc<CatalogClient>, events: Arc<EventsClient>) -> Self {
        Self {
            catalog,
            events,
            search_generation: AtomicU64::new(0),
            selection_generation: AtomicU64::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// Generation of the most recent artist selection.
    pub fn selection_generation(&self) -> u64 {
        self.selection_generation.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run an artist search and store the results.
    ///
    /// On failure the banner error is set and previous results are kept.
    /// An empty result clears the selection and both detail panes.
    pub async fn search(&self, query: &str) {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.search_loading = true;
            state.error = None;
        }

        let result = self
            .catalog
            .search_artists(query, Some(SEARCH_RESULT_LIMIT))
            .await;

        self.apply_search(generation, result);
    }

    pub(crate) fn apply_search(&self, generation: u64, result: Result<Vec<Artist>, Error>) {
        let mut state = self.lock();
        if self.search_generation.load(Ordering::SeqCst) != generation {
            log::debug!("Discarding stale search result (generation {generation})");
            return;
        }

        state.search_loading = false;
        match result {
            Ok(artists) => {
                if artists.is_empty() {
                    // Lookups still running for the cleared artist are now stale
                    self.selection_generation.fetch_add(1, Ordering::SeqCst);
                    state.selected_artist = None;
                    state.top_tracks = Pane::default();
                    state.events = Pane::default();
                }
                state.search_results = artists;
            }
            Err(e) => {
                log::error!("Search error: {}", e);
                state.error = Some(SEARCH_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Select an artist and load its top tracks and events concurrently.
    ///
    /// Returns once both lookups have finished (or been superseded).
    pub async fn select_artist(&self, artist: Artist) {
        let generation = self.begin_selection(&artist);

        let tracks = async {
            let result = self.catalog.artist_top_tracks(&artist.id, None).await;
            self.apply_top_tracks(generation, result);
        };

        let events = async {
            let events = self.events.search_events(&artist.name, None).await;
            self.apply_events(generation, events);
        };

        tokio::join!(tracks, events);
    }

    pub(crate) fn begin_selection(&self, artist: &Artist) -> u64 {
        let mut state = self.lock();
        let generation = self.selection_generation.fetch_add(1, Ordering::SeqCst) + 1;

        state.selected_artist = Some(artist.clone());
        state.error = None;
        state.top_tracks.start();
        state.events.start();

        generation
    }

    pub(crate) fn apply_top_tracks(&self, generation: u64, result: Result<Vec<Track>, Error>) {
        let mut state = self.lock();
        if self.selection_generation() != generation {
            log::debug!("Discarding stale top tracks (generation {generation})");
            return;
        }

        match result {
            Ok(mut tracks) => {
                tracks.truncate(TOP_TRACKS_SHOWN);
                state.top_tracks.finish(tracks, None);
            }
            Err(e) => {
                log::error!("Error fetching tracks: {}", e);
                state.top_tracks.finish(Vec::new(), Some(e.to_string()));
            }
        }
    }

    pub(crate) fn apply_events(&self, generation: u64, events: Vec<NormalizedEvent>) {
        let mut state = self.lock();
        if self.selection_generation() != generation {
            log::debug!("Discarding stale events (generation {generation})");
            return;
        }

        state.events.finish(events, None);
    }
}
