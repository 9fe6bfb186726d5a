use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

/// Venue name used when the provider doesn't name one.
pub const VENUE_TBA: &str = "Venue TBA";
/// Status code assumed when the provider omits `dates.status.code`.
pub const DEFAULT_STATUS_CODE: &str = "onsale";
/// Label returned by [`event_status`] for unknown or missing codes.
pub const UNKNOWN_STATUS_LABEL: &str = "Check Website";

const PREFERRED_IMAGE_RATIO: &str = "16_9";
const PREFERRED_IMAGE_MIN_WIDTH: u32 = 1000;
const UPCOMING_WINDOW_MONTHS: u32 = 6;

/// Body of the Discovery API `events.json` endpoint.
///
/// Only the embedded event list is read. The provider omits `_embedded`
/// entirely when nothing matched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventSearchResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<EmbeddedEvents>,
}

impl EventSearchResponse {
    /// Normalize every embedded event, keeping the provider's order.
    pub fn into_events(self) -> Vec<NormalizedEvent> {
        self.embedded
            .and_then(|embedded| embedded.events)
            .unwrap_or_default()
            .into_iter()
            .map(NormalizedEvent::from_raw)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmbeddedEvents {
    #[serde(default)]
    pub events: Option<Vec<RawEvent>>,
}

/// An event exactly as the ticketing provider returns it.
///
/// Every field is optional; [`NormalizedEvent::from_raw`] fills the gaps.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dates: Option<RawDates>,
    #[serde(default)]
    pub images: Option<Vec<RawImage>>,
    #[serde(default)]
    pub price_ranges: Option<Vec<PriceRange>>,
    #[serde(default)]
    pub ticket_limit: Option<RawTicketLimit>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub please_note: Option<String>,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<RawEventEmbedded>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawDates {
    #[serde(default)]
    pub start: Option<RawStart>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub status: Option<RawStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawStart {
    #[serde(default)]
    pub local_date: Option<String>,
    #[serde(default)]
    pub local_time: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawStatus {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RawImage {
    #[serde(default)]
    pub ratio: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawTicketLimit {
    #[serde(default)]
    pub info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawEventEmbedded {
    #[serde(default)]
    pub venues: Option<Vec<RawVenue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawVenue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<RawNamed>,
    #[serde(default)]
    pub state: Option<RawState>,
    #[serde(default)]
    pub country: Option<RawCountry>,
    #[serde(default)]
    pub address: Option<RawAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawNamed {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawState {
    #[serde(default)]
    pub state_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawCountry {
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawAddress {
    #[serde(default)]
    pub line1: Option<String>,
}

/// When an event starts, in the venue's local time.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventDate {
    /// Calendar date, "YYYY-MM-DD"
    pub local_date: Option<String>,
    /// Wall-clock time, "HH:MM:SS"
    pub local_time: Option<String>,
    /// IANA timezone name of the venue
    pub timezone: Option<String>,
    /// Start instant in UTC, RFC 3339
    pub date_time: Option<String>,
}

/// Where an event takes place.
///
/// Fields are never absent: a missing venue name becomes [`VENUE_TBA`] and
/// every other missing field an empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Venue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub address: String,
}

impl Default for Venue {
    fn default() -> Self {
        Self {
            name: VENUE_TBA.to_string(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            address: String::new(),
        }
    }
}

/// A ticket price band.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PriceRange {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    /// ISO currency code, treated as "USD" when absent
    #[serde(default)]
    pub currency: Option<String>,
}

/// A concert in the shape the rest of the application consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub id: String,
    pub name: String,
    pub url: String,
    pub date: EventDate,
    pub venue: Venue,
    pub price_ranges: Vec<PriceRange>,
    pub ticket_limit: Option<String>,
    /// Provider status code, "onsale" when the provider sent none
    pub status: String,
    pub image_url: String,
    pub info: String,
    pub please_note: String,
}

impl NormalizedEvent {
    /// Flatten a provider event into a [`NormalizedEvent`].
    pub fn from_raw(raw: RawEvent) -> Self {
        let dates = raw.dates.unwrap_or_default();
        let start = dates.start.unwrap_or_default();

        let venue = raw
            .embedded
            .and_then(|embedded| embedded.venues)
            .and_then(|venues| venues.into_iter().next())
            .map(Venue::from_raw)
            .unwrap_or_default();

        let status = dates
            .status
            .and_then(|status| status.code)
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS_CODE.to_string());

        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            date: EventDate {
                local_date: start.local_date,
                local_time: start.local_time,
                timezone: start.timezone.or(dates.timezone),
                date_time: start.date_time,
            },
            venue,
            price_ranges: raw.price_ranges.unwrap_or_default(),
            ticket_limit: raw.ticket_limit.and_then(|limit| limit.info),
            status,
            image_url: select_image_url(raw.images.as_deref().unwrap_or_default()),
            info: raw.info.unwrap_or_default(),
            please_note: raw.please_note.unwrap_or_default(),
        }
    }

    pub fn formatted_date(&self) -> String {
        format_event_date(&self.date)
    }

    pub fn location(&self) -> String {
        format_venue_location(&self.venue)
    }

    pub fn price(&self) -> String {
        format_price_range(&self.price_ranges)
    }

    pub fn status_label(&self) -> &'static str {
        event_status(Some(&self.status))
    }

    pub fn is_upcoming(&self) -> bool {
        is_upcoming(&self.date)
    }
}

impl Venue {
    fn from_raw(raw: RawVenue) -> Self {
        Self {
            name: raw
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| VENUE_TBA.to_string()),
            city: raw.city.and_then(|city| city.name).unwrap_or_default(),
            state: raw.state.and_then(|state| state.state_code).unwrap_or_default(),
            country: raw
                .country
                .and_then(|country| country.country_code)
                .unwrap_or_default(),
            address: raw.address.and_then(|address| address.line1).unwrap_or_default(),
        }
    }
}

/// Pick the best image for an event.
///
/// Preference order: a 16:9 image wider than 1000px, any 16:9 image, the
/// first image. Returns an empty string when there are no images.
pub fn select_image_url(images: &[RawImage]) -> String {
    let is_wide = |image: &&RawImage| image.ratio.as_deref() == Some(PREFERRED_IMAGE_RATIO);

    images
        .iter()
        .filter(is_wide)
        .find(|image| image.width.unwrap_or(0) > PREFERRED_IMAGE_MIN_WIDTH)
        .or_else(|| images.iter().find(is_wide))
        .or_else(|| images.first())
        .and_then(|image| image.url.clone())
        .unwrap_or_default()
}

/// Format an event date for display, e.g. "Wed, Dec 25, 2024 at 7:30 PM".
///
/// Returns "Date TBA" when the event has no local date. A date the provider
/// sent in an unexpected format is shown as-is.
pub fn format_event_date(date: &EventDate) -> String {
    let Some(local_date) = date.local_date.as_deref() else {
        return "Date TBA".to_string();
    };

    let mut formatted = match NaiveDate::parse_from_str(local_date, "%Y-%m-%d") {
        Ok(day) => day.format("%a, %b %-d, %Y").to_string(),
        Err(_) => local_date.to_string(),
    };

    if let Some(local_time) = date.local_time.as_deref().filter(|t| !t.is_empty()) {
        formatted.push_str(" at ");
        formatted.push_str(&format_time(local_time));
    }

    formatted
}

/// Convert a 24 hour "HH:MM:SS" time to "h:MM AM/PM".
///
/// Input without a numeric hour is returned unchanged.
pub fn format_time(time: &str) -> String {
    let mut parts = time.split(':');
    let hour = parts.next().and_then(|hour| hour.trim().parse::<u32>().ok());
    let minutes = parts.next().unwrap_or("00");

    match hour {
        Some(hour) => {
            let suffix = if hour >= 12 { "PM" } else { "AM" };
            let display_hour = match hour % 12 {
                0 => 12,
                h => h,
            };
            format!("{display_hour}:{minutes} {suffix}")
        }
        None => time.to_string(),
    }
}

/// Join city, state and (non-US) country with ", ".
///
/// Returns "Location TBA" when all three are empty.
pub fn format_venue_location(venue: &Venue) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if !venue.city.is_empty() {
        parts.push(&venue.city);
    }
    if !venue.state.is_empty() {
        parts.push(&venue.state);
    }
    if !venue.country.is_empty() && venue.country != "US" {
        parts.push(&venue.country);
    }

    if parts.is_empty() {
        "Location TBA".to_string()
    } else {
        parts.join(", ")
    }
}

/// Render the first price band, e.g. "$45 - $125".
///
/// Returns "Price TBA" when there are no bands.
pub fn format_price_range(price_ranges: &[PriceRange]) -> String {
    let Some(range) = price_ranges.first() else {
        return "Price TBA".to_string();
    };

    let symbol = match range.currency.as_deref().unwrap_or("USD") {
        "USD" => "$",
        other => other,
    };

    if range.min == range.max {
        format!("{symbol}{}", range.min)
    } else {
        format!("{symbol}{} - {symbol}{}", range.min, range.max)
    }
}

/// Ticket sale status as reported by the provider.
#[derive(Debug, Serialize, Deserialize, EnumString, AsRefStr, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventStatus {
    OnSale,
    OffSale,
    Cancelled,
    Postponed,
    Rescheduled,
}

impl EventStatus {
    pub fn label(self) -> &'static str {
        match self {
            EventStatus::OnSale => "On Sale",
            EventStatus::OffSale => "Off Sale",
            EventStatus::Cancelled => "Cancelled",
            EventStatus::Postponed => "Postponed",
            EventStatus::Rescheduled => "Rescheduled",
        }
    }
}

/// Display label for a provider status code, case-insensitive.
///
/// Unknown or missing codes map to [`UNKNOWN_STATUS_LABEL`].
pub fn event_status(code: Option<&str>) -> &'static str {
    code.and_then(|code| code.parse::<EventStatus>().ok())
        .map(EventStatus::label)
        .unwrap_or(UNKNOWN_STATUS_LABEL)
}

/// Whether the event falls between today and six calendar months from
/// today, inclusive.
///
/// The comparison is by calendar date, not by instant: an event dated today
/// counts as upcoming all day, even after its start time has passed. A
/// comparison against midnight UTC of the event date would drop it.
pub fn is_upcoming(date: &EventDate) -> bool {
    is_upcoming_at(date, Utc::now().date_naive())
}

/// [`is_upcoming`] against an explicit `today`.
///
/// Events without a date, or with one that doesn't parse, are never
/// upcoming.
pub fn is_upcoming_at(date: &EventDate, today: NaiveDate) -> bool {
    let Some(event_day) = date
        .local_date
        .as_deref()
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    else {
        return false;
    };

    let Some(window_end) = today.checked_add_months(Months::new(UPCOMING_WINDOW_MONTHS)) else {
        return false;
    };

    today <= event_day && event_day <= window_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(ratio: &str, width: u32, url: &str) -> RawImage {
        RawImage {
            ratio: Some(ratio.to_string()),
            url: Some(url.to_string()),
            width: Some(width),
            height: None,
        }
    }

    fn date(local_date: Option<&str>, local_time: Option<&str>) -> EventDate {
        EventDate {
            local_date: local_date.map(String::from),
            local_time: local_time.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_select_image_prefers_wide_large() {
        let images = vec![
            image("16_9", 500, "small-wide"),
            image("4_3", 2000, "big-square"),
            image("16_9", 1200, "big-wide"),
        ];
        assert_eq!(select_image_url(&images), "big-wide");
    }

    #[test]
    fn test_select_image_fallbacks() {
        let images = vec![image("4_3", 2000, "big-square"), image("16_9", 500, "small-wide")];
        assert_eq!(select_image_url(&images), "small-wide");

        let images = vec![image("3_2", 640, "first"), image("4_3", 2000, "second")];
        assert_eq!(select_image_url(&images), "first");

        assert_eq!(select_image_url(&[]), "");
    }

    #[test]
    fn test_select_image_width_must_exceed_threshold() {
        let images = vec![image("16_9", 1000, "exactly"), image("16_9", 1001, "over")];
        assert_eq!(select_image_url(&images), "over");
    }

    #[test]
    fn test_format_event_date() {
        let formatted = format_event_date(&date(Some("2024-12-25"), Some("19:30:00")));
        assert_eq!(formatted, "Wed, Dec 25, 2024 at 7:30 PM");
        assert!(formatted.ends_with("at 7:30 PM"));

        assert_eq!(format_event_date(&date(Some("2025-03-07"), None)), "Fri, Mar 7, 2025");
        assert_eq!(format_event_date(&date(None, Some("19:30:00"))), "Date TBA");
    }

    #[test]
    fn test_format_time_hour_edges() {
        assert_eq!(format_time("00:15:00"), "12:15 AM");
        assert_eq!(format_time("09:05:00"), "9:05 AM");
        assert_eq!(format_time("11:59:59"), "11:59 AM");
        assert_eq!(format_time("12:00:00"), "12:00 PM");
        assert_eq!(format_time("13:45:00"), "1:45 PM");
        assert_eq!(format_time("23:00:00"), "11:00 PM");
        assert_eq!(format_time(""), "");
    }

    #[test]
    fn test_format_venue_location() {
        let mut venue = Venue {
            city: "Austin".to_string(),
            state: "TX".to_string(),
            country: "US".to_string(),
            ..Default::default()
        };
        assert_eq!(format_venue_location(&venue), "Austin, TX");

        venue.country = "CA".to_string();
        assert_eq!(format_venue_location(&venue), "Austin, TX, CA");

        assert_eq!(format_venue_location(&Venue::default()), "Location TBA");
    }

    #[test]
    fn test_format_price_range() {
        assert_eq!(format_price_range(&[]), "Price TBA");

        let usd = PriceRange {
            min: 45.0,
            max: 125.5,
            currency: Some("USD".to_string()),
        };
        assert_eq!(format_price_range(&[usd]), "$45 - $125.5");

        let flat = PriceRange {
            min: 30.0,
            max: 30.0,
            currency: None,
        };
        assert_eq!(format_price_range(&[flat]), "$30");

        let eur = PriceRange {
            min: 20.0,
            max: 40.0,
            currency: Some("EUR".to_string()),
        };
        assert_eq!(format_price_range(&[eur]), "EUR20 - EUR40");
    }

    #[test]
    fn test_event_status_lookup() {
        assert_eq!(event_status(Some("CANCELLED")), "Cancelled");
        assert_eq!(event_status(Some("onsale")), "On Sale");
        assert_eq!(event_status(Some("OffSale")), "Off Sale");
        assert_eq!(event_status(Some("rescheduled")), "Rescheduled");
        assert_eq!(event_status(Some("sold-out")), "Check Website");
        assert_eq!(event_status(None), "Check Website");
    }

    #[test]
    fn test_is_upcoming_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        assert!(is_upcoming_at(&date(Some("2024-03-15"), None), today));
        assert!(is_upcoming_at(&date(Some("2024-04-15"), None), today));
        assert!(is_upcoming_at(&date(Some("2024-09-15"), None), today));
        assert!(!is_upcoming_at(&date(Some("2024-09-16"), None), today));
        assert!(!is_upcoming_at(&date(Some("2024-10-15"), None), today));
        assert!(!is_upcoming_at(&date(Some("2024-03-14"), None), today));
        assert!(!is_upcoming_at(&date(None, None), today));
        assert!(!is_upcoming_at(&date(Some("soon"), None), today));
    }

    #[test]
    fn test_event_dated_today_is_upcoming() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        // Start time is irrelevant, only the calendar date counts
        assert!(is_upcoming_at(&date(Some("2024-03-15"), Some("00:00:00")), today));
        assert!(is_upcoming_at(&date(Some("2024-03-15"), Some("23:59:00")), today));
    }

    #[test]
    fn test_is_upcoming_relative_to_now() {
        let today = Utc::now().date_naive();
        let in_one_month = today.checked_add_months(Months::new(1)).unwrap();
        let in_seven_months = today.checked_add_months(Months::new(7)).unwrap();

        let day = |d: NaiveDate| date(Some(&d.format("%Y-%m-%d").to_string()), None);

        assert!(is_upcoming(&day(in_one_month)));
        assert!(!is_upcoming(&day(in_seven_months)));
        assert!(!is_upcoming(&EventDate::default()));
    }

    #[test]
    fn test_normalize_fills_venue_and_status_defaults() {
        let raw: RawEvent = serde_json::from_str(r#"{"id": "e1", "name": "Show"}"#).unwrap();
        let event = NormalizedEvent::from_raw(raw);

        assert_eq!(event.venue.name, VENUE_TBA);
        assert_eq!(event.venue.city, "");
        assert_eq!(event.status, DEFAULT_STATUS_CODE);
        assert_eq!(event.status_label(), "On Sale");
        assert_eq!(event.image_url, "");
        assert!(event.price_ranges.is_empty());
        assert_eq!(event.date, EventDate::default());
    }

    #[test]
    fn test_response_without_embedded_events_is_empty() {
        let resp: EventSearchResponse =
            serde_json::from_str(r#"{"page": {"size": 20, "totalElements": 0}}"#).unwrap();
        assert!(resp.into_events().is_empty());

        let resp: EventSearchResponse = serde_json::from_str(r#"{"_embedded": {}}"#).unwrap();
        assert!(resp.into_events().is_empty());
    }
}
