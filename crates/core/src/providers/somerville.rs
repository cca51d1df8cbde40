// ABOUTME: Somerville Theatre provider reading web sessions from the Veezi API.
// ABOUTME: Requires an access token; collapses multiple sessions of a film on one day.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{id_text, ShowingProvider};
use crate::error::Result;
use crate::models::{finalize, DateRange, Showing, ShowingsByDate};
use crate::time_parse::parse_show_date;
use crate::web::WebClient;

pub const SESSIONS_URL: &str = "https://api.us.veezi.com/v1/websession";
const TOKEN_HEADER: &str = "VeeziAccessToken";

const CINEMA: &str = "Somerville Theatre";
const KEY: &str = "somerville_theatre";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebSession {
    pub film_id: Value,
    pub feature_start_time: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Clone)]
pub struct SomervilleTheatreProvider {
    token: String,
    sessions_url: String,
}

impl std::fmt::Debug for SomervilleTheatreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SomervilleTheatreProvider")
            .field("sessions_url", &self.sessions_url)
            .finish_non_exhaustive()
    }
}

impl SomervilleTheatreProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            sessions_url: SESSIONS_URL.to_string(),
        }
    }

    pub fn with_url(mut self, sessions_url: impl Into<String>) -> Self {
        self.sessions_url = sessions_url.into();
        self
    }
}

impl ShowingProvider for SomervilleTheatreProvider {
    fn cinema(&self) -> &str {
        CINEMA
    }

    fn cache_key(&self) -> &str {
        KEY
    }

    fn fetch(&self, web: &WebClient, range: DateRange) -> Result<ShowingsByDate> {
        info!(cinema = CINEMA, "fetching showings");
        let sessions: Vec<WebSession> =
            web.get_json_with_headers(&self.sessions_url, &[(TOKEN_HEADER, self.token.as_str())])?;
        Ok(finalize(showings_from_sessions(&sessions), range))
    }
}

/// One showing per film per day; later sessions of the same film that day are dropped.
pub fn showings_from_sessions(sessions: &[WebSession]) -> ShowingsByDate {
    let mut seen = HashSet::new();
    let mut result = ShowingsByDate::new();

    for session in sessions {
        let Some(day) = parse_show_date(&session.feature_start_time) else {
            warn!(
                cinema = CINEMA,
                start = %session.feature_start_time,
                "session with unreadable start time"
            );
            continue;
        };
        let film = id_text(&session.film_id).unwrap_or_else(|| session.title.clone());
        if !seen.insert((day, film)) {
            continue;
        }
        let url = session.url.clone().unwrap_or_default();
        result
            .entry(day)
            .or_default()
            .push(Showing::new(day, session.title.clone(), url));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sessions() -> Vec<WebSession> {
        serde_json::from_value(serde_json::json!([
            {"FilmId": "HO0001", "FeatureStartTime": "2024-03-01T19:00:00", "Title": "Jaws", "Url": "https://ticketing.example/1"},
            {"FilmId": "HO0001", "FeatureStartTime": "2024-03-01T21:30:00", "Title": "Jaws", "Url": "https://ticketing.example/2"},
            {"FilmId": "HO0001", "FeatureStartTime": "2024-03-02T19:00:00", "Title": "Jaws", "Url": "https://ticketing.example/3"},
            {"FilmId": "HO0002", "FeatureStartTime": "whenever", "Title": "Broken"}
        ]))
        .unwrap()
    }

    #[test]
    fn collapses_sessions_per_day() {
        let shows = showings_from_sessions(&sessions());
        let day1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        assert_eq!(shows.len(), 2);
        assert_eq!(shows[&day1].len(), 1);
        assert_eq!(shows[&day1][0].url, "https://ticketing.example/1");
        assert_eq!(shows[&day2][0].url, "https://ticketing.example/3");
    }

    #[test]
    fn debug_output_hides_token() {
        let provider = SomervilleTheatreProvider::new("super-secret");
        assert!(!format!("{provider:?}").contains("super-secret"));
    }
}
