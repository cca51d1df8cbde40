// ABOUTME: Alamo Drafthouse provider reading the Boston market schedule JSON.
// ABOUTME: Emits one showing per presentation per day, linked to its first session.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{id_text, ShowingProvider};
use crate::error::{KinopyError, Result};
use crate::models::{finalize, DateRange, Showing, ShowingsByDate};
use crate::time_parse::parse_show_date;
use crate::web::WebClient;

pub const SCHEDULE_URL: &str = "https://drafthouse.com/s/mother/v2/schedule/market/boston";

const CINEMA: &str = "Alamo Drafthouse";
const KEY: &str = "alamo_drafthouse";

#[derive(Debug, Deserialize)]
pub struct Schedule {
    pub data: ScheduleData,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleData {
    #[serde(default)]
    pub presentations: Vec<Presentation>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Deserialize)]
pub struct Presentation {
    pub slug: String,
    pub show: Show,
}

#[derive(Debug, Deserialize)]
pub struct Show {
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub presentation_slug: String,
    pub show_time_clt: String,
    pub cinema_id: Value,
    pub session_id: Value,
}

#[derive(Debug, Clone)]
pub struct AlamoProvider {
    schedule_url: String,
}

impl Default for AlamoProvider {
    fn default() -> Self {
        Self::with_url(SCHEDULE_URL)
    }
}

impl AlamoProvider {
    pub fn with_url(schedule_url: impl Into<String>) -> Self {
        Self {
            schedule_url: schedule_url.into(),
        }
    }
}

impl ShowingProvider for AlamoProvider {
    fn cinema(&self) -> &str {
        CINEMA
    }

    fn cache_key(&self) -> &str {
        KEY
    }

    fn fetch(&self, web: &WebClient, range: DateRange) -> Result<ShowingsByDate> {
        info!(cinema = CINEMA, "fetching showings");
        let schedule: Schedule = web.get_json(&self.schedule_url)?;
        Ok(finalize(showings_from_schedule(&schedule)?, range))
    }
}

/// Session link for a presentation.
pub fn session_url(slug: &str, cinema_id: &str, session_id: &str) -> String {
    format!(
        "https://drafthouse.com/boston/show/{slug}?cinemaId={cinema_id}&sessionId={session_id}"
    )
}

/// Groups sessions by day and presentation, producing one showing for each pair.
pub fn showings_from_schedule(schedule: &Schedule) -> Result<ShowingsByDate> {
    let titles: BTreeMap<&str, &str> = schedule
        .data
        .presentations
        .iter()
        .map(|p| (p.slug.as_str(), p.show.title.as_str()))
        .collect();

    let mut by_day: BTreeMap<_, BTreeMap<&str, &Session>> = BTreeMap::new();
    for session in &schedule.data.sessions {
        let slug = session.presentation_slug.as_str();
        if !titles.contains_key(slug) {
            return Err(KinopyError::schema(
                CINEMA,
                format!("session refers to unknown presentation {slug:?}"),
            ));
        }
        let day = parse_show_date(&session.show_time_clt).ok_or_else(|| {
            KinopyError::schema(
                CINEMA,
                format!("unreadable showtime {:?}", session.show_time_clt),
            )
        })?;
        by_day.entry(day).or_default().entry(slug).or_insert(session);
    }

    let mut result = ShowingsByDate::new();
    for (day, sessions) in by_day {
        for (slug, first) in sessions {
            let cinema_id = id_text(&first.cinema_id).unwrap_or_default();
            let session_id = id_text(&first.session_id).unwrap_or_default();
            result.entry(day).or_default().push(Showing::new(
                day,
                titles[slug],
                session_url(slug, &cinema_id, &session_id),
            ));
        }
    }
    Ok(result)
}
