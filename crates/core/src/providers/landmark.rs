// ABOUTME: Landmark Kendall Square provider using the BoxOffice schedule and movie APIs.
// ABOUTME: Prefers Landmark's film summary page over the ticketing link when it exists.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::info;

use super::{id_text, ShowingProvider};
use crate::error::{KinopyError, Result};
use crate::html_utils::title_slug;
use crate::models::{finalize, DateRange, Showing, ShowingsByDate};
use crate::web::WebClient;

pub const SITE_URL: &str = "https://www.landmarktheatres.com";

/// BoxOffice identifier of the Kendall Square location.
pub const THEATER_ID: &str = "X019B";
const TIME_ZONE: &str = "America/New_York";

const CINEMA: &str = "Landmark Kendall Square Cinema";
const KEY: &str = "landmark_kendall_square";

#[derive(Debug, Clone)]
pub struct LandmarkKendallSquareProvider {
    site_url: String,
}

impl Default for LandmarkKendallSquareProvider {
    fn default() -> Self {
        Self::with_url(SITE_URL)
    }
}

impl LandmarkKendallSquareProvider {
    pub fn with_url(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn schedule_url(&self) -> String {
        format!("{}/api/gatsby-source-boxofficeapi/schedule", self.site_url)
    }

    fn movies_url(&self, film_ids: &[String]) -> String {
        let ids: Vec<String> = film_ids.iter().map(|id| format!("ids={id}")).collect();
        format!(
            "{}/api/gatsby-source-boxofficeapi/movies?basic=false&castingLimit=3&{}",
            self.site_url,
            ids.join("&")
        )
    }

    /// Landmark's own page for a film.
    pub fn film_page_url(&self, film_id: &str, title: &str) -> String {
        format!("{}/movies/{}-{}", self.site_url, film_id, title_slug(title))
    }

    fn film_details(&self, web: &WebClient, film_ids: &[String]) -> Result<HashMap<String, Value>> {
        if film_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let details: Vec<Value> = web.get_json(&self.movies_url(film_ids))?;
        Ok(details
            .into_iter()
            .filter_map(|film| Some((id_text(film.get("id")?)?, film)))
            .collect())
    }
}

impl ShowingProvider for LandmarkKendallSquareProvider {
    fn cinema(&self) -> &str {
        CINEMA
    }

    fn cache_key(&self) -> &str {
        KEY
    }

    fn fetch(&self, web: &WebClient, range: DateRange) -> Result<ShowingsByDate> {
        info!(cinema = CINEMA, "fetching showings");
        let payload = json!({
            "theaters": [{"id": THEATER_ID, "timeZone": TIME_ZONE}],
            "from": range.from.format("%Y-%m-%d").to_string(),
            "to": range.to.format("%Y-%m-%d").to_string(),
            "nin": [],
            "sin": [],
        });
        let response: Value = web.post_json(&self.schedule_url(), &payload)?;
        let schedule = response
            .get(THEATER_ID)
            .and_then(|t| t.get("schedule"))
            .and_then(Value::as_object)
            .ok_or_else(|| KinopyError::schema(CINEMA, "response has no schedule"))?;

        let film_ids: Vec<String> = schedule.keys().cloned().collect();
        let details = self.film_details(web, &film_ids)?;

        let mut page_checks: HashMap<String, bool> = HashMap::new();
        let shows = showings_from_schedule(schedule, &details, |film_id, title| {
            let url = self.film_page_url(film_id, title);
            let ok = *page_checks
                .entry(url.clone())
                .or_insert_with(|| web.head_ok(&url));
            ok.then_some(url)
        })?;
        Ok(finalize(shows, range))
    }
}

/// Builds showings from the schedule object (film id → date → presentation data).
///
/// `film_page` returns the preferred link for a film, or `None` to fall back to
/// the first ticketing URL of the presentation.
pub fn showings_from_schedule<F>(
    schedule: &serde_json::Map<String, Value>,
    details: &HashMap<String, Value>,
    mut film_page: F,
) -> Result<ShowingsByDate>
where
    F: FnMut(&str, &str) -> Option<String>,
{
    let mut result = ShowingsByDate::new();

    for (film_id, presentations) in schedule {
        let film = details.get(film_id).ok_or_else(|| {
            KinopyError::schema(CINEMA, format!("no details for film {film_id}"))
        })?;
        let title = film
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| KinopyError::schema(CINEMA, format!("film {film_id} has no title")))?;
        let excerpt = film
            .pointer("/locale/synopsis")
            .and_then(Value::as_str)
            .map(str::to_string);

        let Some(presentations) = presentations.as_object() else {
            continue;
        };
        for (date_text, presentation) in presentations {
            let day = chrono::NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|e| {
                KinopyError::schema(CINEMA, format!("bad schedule date {date_text:?}: {e}"))
            })?;
            let url = match film_page(film_id, title) {
                Some(url) => url,
                None => ticketing_url(presentation).ok_or_else(|| {
                    KinopyError::schema(CINEMA, format!("film {film_id} has no ticketing link"))
                })?,
            };
            result.entry(day).or_default().push(
                Showing::new(day, title, url).with_excerpt(excerpt.clone()),
            );
        }
    }

    Ok(result)
}

/// First ticketing link of a presentation, which may be a single object or a list of them.
fn ticketing_url(presentation: &Value) -> Option<String> {
    let first = match presentation {
        Value::Array(items) => items.first()?,
        other => other,
    };
    first
        .pointer("/data/ticketing/0/urls/0")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn details() -> HashMap<String, Value> {
        HashMap::from([(
            "1234".to_string(),
            json!({"id": 1234, "title": "Past Lives", "locale": {"synopsis": "Two friends."}}),
        )])
    }

    fn schedule() -> serde_json::Map<String, Value> {
        json!({
            "1234": {
                "2024-03-01": [{"data": {"ticketing": [{"urls": ["https://tickets.example/1"]}]}}],
                "2024-03-02": {"data": {"ticketing": [{"urls": ["https://tickets.example/2"]}]}}
            }
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn prefers_film_page_when_available() {
        let shows = showings_from_schedule(&schedule(), &details(), |id, title| {
            Some(format!("https://landmark.example/movies/{id}-{}", title_slug(title)))
        })
        .unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(shows[&day][0].url, "https://landmark.example/movies/1234-Past-Lives");
        assert_eq!(shows[&day][0].excerpt.as_deref(), Some("Two friends."));
    }

    #[test]
    fn falls_back_to_ticketing_link() {
        let shows = showings_from_schedule(&schedule(), &details(), |_, _| None).unwrap();
        let day1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(shows[&day1][0].url, "https://tickets.example/1");
        assert_eq!(shows[&day2][0].url, "https://tickets.example/2");
    }

    #[test]
    fn missing_details_is_a_schema_error() {
        let err = showings_from_schedule(&schedule(), &HashMap::new(), |_, _| None).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn film_page_url_slugs_title() {
        let provider = LandmarkKendallSquareProvider::with_url("https://example.com/");
        assert_eq!(
            provider.film_page_url("77", " The Zone of Interest "),
            "https://example.com/movies/77-The-Zone-of-Interest"
        );
    }
}
