// ABOUTME: Regent Theatre provider querying the site's EventON calendar endpoint.
// ABOUTME: Keeps only events whose embedded HTML card is tagged as a movie.

use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;
use scraper::Html;
use serde_json::Value;
use tracing::{debug, info};

use super::{selector, ShowingProvider};
use crate::error::{KinopyError, Result};
use crate::html_utils::{collapse_whitespace, decode_entities};
use crate::models::{finalize, DateRange, Showing, ShowingsByDate};
use crate::time_parse::{local_date_from_timestamp, local_midnight_timestamp, parse_timestamp_date};
use crate::web::WebClient;

pub const SITE_URL: &str = "https://regenttheatre.com/";

/// Landing page used for every showing; event cards carry no stable per-film link.
pub const SCHEDULE_PAGE: &str = "https://regenttheatre.com/schedule/";

const CALENDAR_ID: &str = "evcal_calendar_685";
const CINEMA: &str = "Regent Theatre";
const KEY: &str = "regent_theatre";

/// Fixed calendar shortcode options sent with every query.
const CALENDAR_OPTIONS: &[(&str, &str)] = &[
    ("calendar_type", "fullcal"),
    ("event_count", "0"),
    ("event_order", "ASC"),
    ("event_past_future", "all"),
    ("event_status", "all"),
    ("event_type", "all"),
    ("event_type_2", "all"),
    ("event_location", "all"),
    ("event_organizer", "all"),
    ("event_tag", "all"),
    ("event_virtual", "all"),
    ("filters", "yes"),
    ("hide_past", "no"),
    ("hide_past_by", "ee"),
    ("lang", "L1"),
    ("load_fullmonth", "yes"),
    ("month_incre", "0"),
    ("day_incre", "0"),
    ("number_of_months", "1"),
    ("show_repeats", "no"),
    ("show_limit", "no"),
    ("show_limit_paged", "1"),
    ("sort_by", "sort_date"),
    ("_cver", "4.9.11"),
];
const NONCE: &str = "95e6b2f613";

#[derive(Debug, Clone)]
pub struct RegentTheatreProvider {
    site_url: String,
}

impl Default for RegentTheatreProvider {
    fn default() -> Self {
        Self::with_url(SITE_URL)
    }
}

impl RegentTheatreProvider {
    pub fn with_url(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}?evo-ajax=eventon_init_load", self.site_url)
    }
}

/// Form body for a month-at-a-time query anchored on `range.from`.
pub fn calendar_form(range: DateRange) -> Vec<(String, String)> {
    let key = |name: &str| format!("cals[{CALENDAR_ID}][sc][{name}]");
    let mut form = vec![("global[calendars][]".to_string(), "EVOFC".to_string())];
    form.extend(
        CALENDAR_OPTIONS
            .iter()
            .map(|(name, value)| (key(name), value.to_string())),
    );

    let focus_start = local_midnight_timestamp(range.from).unwrap_or_default();
    let focus_end = local_midnight_timestamp(range.to).unwrap_or_default();
    form.push((key("fixed_day"), range.from.day().to_string()));
    form.push((key("fixed_month"), range.from.month().to_string()));
    form.push((key("fixed_year"), range.from.year().to_string()));
    form.push((key("focus_start_date_range"), focus_start.to_string()));
    form.push((key("focus_end_date_range"), focus_end.to_string()));
    form.push(("nonce".to_string(), NONCE.to_string()));
    form
}

impl ShowingProvider for RegentTheatreProvider {
    fn cinema(&self) -> &str {
        CINEMA
    }

    fn cache_key(&self) -> &str {
        KEY
    }

    fn fetch(&self, web: &WebClient, range: DateRange) -> Result<ShowingsByDate> {
        info!(cinema = CINEMA, "fetching showings");
        let response: Value = web.post_form_json(&self.endpoint(), &calendar_form(range))?;
        // The endpoint serves whole months, so out-of-range days are trimmed here.
        Ok(finalize(showings_from_response(&response)?, range))
    }
}

/// Extracts movie showings from the calendar response.
pub fn showings_from_response(response: &Value) -> Result<ShowingsByDate> {
    let calendar = response
        .pointer(&format!("/cals/{CALENDAR_ID}"))
        .ok_or_else(|| KinopyError::schema(CINEMA, "response has no calendar"))?;
    let events = calendar
        .get("json")
        .and_then(Value::as_array)
        .ok_or_else(|| KinopyError::schema(CINEMA, "calendar has no event list"))?;
    let card_html = calendar.get("html").and_then(Value::as_str).unwrap_or_default();
    let non_movies = non_movie_event_ids(card_html)?;

    let mut by_id: BTreeMap<i64, &Value> = BTreeMap::new();
    for event in events {
        let Some(id) = event.get("event_id").and_then(as_i64) else {
            continue;
        };
        if non_movies.contains(&id) {
            continue;
        }
        by_id.insert(id, event);
    }

    let mut result = ShowingsByDate::new();
    for event in by_id.values() {
        let day = event
            .get("event_start_unix")
            .and_then(as_i64)
            .and_then(local_date_from_timestamp)
            .ok_or_else(|| KinopyError::schema(CINEMA, "event without a start time"))?;
        let title = event
            .get("event_title")
            .and_then(Value::as_str)
            .map(decode_entities)
            .unwrap_or_default();
        result
            .entry(day)
            .or_default()
            .push(Showing::new(day, title, SCHEDULE_PAGE));
    }
    Ok(result)
}

/// Event ids whose cards lack a "movie" tag. Tags only exist in the rendered cards.
fn non_movie_event_ids(html: &str) -> Result<HashSet<i64>> {
    let card_sel = selector("div[data-time]")?;
    let title_sel = selector("span[class*='evoet_title']")?;
    let tag_sel = selector("em[data-tagid]")?;

    let doc = Html::parse_fragment(html);
    let mut ids = HashSet::new();
    for card in doc.select(&card_sel) {
        let Some(id) = card
            .value()
            .attr("data-event_id")
            .and_then(|v| v.trim().parse::<i64>().ok())
        else {
            continue;
        };
        let is_movie = card.select(&tag_sel).any(|tag| {
            tag.text()
                .collect::<String>()
                .trim()
                .trim_matches(',')
                .eq_ignore_ascii_case("movie")
        });
        if !is_movie {
            let title = card
                .select(&title_sel)
                .next()
                .map(|t| collapse_whitespace(&t.text().collect::<String>()))
                .unwrap_or_default();
            let start = card
                .value()
                .attr("data-time")
                .and_then(|v| v.split('-').next())
                .and_then(parse_timestamp_date);
            debug!(title = %title, ?start, "not a movie, dropping");
            ids.insert(id);
        }
    }
    Ok(ids)
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
