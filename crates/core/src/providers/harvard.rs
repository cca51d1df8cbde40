// ABOUTME: Harvard Film Archive provider scraping the date-ranged calendar page.
// ABOUTME: Each event block contributes one showing dated by its <time datetime> attribute.

use scraper::Html;
use tracing::{info, warn};
use url::Url;

use super::{selector, ShowingProvider};
use crate::error::{KinopyError, Result};
use crate::html_utils::collapse_whitespace;
use crate::models::{finalize, DateRange, Showing, ShowingsByDate};
use crate::time_parse::parse_show_date;
use crate::web::WebClient;

pub const SITE_URL: &str = "https://harvardfilmarchive.org/";

const CINEMA: &str = "Harvard Film Archive";
const KEY: &str = "harvard_film_archive";

#[derive(Debug, Clone)]
pub struct HarvardFilmArchiveProvider {
    site_url: String,
}

impl Default for HarvardFilmArchiveProvider {
    fn default() -> Self {
        Self::with_url(SITE_URL)
    }
}

impl HarvardFilmArchiveProvider {
    pub fn with_url(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
        }
    }

    /// Calendar page covering `range`, with dates written as month/day/year.
    pub fn calendar_url(&self, range: DateRange) -> Result<Url> {
        let base = self.base()?;
        let page = base
            .join("calendar")
            .map_err(|e| KinopyError::schema(CINEMA, e))?;
        Url::parse_with_params(
            page.as_str(),
            &[
                ("date_from", range.from.format("%m/%d/%Y").to_string()),
                ("date_to", range.to.format("%m/%d/%Y").to_string()),
            ],
        )
        .map_err(|e| KinopyError::schema(CINEMA, e))
    }

    fn base(&self) -> Result<Url> {
        Url::parse(&self.site_url).map_err(|e| KinopyError::schema(CINEMA, e))
    }
}

impl ShowingProvider for HarvardFilmArchiveProvider {
    fn cinema(&self) -> &str {
        CINEMA
    }

    fn cache_key(&self) -> &str {
        KEY
    }

    fn fetch(&self, web: &WebClient, range: DateRange) -> Result<ShowingsByDate> {
        info!(cinema = CINEMA, "fetching showings");
        let url = self.calendar_url(range)?;
        let html = web.get_text(url.as_str())?;
        Ok(finalize(showings_from_html(&html, &self.base()?)?, range))
    }
}

/// Parses calendar event blocks; relative links are resolved against `base`.
pub fn showings_from_html(html: &str, base: &Url) -> Result<ShowingsByDate> {
    let event_sel = selector("div.event")?;
    let time_sel = selector("div > time[datetime]")?;
    let title_sel = selector(".event__title")?;
    let link_sel = selector("a.event__link")?;

    let doc = Html::parse_document(html);
    let mut result = ShowingsByDate::new();

    for event in doc.select(&event_sel) {
        let time = event.select(&time_sel).next();
        let title = event.select(&title_sel).next();
        let link = event.select(&link_sel).next();
        let (Some(time), Some(title), Some(link)) = (time, title, link) else {
            warn!(cinema = CINEMA, "event block missing time, title, or link");
            continue;
        };

        let Some(day) = time.value().attr("datetime").and_then(parse_show_date) else {
            warn!(cinema = CINEMA, "event with unreadable datetime");
            continue;
        };
        let href = link.value().attr("href").unwrap_or_default();
        let url = base
            .join(href)
            .map_err(|e| KinopyError::schema(CINEMA, e))?;
        let title = collapse_whitespace(&title.text().collect::<String>());

        result
            .entry(day)
            .or_default()
            .push(Showing::new(day, title, url.to_string()));
    }

    Ok(result)
}
