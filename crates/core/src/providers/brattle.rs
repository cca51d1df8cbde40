// ABOUTME: Brattle Theatre provider scraping the "coming soon" listing page.
// ABOUTME: Reads film cards and their data-date timestamps; non-film events are skipped.

use std::collections::BTreeSet;

use scraper::Html;
use tracing::{info, warn};

use super::{selector, ShowingProvider};
use crate::error::Result;
use crate::models::{finalize, DateRange, Showing, ShowingsByDate};
use crate::time_parse::parse_timestamp_date;
use crate::web::WebClient;

pub const LISTING_URL: &str = "https://brattlefilm.org/coming-soon/";

const CINEMA: &str = "The Brattle";
const KEY: &str = "brattle";

#[derive(Debug, Clone)]
pub struct BrattleProvider {
    listing_url: String,
}

impl Default for BrattleProvider {
    fn default() -> Self {
        Self::with_url(LISTING_URL)
    }
}

impl BrattleProvider {
    pub fn with_url(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
        }
    }
}

impl ShowingProvider for BrattleProvider {
    fn cinema(&self) -> &str {
        CINEMA
    }

    fn cache_key(&self) -> &str {
        KEY
    }

    fn fetch(&self, web: &WebClient, range: DateRange) -> Result<ShowingsByDate> {
        info!(cinema = CINEMA, "fetching showings");
        let html = web.get_text(&self.listing_url)?;
        Ok(finalize(showings_from_html(&html)?, range))
    }
}

/// Parses the listing page into showings, one per film per listed day.
pub fn showings_from_html(html: &str) -> Result<ShowingsByDate> {
    let card_sel = selector("div.show-details")?;
    let link_sel = selector("a.title")?;
    let date_sel = selector("div[class*='date-selector'] li[data-date]")?;

    let doc = Html::parse_document(html);
    let mut result = ShowingsByDate::new();

    for card in doc.select(&card_sel) {
        let links: Vec<_> = card.select(&link_sel).collect();
        let [link] = links.as_slice() else {
            warn!(found = links.len(), "film card without a single title link");
            continue;
        };
        let title = link.text().collect::<String>().trim().to_string();
        let Some(url) = link.value().attr("href") else {
            continue;
        };
        // Concerts and talks share this listing; only film pages live under /movies/.
        if !url.contains("/movies/") {
            continue;
        }

        let days: BTreeSet<_> = card
            .select(&date_sel)
            .filter_map(|li| li.value().attr("data-date"))
            .filter_map(parse_timestamp_date)
            .collect();

        for day in days {
            result
                .entry(day)
                .or_default()
                .push(Showing::new(day, title.clone(), url));
        }
    }

    Ok(result)
}
