// ABOUTME: Rust models for cinema showings grouped by day and cinema.
// ABOUTME: Provides Showing, DateRange, and the finalize step shared by all providers.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single film presentation on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    pub date: NaiveDate,
    pub title: String,
    pub url: String,
    /// Free-form descriptive text; only some cinemas provide one.
    #[serde(default)]
    pub excerpt: Option<String>,
}

impl Showing {
    pub fn new(date: NaiveDate, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            date,
            title: title.into(),
            url: url.into(),
            excerpt: None,
        }
    }

    pub fn with_excerpt(mut self, excerpt: Option<String>) -> Self {
        self.excerpt = excerpt;
        self
    }
}

/// Showings for one cinema keyed by calendar day.
pub type ShowingsByDate = BTreeMap<NaiveDate, Vec<Showing>>;

/// Showings for every cinema in display order, paired with the cinema's name.
pub type ShowingsByCinema = Vec<(String, ShowingsByDate)>;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Covers `days` consecutive days starting at `start`. Zero days is treated as one.
    pub fn starting_at(start: NaiveDate, days: u32) -> Self {
        let span = u64::from(days.max(1) - 1);
        let to = start.checked_add_days(Days::new(span)).unwrap_or(NaiveDate::MAX);
        Self::new(start, to)
    }

    pub fn week_from(start: NaiveDate) -> Self {
        Self::starting_at(start, 7)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from.iter_days().take_while(move |d| *d <= self.to)
    }
}

/// Drops days outside `range` and orders each day's showings by title.
pub fn finalize(mut showings: ShowingsByDate, range: DateRange) -> ShowingsByDate {
    showings.retain(|date, shows| range.contains(*date) && !shows.is_empty());
    for shows in showings.values_mut() {
        shows.sort_by(|a, b| a.title.cmp(&b.title));
    }
    showings
}
