// ABOUTME: Showing providers that turn cinema websites and APIs into ShowingsByDate.
// ABOUTME: Defines the ShowingProvider trait, shared selector helpers, and the configured provider list.

pub mod alamo;
pub mod brattle;
pub mod harvard;
pub mod landmark;
pub mod regent;
pub mod somerville;

use scraper::Selector;
use serde_json::Value;

use crate::config::Config;
use crate::error::{KinopyError, Result};
use crate::models::{DateRange, ShowingsByDate};
use crate::web::WebClient;

pub use alamo::AlamoProvider;
pub use brattle::BrattleProvider;
pub use harvard::HarvardFilmArchiveProvider;
pub use landmark::LandmarkKendallSquareProvider;
pub use regent::RegentTheatreProvider;
pub use somerville::SomervilleTheatreProvider;

/// A source of showings for one cinema.
pub trait ShowingProvider {
    /// Display name used as the calendar heading and the group label.
    fn cinema(&self) -> &str;

    /// Stable identifier used for cache files and the `disabled` config list.
    fn cache_key(&self) -> &str;

    /// Retrieves showings within `range`, sorted by title within each day.
    fn fetch(&self, web: &WebClient, range: DateRange) -> Result<ShowingsByDate>;
}

/// Builds every provider enabled by `config`, in calendar order.
pub fn configured_providers(config: &Config) -> Vec<Box<dyn ShowingProvider>> {
    let mut providers: Vec<Box<dyn ShowingProvider>> = Vec::new();
    if let Some(settings) = &config.provider.somerville_theatre {
        providers.push(Box::new(SomervilleTheatreProvider::new(settings.token.clone())));
    }
    providers.push(Box::new(BrattleProvider::default()));
    providers.push(Box::new(RegentTheatreProvider::default()));
    providers.push(Box::new(HarvardFilmArchiveProvider::default()));
    providers.push(Box::new(AlamoProvider::default()));
    providers.push(Box::new(LandmarkKendallSquareProvider::default()));

    providers.retain(|p| !config.is_disabled(p.cache_key()));
    providers
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| KinopyError::Selector(css.to_string()))
}

/// Renders a JSON identifier that may arrive as either a string or a number.
pub(crate) fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
