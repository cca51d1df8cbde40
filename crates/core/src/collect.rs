// ABOUTME: Gathers showings from every configured provider through the daily cache.
// ABOUTME: A failing provider is logged and left out instead of aborting the whole calendar.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::cache::DailyCache;
use crate::models::{finalize, DateRange, ShowingsByCinema};
use crate::providers::ShowingProvider;
use crate::web::WebClient;

/// How a calendar build sources its data.
#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    pub range: DateRange,
    /// Day used to pick the cache file.
    pub today: NaiveDate,
    /// Use cached results only; never touch the network.
    pub offline: bool,
}

/// Fetches each provider in order and pairs its showings with the cinema name.
pub fn collect_showings(
    providers: &[Box<dyn ShowingProvider>],
    web: &WebClient,
    cache: &DailyCache,
    opts: CollectOptions,
) -> ShowingsByCinema {
    let mut result = ShowingsByCinema::new();

    for provider in providers {
        let key = provider.cache_key();
        info!(cinema = provider.cinema(), "collecting showings");

        let outcome = if opts.offline {
            cache.load(key, opts.today).map(|cached| {
                if cached.is_none() {
                    warn!(key, "no cached showings for today, skipping");
                }
                cached
            })
        } else {
            cache
                .load_or_fetch(key, opts.today, || provider.fetch(web, opts.range))
                .map(Some)
        };

        match outcome {
            Ok(Some(shows)) => {
                result.push((provider.cinema().to_string(), finalize(shows, opts.range)));
            }
            Ok(None) => {}
            Err(err) => warn!(cinema = provider.cinema(), error = %err, "skipping cinema"),
        }
    }

    result
}
