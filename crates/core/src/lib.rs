// ABOUTME: Core library for kinopy, a weekly calendar of Boston-area film showings.
// ABOUTME: Provides providers, caching, calendar rendering, and the document visibility toggler.

pub mod cache;
pub mod calendar;
pub mod collect;
pub mod config;
pub mod dom;
pub mod error;
pub mod html_utils;
pub mod models;
pub mod page;
pub mod providers;
pub mod time_parse;
pub mod toggle;
pub mod web;

pub use cache::DailyCache;
pub use calendar::ShowingCalendar;
pub use collect::{collect_showings, CollectOptions};
pub use config::Config;
pub use dom::{Document, DocumentTree, NodeId};
pub use error::{KinopyError, Result};
pub use models::{finalize, DateRange, Showing, ShowingsByCinema, ShowingsByDate};
pub use page::{render_page, write_page};
pub use providers::{configured_providers, ShowingProvider};
pub use toggle::{ConsoleNotifier, Notifier, VisibilityToggler, GREETING, HIDDEN_CLASS};
pub use web::{WebClient, WebOptions};
