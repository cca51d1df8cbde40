// ABOUTME: CLI for building the weekly showings calendar and toggling rendered pages.
// ABOUTME: Subcommands: build (fetch and render), toggle (flip hidden classes), hi (greeting).

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use kinopy_core::{
    collect_showings, configured_providers, render_page, write_page, CollectOptions, Config,
    ConsoleNotifier, DailyCache, DateRange, Document, VisibilityToggler, WebClient,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Boston-area film showings as a weekly HTML calendar.
#[derive(Parser, Debug)]
#[command(name = "kinopy")]
#[command(about = "Build and filter a weekly calendar of cinema showings", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch showings from every configured cinema and write the calendar page.
    Build {
        /// Config file path. Defaults to ./kinopy.toml when present.
        #[arg(long, env = "KINOPY_CONFIG")]
        config: Option<PathBuf>,

        /// Where to write the page; cal.js and cal.css land beside it.
        #[arg(long, short, default_value = "cal.html")]
        output: PathBuf,

        /// First day of the calendar (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Number of days to fetch and show. Overrides the config file.
        #[arg(long)]
        days: Option<u32>,

        /// Use today's cached results only.
        #[arg(long, default_value_t = false)]
        offline: bool,
    },

    /// Flip visibility of cinema groups or titles in a rendered page.
    Toggle {
        /// Page to read.
        page: PathBuf,

        /// Group label (cinema slug) to toggle. May be repeated.
        #[arg(long = "group", short)]
        groups: Vec<String>,

        /// Exact title to toggle. May be repeated.
        #[arg(long = "title", short)]
        titles: Vec<String>,

        /// Write the result here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show the greeting and wait for it to be dismissed.
    Hi,
}

fn main() -> Result<()> {
    init_logging()?;
    let args = Args::parse();

    match args.command {
        Command::Build {
            config,
            output,
            start,
            days,
            offline,
        } => build(config, output, start, days, offline),
        Command::Toggle {
            page,
            groups,
            titles,
            output,
        } => toggle(page, &groups, &titles, output),
        Command::Hi => {
            let stdin = io::stdin();
            let notifier = ConsoleNotifier::new(stdin.lock(), io::stdout());
            VisibilityToggler::new(notifier).notify();
            Ok(())
        }
    }
}

fn build(
    config_path: Option<PathBuf>,
    output: PathBuf,
    start: Option<NaiveDate>,
    days: Option<u32>,
    offline: bool,
) -> Result<()> {
    let cwd = env::current_dir().context("cannot determine working directory")?;
    let config = Config::load_with_overrides(config_path.as_deref(), &cwd)?;

    let today = Local::now().date_naive();
    let start = start.unwrap_or(today);
    let range = DateRange::starting_at(start, days.unwrap_or(config.days));

    let web = WebClient::new(config.web_options())?;
    let cache = DailyCache::new(&config.cache_dir);
    let providers = configured_providers(&config);
    info!(
        providers = providers.len(),
        from = %range.from,
        to = %range.to,
        offline,
        "building calendar"
    );

    let shows = collect_showings(
        &providers,
        &web,
        &cache,
        CollectOptions {
            range,
            today,
            offline,
        },
    );
    let html = render_page(&shows, range);
    let written = write_page(&output, &html)?;
    for path in written {
        info!(path = %path.display(), "wrote");
    }
    Ok(())
}

fn toggle(
    page: PathBuf,
    groups: &[String],
    titles: &[String],
    output: Option<PathBuf>,
) -> Result<()> {
    let source = fs::read_to_string(&page)
        .with_context(|| format!("failed to read {}", page.display()))?;
    let mut doc = Document::parse_html(&source);

    // Toggling never prompts, so the notifier is only a placeholder here.
    let toggler = VisibilityToggler::new(ConsoleNotifier::new(io::empty(), io::sink()));
    for group in groups {
        toggler.toggle_by_group(&mut doc, group);
    }
    for title in titles {
        toggler.toggle_by_text(&mut doc, title);
    }

    let html = doc.to_html();
    match output {
        Some(path) => fs::write(&path, html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout().write_all(html.as_bytes())?,
    }
    Ok(())
}

/// Logs go to stderr so page output on stdout stays clean.
///
/// Filter priority: `KINOPY_LOG` > `RUST_LOG` > `warn,kinopy=info,kinopy_core=info`.
fn init_logging() -> Result<()> {
    let filter = match (env::var("KINOPY_LOG"), env::var("RUST_LOG")) {
        (Ok(level), _) => expand_kinopy_log(&level),
        (Err(_), Ok(rust_log)) => EnvFilter::new(rust_log),
        _ => EnvFilter::new("warn,kinopy=info,kinopy_core=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

/// A bare level such as `debug` applies to the kinopy crates only; anything
/// with directives is used as written.
fn expand_kinopy_log(value: &str) -> EnvFilter {
    if value.contains(['=', ':', ',']) {
        return EnvFilter::new(value);
    }
    EnvFilter::new(format!("warn,kinopy={value},kinopy_core={value}"))
}
