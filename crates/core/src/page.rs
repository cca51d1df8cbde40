// ABOUTME: Full calendar page with cinema and title filter checkboxes wired to cal.js.
// ABOUTME: Also writes the page together with its cal.js and cal.css companions.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::ShowingCalendar;
use crate::error::{KinopyError, Result};
use crate::html_utils::{cinema_slug, escape_attr, escape_js_string, escape_text};
use crate::models::{DateRange, ShowingsByCinema};

pub const PAGE_TITLE: &str = "Movie showings in selected theatres in the Boston metro area";

/// Browser-side counterpart of the visibility toggler.
pub const CAL_JS: &str = include_str!("../assets/cal.js");
pub const CAL_CSS: &str = include_str!("../assets/cal.css");

/// Renders the complete HTML document with one calendar column per day of `range`.
pub fn render_page(shows: &ShowingsByCinema, range: DateRange) -> String {
    let table = ShowingCalendar::new(shows).format_range(range);

    let cinema_boxes: Vec<String> = shows
        .iter()
        .map(|(cinema, _)| {
            checkbox(
                &format!("toggleCinema('{}')", escape_js_string(&cinema_slug(cinema))),
                cinema,
            )
        })
        .collect();

    let titles: BTreeSet<&str> = shows
        .iter()
        .flat_map(|(_, by_date)| by_date.values())
        .flatten()
        .map(|show| show.title.as_str())
        .collect();
    let title_boxes: Vec<String> = titles
        .into_iter()
        .map(|title| checkbox(&format!("toggleMovie('{}')", escape_js_string(title)), title))
        .collect();

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n\
         <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">\n\
         <title>{PAGE_TITLE}</title>\n\
         <link type=\"text/css\" rel=\"stylesheet\" href=\"cal.css\">\n\
         <script src=\"cal.js\"></script>\n\
         </head>\n<body>\n{table}<hr/>\n\
         <div class=\"cinema-filters\">\n{}</div>\n\
         <div class=\"title-filters\">\n{}</div>\n\
         </body>\n</html>\n",
        cinema_boxes.join(""),
        title_boxes.join("")
    )
}

fn checkbox(onclick: &str, label: &str) -> String {
    format!(
        "<label><input type=\"checkbox\" checked onclick=\"{}\">{}</label><br/>\n",
        escape_attr(onclick),
        escape_text(label)
    )
}

/// Writes `html` to `output` and the stylesheet and script beside it.
/// Returns every path written.
pub fn write_page(output: &Path, html: &str) -> Result<Vec<PathBuf>> {
    let dir = output.parent().unwrap_or_else(|| Path::new(""));
    let files = [
        (output.to_path_buf(), html),
        (dir.join("cal.js"), CAL_JS),
        (dir.join("cal.css"), CAL_CSS),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (path, contents) in files {
        fs::write(&path, contents).map_err(|source| KinopyError::Output {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Showing, ShowingsByDate};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn shows() -> ShowingsByCinema {
        let mut a = ShowingsByDate::new();
        a.insert(ymd(1), vec![Showing::new(ymd(1), "Singin' in the Rain", "u1")]);
        let mut b = ShowingsByDate::new();
        b.insert(
            ymd(2),
            vec![Showing::new(ymd(2), "Alien", "u2"), Showing::new(ymd(2), "Singin' in the Rain", "u3")],
        );
        vec![("The Brattle".into(), a), ("Somerville Theatre".into(), b)]
    }

    #[test]
    fn titles_are_unique_sorted_and_escaped() {
        let html = render_page(&shows(), DateRange::week_from(ymd(1)));
        let filters = html.split("<div class=\"title-filters\">").nth(1).unwrap();
        assert_eq!(filters.matches("type=\"checkbox\"").count(), 2);
        assert!(filters.find("Alien").unwrap() < filters.find("Singin").unwrap());
        assert!(filters.contains("onclick=\"toggleMovie('Singin\\' in the Rain')\""));
    }

    #[test]
    fn cinema_checkboxes_use_slugs() {
        let html = render_page(&shows(), DateRange::week_from(ymd(1)));
        assert!(html.contains("onclick=\"toggleCinema('the-brattle')\""));
        assert!(html.contains("onclick=\"toggleCinema('somerville-theatre')\""));
        assert!(html.contains(&format!("<title>{PAGE_TITLE}</title>")));
    }

    #[test]
    fn write_page_emits_assets() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("cal.html");
        let written = write_page(&out, "<html></html>").unwrap();
        assert_eq!(written.len(), 3);
        assert!(fs::read_to_string(dir.path().join("cal.css")).unwrap().contains(".hidden"));
        assert!(fs::read_to_string(dir.path().join("cal.js"))
            .unwrap()
            .contains("function toggleMovie"));
    }
}
