// ABOUTME: One-week HTML calendar of showings, one column per day and one block per cinema.
// ABOUTME: Cinema blocks carry the cinema's slug as a class so they can be toggled as a group.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::html_utils::{cinema_slug, escape_attr, escape_text};
use crate::models::{DateRange, Showing, ShowingsByCinema};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// CSS class for a weekday, matching the conventional calendar classes.
pub fn weekday_class(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

fn month_abbrev(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

/// Renders showings of several cinemas as a week-long table.
pub struct ShowingCalendar<'a> {
    shows: &'a ShowingsByCinema,
}

impl<'a> ShowingCalendar<'a> {
    pub fn new(shows: &'a ShowingsByCinema) -> Self {
        Self { shows }
    }

    /// Renders the seven days starting at `start`.
    pub fn format_week(&self, start: NaiveDate) -> String {
        self.format_range(DateRange::week_from(start))
    }

    /// Renders one column per day of `range`.
    pub fn format_range(&self, range: DateRange) -> String {
        let days: Vec<NaiveDate> = range.days().collect();

        let mut out = String::new();
        out.push_str("<table>\n");
        out.push_str(&format!(
            "<thead><th colspan=\"{}\"><h3>{} {} - {} {}</h3></th></thead>\n",
            days.len(),
            month_abbrev(range.from),
            range.from.day(),
            month_abbrev(range.to),
            range.to.day()
        ));

        out.push_str("<thead>\n");
        for day in &days {
            out.push_str(&format!(
                "<th class=\"daynum\">{} {}</th>\n",
                weekday_label(day.weekday()),
                day.day()
            ));
        }
        out.push_str("</thead>\n");

        out.push_str("<tr>\n");
        for day in &days {
            out.push_str(&self.format_day(*day));
        }
        out.push_str("</tr>\n</table>\n");
        out
    }

    /// A single day cell with one block per cinema, separated by rules.
    pub fn format_day(&self, day: NaiveDate) -> String {
        let blocks: Vec<String> = self
            .shows
            .iter()
            .map(|(cinema, by_date)| {
                let shows = by_date.get(&day).map(Vec::as_slice).unwrap_or_default();
                format_cinema_block(cinema, shows)
            })
            .collect();

        format!(
            "<td class=\"{}\">\n{}</td>\n",
            weekday_class(day.weekday()),
            blocks.join("<hr/>\n")
        )
    }
}

fn format_cinema_block(cinema: &str, shows: &[Showing]) -> String {
    let mut out = format!(
        "<div class=\"cinema-root {}\">\n<span>{}</span>\n<ul>\n",
        escape_attr(&cinema_slug(cinema)),
        escape_text(cinema)
    );
    for show in shows {
        // No whitespace inside the <li>: its text must equal the title exactly.
        out.push_str(&format!(
            "<li><a href=\"{}\"><i>{}</i></a></li>\n",
            escape_attr(&show.url),
            escape_text(&show.title)
        ));
    }
    out.push_str("</ul>\n</div>\n");
    out
}
