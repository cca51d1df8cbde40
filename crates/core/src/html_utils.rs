// ABOUTME: HTML utility functions for scraped titles and rendered calendar markup.
// ABOUTME: Provides escaping, entity decoding, whitespace normalization, and cinema slugs.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Named entities that show up in cinema listing titles.
static NAMED_ENTITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", " "),
        ("ndash", "–"),
        ("mdash", "—"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("hellip", "…"),
        ("eacute", "é"),
        ("egrave", "è"),
        ("aacute", "á"),
        ("oacute", "ó"),
        ("ntilde", "ñ"),
        ("uuml", "ü"),
        ("ouml", "ö"),
        ("copy", "©"),
        ("reg", "®"),
        ("trade", "™"),
    ])
});

/// Escapes text for use between tags.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes text for use inside a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes text for use inside a single-quoted JavaScript string literal.
pub fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3C"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decodes named and numeric HTML entities in a single pass.
/// Unknown or malformed entities are left as written.
pub fn decode_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_one(tail) {
            Some((decoded, consumed)) => {
                result.push_str(&decoded);
                rest = &tail[consumed..];
            }
            None => {
                result.push('&');
                rest = &tail[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Decodes the entity at the start of `s` (which begins with '&').
/// Returns the replacement and the number of bytes consumed.
fn decode_one(s: &str) -> Option<(String, usize)> {
    let semi = s.find(';')?;
    let body = &s[1..semi];
    if body.is_empty() || body.len() > 10 {
        return None;
    }

    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        let ch = char::from_u32(code)?;
        return Some((ch.to_string(), semi + 1));
    }

    NAMED_ENTITIES
        .get(body)
        .map(|value| (value.to_string(), semi + 1))
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Class label used for a cinema's calendar blocks and its filter checkbox.
pub fn cinema_slug(cinema: &str) -> String {
    cinema.to_lowercase().replace(' ', "-")
}

/// Title fragment used by cinema sites in film page URLs.
pub fn title_slug(title: &str) -> String {
    title.trim().replace(' ', "-")
}
