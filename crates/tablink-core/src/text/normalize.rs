//! Cell value cleaning.
//!
//! Rules run in a fixed order; see [`clean_cell`].

use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

/// Byte sequences left behind by double-encoded UTF-8, and their repair.
const MOJIBAKE: &[(&str, &str)] = &[
    ("Äu0087", "ć"),
    ("Äu0090", "Đ"),
    ("Ãu0096", "Ö"),
    ("Åu008D", "ō"),
    ("Ã¶", "ö"),
    ("Ã¤", "ä"),
    ("Ã¼", "ü"),
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ã¡", "á"),
    ("Ã³", "ó"),
    ("Ã±", "ñ"),
    ("ÃŸ", "ß"),
    ("â€™", "'"),
    ("â€˜", "'"),
    ("â€œ", "\""),
    ("â€“", "–"),
    ("â€”", "—"),
];

const BOM: char = '\u{feff}';

const CAMEL_BOUNDARY: &str = r"([a-z])([A-Z])";
const LOWER_CAMEL_TOKEN: &str = r"^[a-z]+[A-Z][A-Za-z]*$";

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern, error = %e, "invalid cell cleaning pattern; rule disabled");
            None
        }
    }
}

fn camel_boundary() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| compile(CAMEL_BOUNDARY)).as_ref()
}

fn lower_camel_token() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| compile(LOWER_CAMEL_TOKEN)).as_ref()
}

/// Clean a raw cell value into a search keyword.
///
/// Returns `None` for values without any ASCII letter (numbers, dates,
/// empty cells) and for values that end up empty.
///
/// Order: strip BOM and control characters, repair mojibake, NFKC fold,
/// uncurl quotes, turn slashes into spaces, split a lower-camel-case token,
/// drop bracketed parts, collapse whitespace.
pub fn clean_cell(raw: &str) -> Option<String> {
    if !raw.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut s: String = raw
        .chars()
        .filter(|&c| c != BOM)
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();

    for &(broken, fixed) in MOJIBAKE {
        if s.contains(broken) {
            s = s.replace(broken, fixed);
        }
    }

    let s: String = s.nfkc().map(uncurl).collect();
    let mut s = s.replace(['\\', '/'], " ");

    if let (Some(token), Some(boundary)) = (lower_camel_token(), camel_boundary()) {
        if token.is_match(&s) {
            s = boundary.replace_all(&s, "$1 $2").into_owned();
        }
    }

    let s = drop_bracketed(&s);
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

fn uncurl(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201b}' => '\'',
        '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{201f}' => '"',
        other => other,
    }
}

/// Remove every `(...)` and `[...]` span. An unclosed bracket drops the rest.
fn drop_bracketed(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut inside = false;

    for c in s.chars() {
        match c {
            '(' | '[' => inside = true,
            ')' | ']' => inside = false,
            _ if !inside => out.push(c),
            _ => {}
        }
    }

    out
}

/// Cut at the first `(` and trim.
pub fn remove_brackets(s: &str) -> &str {
    match s.find('(') {
        Some(idx) => s[..idx].trim(),
        None => s.trim(),
    }
}

/// Readable label from an entity URI: last path segment, percent-decoded,
/// underscores as spaces, without a trailing parenthetical.
pub fn label_from_uri(uri: &str) -> String {
    let segment = uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri);
    let decoded = urlencoding::decode(segment)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    remove_brackets(&decoded.replace('_', " ")).to_string()
}
