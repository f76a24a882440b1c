use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// One attempt in the ordered strategy list.
struct DateStrategy {
    name: &'static str,
    parse: fn(&str) -> Option<DateTime<Utc>>,
}

/// Candidate formats in priority order. First success wins; formats overlap,
/// so the order is part of the contract.
const STRATEGIES: &[DateStrategy] = &[
    DateStrategy {
        name: "MM/DD/YYYY HH:mm",
        parse: us_minutes,
    },
    DateStrategy {
        name: "YYYY-MM-DD HH:mm:ss",
        parse: iso_space_seconds,
    },
    DateStrategy {
        name: "YYYY-MM-DDTHH:mm:ss.sss±HH:mm",
        parse: iso_millis_offset,
    },
    DateStrategy {
        name: "YYYY-MM-DDTHH:mm:ss±HH:mm",
        parse: iso_seconds_offset,
    },
    DateStrategy {
        name: "generic",
        parse: generic,
    },
];

/// Resolve a raw date string to an instant, or `None` when no strategy matches.
pub fn resolve_date(raw: &str) -> Option<DateTime<Utc>> {
    resolve_date_with_strategy(raw).map(|(instant, _)| instant)
}

/// Like [`resolve_date`], also naming the strategy that matched.
pub fn resolve_date_with_strategy(raw: &str) -> Option<(DateTime<Utc>, &'static str)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    STRATEGIES
        .iter()
        .find_map(|strategy| (strategy.parse)(raw).map(|instant| (instant, strategy.name)))
}

/// Long-form rendering, e.g. "April 5th, 2024".
pub fn format_long_date(instant: &DateTime<Utc>) -> String {
    let day = instant.day();
    format!(
        "{} {}{}, {}",
        instant.format("%B"),
        day,
        ordinal_suffix(day),
        instant.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn us_minutes(s: &str) -> Option<DateTime<Utc>> {
    naive(s, "%m/%d/%Y %H:%M")
}

fn iso_space_seconds(s: &str) -> Option<DateTime<Utc>> {
    naive(s, "%Y-%m-%d %H:%M:%S")
}

// `%#z` also takes a bare `Z`. `%.3f` would make the fraction optional and
// shadow the next strategy, so the dot and digits are spelled out.
fn iso_millis_offset(s: &str) -> Option<DateTime<Utc>> {
    offset(s, "%Y-%m-%dT%H:%M:%S.%3f%#z")
}

fn iso_seconds_offset(s: &str) -> Option<DateTime<Utc>> {
    offset(s, "%Y-%m-%dT%H:%M:%S%#z")
}

// Naive timestamps carry no zone; they are taken as UTC.
fn naive(s: &str, fmt: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, fmt)
        .ok()
        .map(|dt| dt.and_utc())
}

fn offset(s: &str, fmt: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s, fmt)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn date_only(s: &str, fmt: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(s, fmt)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Last-resort free-form parse.
fn generic(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| naive(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|| naive(s, "%Y-%m-%dT%H:%M"))
        .or_else(|| naive(s, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|| naive(s, "%Y-%m-%d %H:%M"))
        .or_else(|| naive(s, "%Y/%m/%d %H:%M:%S"))
        .or_else(|| naive(s, "%Y/%m/%d %H:%M"))
        .or_else(|| naive(s, "%m/%d/%Y %H:%M:%S"))
        .or_else(|| naive(s, "%m/%d/%Y %I:%M %p"))
        .or_else(|| naive(s, "%m/%d/%Y %I:%M:%S %p"))
        .or_else(|| naive(s, "%B %d, %Y %H:%M"))
        .or_else(|| date_only(s, "%Y-%m-%d"))
        .or_else(|| date_only(s, "%Y/%m/%d"))
        .or_else(|| date_only(s, "%m/%d/%Y"))
        .or_else(|| date_only(s, "%B %d, %Y"))
}
