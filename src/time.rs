//! Publish-time normalization.
//!
//! Feeds carry dates in whatever shape their generator likes. Every value is
//! reduced to `YYYY-MM-DD HH:MM`, eight hours ahead of the wall-clock time it
//! was written in, or to the empty string when no strategy recognizes it.
//! A zone designator is accepted but does not move the wall-clock time.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

const DISPLAY_OFFSET_HOURS: i64 = 8;

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Zone-less layouts accepted by the general tier besides RFC 3339/2822.
const LENIENT_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

enum Pattern {
    Zoned(&'static str),
    Naive(&'static str),
    Date(&'static str),
}

/// Explicit fallbacks, tried in order once the general tier gives up.
const FALLBACK_PATTERNS: &[Pattern] = &[
    // Mon, 11 Mar 2024 14:08:32 +0000
    Pattern::Zoned("%a, %d %b %Y %H:%M:%S %z"),
    // Wed, 19 Jun 2024 09:43:53 GMT
    Pattern::Naive("%a, %d %b %Y %H:%M:%S GMT"),
    // 2024-03-11T14:08:32+00:00
    Pattern::Zoned("%Y-%m-%dT%H:%M:%S%z"),
    // 2024-03-11T14:08:32Z
    Pattern::Naive("%Y-%m-%dT%H:%M:%SZ"),
    // 2024-03-11 14:08:32
    Pattern::Naive("%Y-%m-%d %H:%M:%S"),
    // 2024-03-11
    Pattern::Date("%Y-%m-%d"),
];

/// Normalize a raw timestamp. Never fails: unknown input yields `""`.
pub fn normalize(raw: &str) -> String {
    parse_wall_clock(raw).map(display).unwrap_or_default()
}

/// Wall-clock time as written in `raw`, trying the general tier first and
/// then every fallback pattern in order.
pub fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    parse_general(raw).or_else(|| parse_fallback(raw))
}

/// Render a wall-clock time shifted into the display zone.
pub fn display(wall_clock: NaiveDateTime) -> String {
    (wall_clock + Duration::hours(DISPLAY_OFFSET_HOURS))
        .format(OUTPUT_FORMAT)
        .to_string()
}

fn parse_general(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_local());
    }
    LENIENT_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
}

fn parse_fallback(raw: &str) -> Option<NaiveDateTime> {
    FALLBACK_PATTERNS.iter().find_map(|pattern| match pattern {
        Pattern::Zoned(fmt) => DateTime::parse_from_str(raw, fmt)
            .ok()
            .map(|dt| dt.naive_local()),
        Pattern::Naive(fmt) => NaiveDateTime::parse_from_str(raw, fmt).ok(),
        Pattern::Date(fmt) => NaiveDate::parse_from_str(raw, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
    })
}
