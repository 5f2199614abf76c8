//! Relative and literal date resolution.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Utc};
use regex::Regex;

use super::normalize::fold_width;

/// Relative day terms, longest first so "明後日" wins over "明日".
const RELATIVE_TERMS: &[(&str, i64)] = &[
    ("day after tomorrow", 2),
    ("明後日", 2),
    ("あさって", 2),
    ("明日", 1),
    ("あした", 1),
    ("あす", 1),
    ("tomorrow", 1),
    ("今日", 0),
    ("きょう", 0),
    ("本日", 0),
    ("today", 0),
    ("昨日", -1),
    ("きのう", -1),
    ("yesterday", -1),
];

/// The current civil date in the given fixed-offset timezone.
pub fn today_in(tz: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Day offset named by a relative term in the text, if any.
pub fn relative_offset(text: &str) -> Option<i64> {
    let lower = text.to_lowercase();
    RELATIVE_TERMS
        .iter()
        .find(|(term, _)| lower.contains(term))
        .map(|(_, offset)| *offset)
}

/// Parse the first explicit date literal in the text.
///
/// Accepts `YYYY-M-D` with `-`, `/` or `.` separators, `YYYY年M月D日`, and
/// `M月D日` (in the year of `today`).
pub fn parse_date_literal(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let folded = fold_width(text);

    if let Some(caps) = FULL_DATE.captures(&folded) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = MONTH_DAY.captures(&folded) {
        let month = caps[1].parse().ok()?;
        let day = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(today.year(), month, day);
    }

    None
}

/// Resolve the date a query refers to: relative term, then literal, then today.
pub fn resolve_target_date(text: &str, today: NaiveDate) -> NaiveDate {
    let folded = fold_width(text);
    if let Some(offset) = relative_offset(&folded) {
        return today + Duration::days(offset);
    }
    parse_date_literal(&folded, today).unwrap_or(today)
}

/// Parse a date field from a dataset (`2024-04-05`, `2024/4/5`, `2024-04-05T09:00:00`, ...).
pub fn parse_dataset_date(value: &str) -> Option<NaiveDate> {
    let folded = fold_width(value.trim());
    let caps = FULL_DATE.captures(&folded)?;
    NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )
}

static FULL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})\s*[-/.年]\s*(\d{1,2})\s*[-/.月]\s*(\d{1,2})").expect("Invalid regex")
});
static MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s*月\s*(\d{1,2})\s*日").expect("Invalid regex"));
