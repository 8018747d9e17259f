//! Permissive date/time parsing for agency-written strings such as
//! `"June 12, 2023 6:00 p.m."`.
//!
//! The page splits the meeting date (table cell) from the time (page header),
//! so callers glue the two together and hand the result to
//! [`parse_freeform_datetime`]. No fixed format string is assumed: the date
//! and the time are each located by pattern, and whatever is left over must be
//! filler ("at", a weekday name, punctuation) or the whole string is rejected.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateTimeParseError {
    #[error("no recognizable date in {0:?}")]
    NoDate(String),
    #[error("invalid calendar date in {0:?}")]
    InvalidDate(String),
    #[error("invalid time of day in {0:?}")]
    InvalidTime(String),
    #[error("unrecognized text {token:?} in {text:?}")]
    Unrecognized { text: String, token: String },
}

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

static RE_MERIDIEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d\s?|\b)([ap])\.?\s?m\b\.?").expect("invalid regex: meridiem"));

static RE_MONTH_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\s+(\d{{4}})\b"
    ))
    .expect("invalid regex: month first")
});

static RE_DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTHS})\.?\s+(\d{{4}})\b"
    ))
    .expect("invalid regex: day first")
});

static RE_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("invalid regex: numeric date")
});

static RE_ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("invalid regex: iso date")
});

static RE_TIME_12H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("invalid regex: 12h time")
});

static RE_TIME_24H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2}):(\d{2})(?::(\d{2}))?\b").expect("invalid regex: 24h time")
});

static RE_TIME_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(noon|midnight)\b").expect("invalid regex: time word"));

const FILLER: &[&str] = &[
    "at", "on", "of", "-", "–", "monday", "tuesday", "wednesday", "thursday", "friday",
    "saturday", "sunday", "mon", "tue", "tues", "wed", "thu", "thur", "thurs", "fri", "sat",
    "sun",
];

/// Parse a free-text date with an optional time of day into a naive
/// date-time. A missing time means midnight.
pub fn parse_freeform_datetime(text: &str) -> Result<NaiveDateTime, DateTimeParseError> {
    let normalized = normalize(text);

    let (date, rest) = take_date(&normalized, text)?;
    let (time, rest) = take_time(&rest, text)?;

    if let Some(token) = rest
        .split_whitespace()
        .map(|token| token.trim_end_matches('.'))
        .find(|token| !token.is_empty() && !FILLER.contains(token))
    {
        return Err(DateTimeParseError::Unrecognized {
            text: text.to_string(),
            token: token.to_string(),
        });
    }

    Ok(date.and_time(time.unwrap_or_default()))
}

fn normalize(text: &str) -> String {
    let lowered = text.replace('\u{a0}', " ").replace(',', " ").to_lowercase();
    let lowered = RE_MERIDIEM.replace_all(&lowered, "${1}${2}m");
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cut(s: &str, start: usize, end: usize) -> String {
    format!("{} {}", &s[..start], &s[end..])
}

fn take_date(s: &str, original: &str) -> Result<(NaiveDate, String), DateTimeParseError> {
    let invalid = || DateTimeParseError::InvalidDate(original.to_string());

    let (year, month, day, range) = if let Some(caps) = RE_MONTH_FIRST.captures(s) {
        let month = month_number(&caps[1]).ok_or_else(invalid)?;
        (caps[3].to_string(), month, caps[2].to_string(), caps.get(0))
    } else if let Some(caps) = RE_DAY_FIRST.captures(s) {
        let month = month_number(&caps[2]).ok_or_else(invalid)?;
        (caps[3].to_string(), month, caps[1].to_string(), caps.get(0))
    } else if let Some(caps) = RE_NUMERIC.captures(s) {
        let month: u32 = caps[1].parse().map_err(|_| invalid())?;
        (caps[3].to_string(), month, caps[2].to_string(), caps.get(0))
    } else if let Some(caps) = RE_ISO.captures(s) {
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        (caps[1].to_string(), month, caps[3].to_string(), caps.get(0))
    } else {
        return Err(DateTimeParseError::NoDate(original.to_string()));
    };

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    let range = range.ok_or_else(invalid)?;

    Ok((date, cut(s, range.start(), range.end())))
}

fn take_time(s: &str, original: &str) -> Result<(Option<NaiveTime>, String), DateTimeParseError> {
    let invalid = || DateTimeParseError::InvalidTime(original.to_string());

    if let Some(caps) = RE_TIME_12H.captures(s) {
        let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
        let minute: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().map_err(|_| invalid())?,
            None => 0,
        };
        if hour == 0 || hour > 12 {
            return Err(invalid());
        }
        let hour_24 = match (&caps[3], hour) {
            ("am", 12) => 0,
            ("am", h) => h,
            ("pm", 12) => 12,
            (_, h) => h + 12,
        };
        let time = NaiveTime::from_hms_opt(hour_24, minute, 0).ok_or_else(invalid)?;
        let range = caps.get(0).ok_or_else(invalid)?;
        return Ok((Some(time), cut(s, range.start(), range.end())));
    }

    if let Some(m) = RE_TIME_WORD.find(s) {
        let time = match m.as_str() {
            "noon" => NaiveTime::from_hms_opt(12, 0, 0),
            _ => NaiveTime::from_hms_opt(0, 0, 0),
        }
        .ok_or_else(invalid)?;
        return Ok((Some(time), cut(s, m.start(), m.end())));
    }

    if let Some(caps) = RE_TIME_24H.captures(s) {
        let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
        let minute: u32 = caps[2].parse().map_err(|_| invalid())?;
        let second: u32 = match caps.get(3) {
            Some(m) => m.as_str().parse().map_err(|_| invalid())?,
            None => 0,
        };
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)?;
        let range = caps.get(0).ok_or_else(invalid)?;
        return Ok((Some(time), cut(s, range.start(), range.end())));
    }

    Ok((None, s.to_string()))
}

fn month_number(month: &str) -> Option<u32> {
    let number = match month {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(number)
}
