use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("invalid regex: non alnum"));

/// Stable id used downstream to recognise the same meeting across runs:
/// `{slug}/{YYYYMMDDHHMM}/x/{title_in_snake_case}`.
pub fn meeting_id(slug: &str, title: &str, start: NaiveDateTime) -> String {
    let underscored = RE_NON_ALNUM
        .split(title)
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_");
    format!("{slug}/{}/x/{underscored}", start.format("%Y%m%d%H%M"))
}
