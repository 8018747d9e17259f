use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, instrument};

use crate::agency::AgencyConfig;
use crate::datetime::{DateTimeParseError, parse_freeform_datetime};
use crate::error::{Result, ScrapeError};
use crate::fingerprint::meeting_id;
use crate::page::{FetchedPage, row_date};
use crate::schema::{Link, MeetingRecord};
use crate::status::classify_status;

/// Anything that turns `"June 12, 2023 6:00 p.m."` into a naive date-time.
pub type DateTimeParser = fn(&str) -> std::result::Result<NaiveDateTime, DateTimeParseError>;

/// Turns the agency's meetings page into [`MeetingRecord`]s.
///
/// Holds only static configuration; every call to [`parse`](Self::parse)
/// works on its own page and shares nothing with other calls.
#[derive(Debug, Clone)]
pub struct MeetingPageParser {
    agency: AgencyConfig,
    parse_datetime: DateTimeParser,
}

impl Default for MeetingPageParser {
    fn default() -> Self {
        Self::new(AgencyConfig::default())
    }
}

impl MeetingPageParser {
    pub fn new(agency: AgencyConfig) -> Self {
        Self {
            agency,
            parse_datetime: parse_freeform_datetime,
        }
    }

    pub fn with_datetime_parser(mut self, parse_datetime: DateTimeParser) -> Self {
        self.parse_datetime = parse_datetime;
        self
    }

    pub fn agency(&self) -> &AgencyConfig {
        &self.agency
    }

    /// Parse the page, judging meeting status against the host's local clock.
    pub fn parse(&self, page: &FetchedPage) -> Result<Vec<MeetingRecord>> {
        self.parse_at(page, Local::now().naive_local())
    }

    /// Parse the page with an explicit "now" for status classification.
    ///
    /// Fails on the first structural gap or unparseable date; a partial list
    /// is never returned.
    #[instrument(skip_all, fields(url = %page.url()))]
    pub fn parse_at(&self, page: &FetchedPage, now: NaiveDateTime) -> Result<Vec<MeetingRecord>> {
        let time = page.shared_time()?;
        let fixed_links = page.fixed_links()?;
        let rows = page.meeting_rows()?;
        debug!(%time, rows = rows.len(), "located meetings table");

        let mut records = Vec::with_capacity(rows.len());
        for (idx, row) in rows.into_iter().enumerate() {
            let date = row_date(row).ok_or_else(|| {
                ScrapeError::missing(format!("date text in first cell of meeting row {idx}"))
            })?;

            let start = self.parse_start(&date, &time)?;
            let links = resolve_links(page, &fixed_links, &date)?;
            let record = self.build_record(page, start, links, now);

            debug!(id = %record.id, status = %record.status, links = record.links.len(), "parsed meeting");
            records.push(record);
        }

        info!(count = records.len(), "parsed meetings page");
        Ok(records)
    }

    fn parse_start(&self, date: &str, time: &str) -> Result<NaiveDateTime> {
        Ok((self.parse_datetime)(&format!("{date} {time}"))?)
    }

    fn build_record(
        &self,
        page: &FetchedPage,
        start: NaiveDateTime,
        links: Vec<Link>,
        now: NaiveDateTime,
    ) -> MeetingRecord {
        let title = self.agency.title.clone();
        let description = String::new();
        let status = classify_status(&title, &description, "", start, now);
        let id = meeting_id(&self.agency.slug, &title, start);

        MeetingRecord {
            id,
            title,
            description,
            classification: self.agency.classification,
            start,
            end: None,
            all_day: false,
            time_notes: String::new(),
            location: self.agency.location.clone(),
            links,
            source: page.url().to_string(),
            status,
        }
    }
}

/// Document links for one meeting row, followed by the page's fixed links.
///
/// The year's minutes link is prepended first and the dated agenda packet
/// second, so when both exist the agenda leads. Either may be missing.
pub fn resolve_links(page: &FetchedPage, fixed_links: &[Link], date: &str) -> Result<Vec<Link>> {
    let mut output = fixed_links.to_vec();

    if let Some(year) = date.split_whitespace().last() {
        let minutes_title = format!("{year} Planning and Zoning Commission Minutes");
        if let Some(href) = page.find_anchor_href(&minutes_title) {
            let href = page.absolutize(href)?;
            debug!(%date, %href, "found minutes");
            output.insert(0, Link::new(minutes_title, href));
        }
    }

    if let Some(href) = page.find_anchor_href(&format!("{date} Agenda")) {
        let href = page.absolutize(href)?;
        debug!(%date, %href, "found agenda packet");
        output.insert(0, Link::new(format!("{date} Agenda Packet"), href));
    }

    Ok(output)
}
