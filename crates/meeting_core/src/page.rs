//! Structural navigation of the planning-zoning-commission page.
//!
//! The page offers no ids or labels for the pieces we need, so the layout is
//! pinned by position. Each positional assumption is a named constant below;
//! if the agency reshuffles the page these are the knobs to turn, and the
//! integration tests pin the current values.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::schema::Link;

/// Index of the meetings table among all `<table>` elements. Table 0 is the
/// schedule preamble.
pub const DATA_TABLE_INDEX: usize = 1;

/// Indices into `.info p` whose anchors carry the video and radio coverage
/// hrefs.
pub const FIXED_LINK_HREF_PARAGRAPHS: [usize; 2] = [6, 7];

/// Indices into the flattened direct text nodes of `.info p` that carry the
/// titles of the two coverage links. They are offset by one from the href
/// paragraphs because an earlier paragraph holds two text nodes.
pub const FIXED_LINK_TITLE_TEXTS: [usize; 2] = [7, 8];

static TIME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".tbltitle p").expect("invalid selector: time"));
static INFO_PARAGRAPH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".info p").expect("invalid selector: info paragraph"));
static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("invalid selector: table"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("invalid selector: row"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("invalid selector: cell"));
static FIRST_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td:first-child").expect("invalid selector: first cell"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector: anchor"));

/// A fetched document together with the absolute URL it was served from.
pub struct FetchedPage {
    url: Url,
    document: Html,
}

impl FetchedPage {
    pub fn new(url: &str, html: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|source| ScrapeError::Url {
            url: url.to_string(),
            source,
        })?;
        Ok(Self {
            url,
            document: Html::parse_document(html),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Join a possibly relative href against the page URL.
    pub fn absolutize(&self, href: &str) -> Result<String> {
        self.url
            .join(href.trim())
            .map(String::from)
            .map_err(|source| ScrapeError::Url {
                url: href.to_string(),
                source,
            })
    }

    /// The time-of-day sentence shared by every row of the meetings table.
    pub fn shared_time(&self) -> Result<String> {
        self.document
            .select(&TIME_SELECTOR)
            .flat_map(|p| direct_text(p))
            .find(|text| !text.trim().is_empty())
            .map(|text| text.trim().to_string())
            .ok_or_else(|| ScrapeError::missing("meeting time text under .tbltitle p"))
    }

    /// The video and radio coverage links, in page order.
    pub fn fixed_links(&self) -> Result<Vec<Link>> {
        let paragraphs: Vec<ElementRef> = self.document.select(&INFO_PARAGRAPH_SELECTOR).collect();
        let texts: Vec<&str> = paragraphs.iter().copied().flat_map(|p| direct_text(p)).collect();

        let mut links = Vec::with_capacity(FIXED_LINK_HREF_PARAGRAPHS.len());
        for (slot, (&p_idx, &t_idx)) in FIXED_LINK_HREF_PARAGRAPHS
            .iter()
            .zip(FIXED_LINK_TITLE_TEXTS.iter())
            .enumerate()
        {
            let paragraph = paragraphs.get(p_idx).ok_or_else(|| {
                ScrapeError::missing(format!(
                    "fixed link paragraph .info p[{p_idx}] (found {} paragraphs)",
                    paragraphs.len()
                ))
            })?;
            let href = paragraph
                .select(&ANCHOR_SELECTOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .ok_or_else(|| ScrapeError::missing(format!("anchor href in .info p[{p_idx}]")))?;
            let title = texts.get(t_idx).ok_or_else(|| {
                ScrapeError::missing(format!(
                    "fixed link title text #{t_idx} under .info p (found {} text nodes)",
                    texts.len()
                ))
            })?;
            // only the first coverage title is known to carry a &nbsp;
            let title = if slot == 0 {
                title.replace('\u{a0}', " ")
            } else {
                title.to_string()
            };

            links.push(Link::new(title.trim(), self.absolutize(href)?));
        }
        Ok(links)
    }

    /// Rows of the meetings table that hold at least one data cell.
    pub fn meeting_rows(&self) -> Result<Vec<ElementRef<'_>>> {
        let table = self
            .document
            .select(&TABLE_SELECTOR)
            .nth(DATA_TABLE_INDEX)
            .ok_or_else(|| {
                ScrapeError::missing(format!("meetings table (table index {DATA_TABLE_INDEX})"))
            })?;

        Ok(table
            .select(&ROW_SELECTOR)
            .filter(|row| row.select(&CELL_SELECTOR).next().is_some())
            .collect())
    }

    /// href of the first anchor whose text contains `needle`.
    pub fn find_anchor_href(&self, needle: &str) -> Option<&str> {
        self.document
            .select(&ANCHOR_SELECTOR)
            .find(|anchor| {
                anchor
                    .text()
                    .collect::<String>()
                    .replace('\u{a0}', " ")
                    .contains(needle)
            })
            .and_then(|anchor| anchor.value().attr("href"))
    }
}

/// Date text of a meeting row, read from its first cell.
pub fn row_date(row: ElementRef) -> Option<String> {
    row.select(&FIRST_CELL_SELECTOR)
        .next()
        .and_then(|cell| direct_text(cell).find(|text| !text.trim().is_empty()))
        .map(|text| text.trim().to_string())
}

/// Text nodes that are immediate children of `element`, skipping text inside
/// nested tags.
fn direct_text(element: ElementRef<'_>) -> impl Iterator<Item = &str> {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.burleigh.gov/government/boardscommittees/planning-zoning-commission/";

    #[test]
    fn test_absolutize_relative_and_absolute() {
        let page = FetchedPage::new(URL, "<html></html>").unwrap();
        assert_eq!(
            page.absolutize("/media/minutes-2023.pdf").unwrap(),
            "https://www.burleigh.gov/media/minutes-2023.pdf"
        );
        assert_eq!(
            page.absolutize("agenda.pdf").unwrap(),
            "https://www.burleigh.gov/government/boardscommittees/planning-zoning-commission/agenda.pdf"
        );
        assert_eq!(
            page.absolutize("https://youtube.com/x").unwrap(),
            "https://youtube.com/x"
        );
    }

    #[test]
    fn test_rejects_relative_page_url() {
        assert!(matches!(
            FetchedPage::new("/planning-zoning-commission/", "<html></html>"),
            Err(ScrapeError::Url { .. })
        ));
    }

    #[test]
    fn test_shared_time_skips_nested_and_blank_text() {
        let html = r#"<div class="tbltitle"><p> <strong>Time:</strong></p><p>6:00 p.m.</p></div>"#;
        let page = FetchedPage::new(URL, html).unwrap();
        assert_eq!(page.shared_time().unwrap(), "6:00 p.m.");
    }

    #[test]
    fn test_shared_time_missing() {
        let page = FetchedPage::new(URL, "<div class='other'><p>6:00 p.m.</p></div>").unwrap();
        assert!(matches!(
            page.shared_time(),
            Err(ScrapeError::MissingElement { .. })
        ));
    }

    #[test]
    fn test_meeting_rows_skip_header_rows() {
        let html = r#"
            <table><tr><td>preamble</td></tr></table>
            <table>
              <tr><th>Date</th><th>Agenda</th></tr>
              <tr><td>June 12, 2023</td><td></td></tr>
              <tr><td>July 10, 2023</td><td></td></tr>
            </table>"#;
        let page = FetchedPage::new(URL, html).unwrap();
        let rows = page.meeting_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(row_date(rows[0]).as_deref(), Some("June 12, 2023"));
        assert_eq!(row_date(rows[1]).as_deref(), Some("July 10, 2023"));
    }

    #[test]
    fn test_meeting_rows_need_second_table() {
        let page = FetchedPage::new(URL, "<table><tr><td>x</td></tr></table>").unwrap();
        let err = page.meeting_rows().unwrap_err();
        assert!(err.to_string().contains("meetings table"));
    }

    #[test]
    fn test_fixed_links_normalize_nbsp_in_first_title_only() {
        let html = r#"<div class="info">
            <p>one</p><p>two</p><p><b>Contact:</b> name<br>role</p><p>phone</p><p>email</p><p>posted</p>
            <p>Video&nbsp;Coverage&nbsp;<a href="https://www.youtube.com/@BurleighCountyND">Watch</a></p>
            <p>Radio&nbsp;Coverage <a href="/radio-coverage/">Listen</a></p>
        </div>"#;
        let page = FetchedPage::new(URL, html).unwrap();
        let links = page.fixed_links().unwrap();
        assert_eq!(links[0].title, "Video Coverage");
        assert_eq!(links[1].title, "Radio\u{a0}Coverage");
        assert_eq!(links[1].href, "https://www.burleigh.gov/radio-coverage/");
    }

    #[test]
    fn test_find_anchor_href_matches_full_text() {
        let html = r#"<p><a href="/a.pdf"><span>June 12, 2023</span> Agenda</a></p>"#;
        let page = FetchedPage::new(URL, html).unwrap();
        assert_eq!(page.find_anchor_href("June 12, 2023 Agenda"), Some("/a.pdf"));
        assert_eq!(page.find_anchor_href("July 10, 2023 Agenda"), None);
    }
}
