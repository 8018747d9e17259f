//! Meeting extraction for the Burleigh County Planning & Zoning Commission
//! page.
//!
//! Fetching and storage belong to the caller: hand a [`FetchedPage`] to
//! [`MeetingPageParser::parse`] and receive the page's meetings as
//! [`MeetingRecord`]s.

pub mod agency;
pub mod datetime;
pub mod error;
pub mod fingerprint;
pub mod page;
pub mod parser;
pub mod schema;
pub mod status;

pub use agency::AgencyConfig;
pub use error::{Result, ScrapeError};
pub use page::FetchedPage;
pub use parser::MeetingPageParser;
pub use schema::{Classification, Link, Location, MeetingRecord, MeetingStatus};
