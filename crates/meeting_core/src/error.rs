use crate::datetime::DateTimeParseError;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// A selector that the page layout guarantees came back empty. Usually
    /// means the agency redesigned the page.
    #[error("page structure changed: missing {what}")]
    MissingElement { what: String },
    #[error("failed to parse meeting start: {0}")]
    DateTime(#[from] DateTimeParseError),
    #[error("invalid url {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to load agency config from {path}: {message}")]
    Config { path: String, message: String },
}

impl ScrapeError {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        ScrapeError::MissingElement { what: what.into() }
    }
}
