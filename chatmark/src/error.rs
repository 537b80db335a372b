use thiserror::Error;

/// The message bytes at `position` do not form a valid UTF-8 code point
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid code point at byte {position}")]
pub struct DecodeError {
    pub position: usize,
}

/// Errors surfaced to callers of [`crate::Parser`]
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Failure of a fetch capability to deliver page content
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Fetch error: {0}")]
    Other(String),
}

/// Why a link's title could not be resolved.
///
/// These never reach the caller of a parse; the link is reported with an
/// empty title instead.
#[derive(Error, Debug)]
pub enum TitleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Malformed markup: {0}")]
    MalformedMarkup(String),
}
