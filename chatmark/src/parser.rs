use std::fmt;
use std::sync::Arc;

use chatmark_types::MessageInfo;

use crate::config::Settings;
use crate::enrich::enrich_links;
use crate::error::{FetchError, ParseResult};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::scanner::scan;

/// Chat message parser.
///
/// Holds nothing but the fetch capability used for link titles, so a single
/// instance can serve any number of concurrent parses. Cloning is cheap.
#[derive(Clone)]
pub struct Parser {
    fetcher: Arc<dyn PageFetcher>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser").finish_non_exhaustive()
    }
}

impl Parser {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Parser backed by a reqwest client built from `settings`
    pub fn http(settings: &Settings) -> Result<Self, FetchError> {
        Ok(Self::new(Arc::new(HttpFetcher::from_settings(settings)?)))
    }

    /// Extract mentions, emotions and titled links from `message`.
    ///
    /// Fails only when the message is not valid UTF-8. Links whose title
    /// cannot be fetched are still returned, with an empty title.
    pub async fn parse(&self, message: impl AsRef<[u8]>) -> ParseResult<MessageInfo> {
        let scanned = scan(message.as_ref())?;
        tracing::debug!(
            "Scanned message: {} mentions, {} emotions, {} links",
            scanned.mentions.len(),
            scanned.emotions.len(),
            scanned.urls.len()
        );

        let links = enrich_links(&self.fetcher, scanned.urls).await;
        Ok(MessageInfo {
            mentions: scanned.mentions,
            emotions: scanned.emotions,
            links,
        })
    }

    /// [`Parser::parse`] encoded as compact JSON. Empty lists are omitted.
    pub async fn parse_json(&self, message: impl AsRef<[u8]>) -> ParseResult<String> {
        let info = self.parse(message).await?;
        Ok(serde_json::to_string(&info)?)
    }

    pub async fn parse_json_pretty(&self, message: impl AsRef<[u8]>) -> ParseResult<String> {
        let info = self.parse(message).await?;
        Ok(serde_json::to_string_pretty(&info)?)
    }
}
