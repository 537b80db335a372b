//! Page title resolution.
//!
//! The linked page is streamed through the html5ever tokenizer chunk by
//! chunk, and reading stops as soon as one of these is seen:
//!
//! - a `<title>` start tag: the text right after it is the title, whether or
//!   not a `<head>` was seen first
//! - a `<body>` start tag before any title: the page has no title
//! - a `</head>` end tag before any title: the page has no title
//!
//! A document that ends before any of these is malformed.

use std::borrow::Cow;

use bytes::Bytes;
use futures::StreamExt;
use html5ever::tendril::fmt::UTF8;
use html5ever::tendril::stream::Utf8LossyDecoder;
use html5ever::tendril::{ByteTendril, StrTendril, TendrilSink};
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tokio::sync::mpsc;

use crate::error::{FetchError, TitleError};
use crate::fetch::PageFetcher;

/// Body chunks buffered between the network reader and the tokenizer
const CHUNK_BACKLOG: usize = 8;

#[derive(Debug, Default)]
enum SinkState {
    #[default]
    Scanning,
    /// The previous token was `<title>`
    AfterTitleTag,
    /// Collecting the character tokens that make up the title text
    InTitleText(String),
}

#[derive(Debug, Default)]
struct TitleSink {
    head_seen: bool,
    state: SinkState,
    /// Set once the title question is settled; empty means "no title"
    title: Option<String>,
}

/// Tokenizer mode for elements other than `<title>` whose content is not
/// markup. Tags inside them are text, so they cannot fake a title.
fn raw_mode(name: &str) -> Option<TokenSinkResult<()>> {
    let kind = match name {
        "textarea" => RawKind::Rcdata,
        "script" => RawKind::ScriptData,
        "style" | "noscript" | "iframe" | "xmp" | "noembed" | "noframes" => RawKind::Rawtext,
        "plaintext" => return Some(TokenSinkResult::Plaintext),
        _ => return None,
    };
    Some(TokenSinkResult::RawData(kind))
}

impl TitleSink {
    fn scan(&mut self, token: Token) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match (tag.kind, &*tag.name) {
                (TagKind::StartTag, "head") => self.head_seen = true,
                (TagKind::StartTag, "title") => {
                    if !self.head_seen {
                        tracing::trace!("<title> found without a preceding <head>");
                    }
                    self.state = SinkState::AfterTitleTag;
                    return TokenSinkResult::RawData(RawKind::Rcdata);
                }
                (TagKind::StartTag, "body") => self.title = Some(String::new()),
                (TagKind::EndTag, "head") => self.title = Some(String::new()),
                (TagKind::StartTag, name) => {
                    if let Some(mode) = raw_mode(name) {
                        return mode;
                    }
                }
                _ => {}
            },
            Token::ParseError(err) => tracing::trace!("Recoverable markup error: {}", err),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl TokenSink for TitleSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        if self.title.is_some() {
            return TokenSinkResult::Continue;
        }

        match std::mem::take(&mut self.state) {
            SinkState::Scanning => self.scan(token),
            // Whatever else directly follows <title> is consumed here; only
            // text starts a title
            SinkState::AfterTitleTag => {
                match token {
                    Token::CharacterTokens(text) => {
                        self.state = SinkState::InTitleText(text.to_string())
                    }
                    Token::NullCharacterToken => {
                        self.state = SinkState::InTitleText(char::REPLACEMENT_CHARACTER.into())
                    }
                    Token::ParseError(err) => {
                        tracing::trace!("Recoverable markup error in title: {}", err);
                        self.state = SinkState::AfterTitleTag;
                    }
                    _ => {}
                }
                TokenSinkResult::Continue
            }
            SinkState::InTitleText(mut text) => {
                match token {
                    Token::CharacterTokens(more) => text.push_str(&more),
                    Token::NullCharacterToken => text.push(char::REPLACEMENT_CHARACTER),
                    Token::ParseError(err) => {
                        tracing::trace!("Recoverable markup error in title: {}", err)
                    }
                    _ => {
                        self.title = Some(text);
                        return TokenSinkResult::Continue;
                    }
                }
                self.state = SinkState::InTitleText(text);
                TokenSinkResult::Continue
            }
        }
    }
}

/// Feeds decoded text into the tokenizer. Sits behind html5ever's lossy
/// UTF-8 decoder, which carries sequences split across chunks and turns
/// invalid bytes into U+FFFD.
struct TokenizerInput {
    tokenizer: Tokenizer<TitleSink>,
    queue: BufferQueue,
}

impl TokenizerInput {
    fn title(&self) -> Option<&String> {
        self.tokenizer.sink.title.as_ref()
    }
}

impl TendrilSink<UTF8> for TokenizerInput {
    type Output = Option<String>;

    fn process(&mut self, text: StrTendril) {
        if text.is_empty() || self.title().is_some() {
            return;
        }
        self.queue.push_back(text);
        let _ = self.tokenizer.feed(&mut self.queue);
    }

    fn error(&mut self, desc: Cow<'static, str>) {
        tracing::trace!("Page body is not valid UTF-8: {}", desc);
    }

    fn finish(mut self) -> Option<String> {
        if self.title().is_none() {
            self.tokenizer.end();
        }
        self.tokenizer.sink.title.take()
    }
}

/// Synchronous, push-driven title extraction over a markup byte stream
pub struct TitleScanner {
    input: Utf8LossyDecoder<TokenizerInput>,
}

impl Default for TitleScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleScanner {
    pub fn new() -> Self {
        Self {
            input: Utf8LossyDecoder::new(TokenizerInput {
                tokenizer: Tokenizer::new(TitleSink::default(), TokenizerOpts::default()),
                queue: BufferQueue::default(),
            }),
        }
    }

    /// Feed the next chunk of the body. Returns the title (empty when the
    /// page has none) as soon as it is known.
    pub fn push(&mut self, chunk: &[u8]) -> Option<String> {
        if self.input.inner_sink.title().is_none() {
            self.input.process(ByteTendril::from_slice(chunk));
        }
        self.input.inner_sink.title().cloned()
    }

    /// Signal the end of the body
    pub fn finish(self) -> Result<String, TitleError> {
        self.input.finish().ok_or_else(|| {
            TitleError::MalformedMarkup(
                "document ended before a title, <body> or </head>".to_string(),
            )
        })
    }
}

/// Drive a [`TitleScanner`] from a channel of body chunks. Returning drops
/// the receiver, which tells the reader to stop.
fn tokenize_title(
    mut chunks: mpsc::Receiver<Result<Bytes, FetchError>>,
) -> Result<String, TitleError> {
    let mut scanner = TitleScanner::new();
    while let Some(chunk) = chunks.blocking_recv() {
        let chunk = chunk.map_err(|err| {
            TitleError::MalformedMarkup(format!("failed reading page body: {}", err))
        })?;
        if let Some(title) = scanner.push(&chunk) {
            return Ok(title);
        }
    }
    scanner.finish()
}

/// Fetch `url` and extract the page title.
///
/// The tokenizer's buffers cannot move between threads, so it runs on the
/// blocking pool while this task streams the body to it. The body is dropped,
/// and its connection released, as soon as a decision is reached or on
/// any error.
pub async fn fetch_title(fetcher: &dyn PageFetcher, url: &str) -> Result<String, TitleError> {
    let mut body = fetcher.get(url).await?;

    let (tx, rx) = mpsc::channel(CHUNK_BACKLOG);
    let tokenizing = tokio::task::spawn_blocking(move || tokenize_title(rx));

    loop {
        tokio::select! {
            // Title decided, the rest of the body is not needed
            _ = tx.closed() => break,
            chunk = body.next() => match chunk {
                Some(chunk) => {
                    let failed = chunk.is_err();
                    if tx.send(chunk).await.is_err() || failed {
                        break;
                    }
                }
                None => break,
            },
        }
    }
    drop(tx);
    drop(body);

    tokenizing.await.map_err(|err| {
        TitleError::MalformedMarkup(format!("markup tokenizer task failed: {}", err))
    })?
}
