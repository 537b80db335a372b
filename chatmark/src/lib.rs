//! Extraction of mentions, emotion tags and titled links from chat messages.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use chatmark::{config::Settings, Parser};
//!
//! let parser = Parser::http(&Settings::default())?;
//! let info = parser.parse("@bob (fry) https://www.rust-lang.org").await?;
//! assert_eq!(info.mentions, vec!["bob"]);
//! # Ok(())
//! # }
//! ```

pub mod chars;
pub mod config;
pub mod cursor;
pub mod emotion;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod link;
pub mod mention;
pub mod parser;
pub mod scanner;
pub mod title;

pub use chatmark_types::{Link, MessageInfo};
pub use error::{DecodeError, FetchError, ParseError, ParseResult, TitleError};
pub use fetch::{BodyStream, HttpFetcher, PageFetcher};
pub use parser::Parser;
