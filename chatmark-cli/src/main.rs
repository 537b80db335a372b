mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chatmark::config::Settings;
use chatmark::Parser as MessageParser;
use clap::Parser;
use tokio::io::AsyncReadExt;

/// chatmark - extract mentions, emotions and titled links from a chat message
#[derive(Parser, Debug)]
#[command(name = "chatmark")]
#[command(about = "Parse a chat message and print its entities as JSON")]
#[command(version)]
struct Cli {
    /// Message to parse; read from stdin when omitted
    message: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long, short)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    /// Settings file (defaults to ./chatmark.toml when present)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Per-page fetch timeout in seconds
    #[arg(long, env = "CHATMARK_TIMEOUT_SECS")]
    timeout: Option<u64>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::new().context("Failed to load settings")?,
        };
        if let Some(timeout) = self.timeout {
            settings.fetch.timeout_secs = timeout;
        }
        Ok(settings)
    }
}

/// Message bytes from the argument, or all of stdin. Stdin is kept as raw
/// bytes so malformed UTF-8 is reported by the parser.
async fn read_message(arg: Option<String>) -> Result<Vec<u8>> {
    if let Some(message) = arg {
        return Ok(message.into_bytes());
    }
    let mut buf = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut buf)
        .await
        .context("Failed to read message from stdin")?;
    Ok(buf)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let settings = cli.settings()?;
    tracing::debug!("Using settings: {:?}", settings);

    let parser = MessageParser::http(&settings).context("Failed to build HTTP client")?;
    let message = read_message(cli.message.clone()).await?;

    let output = if cli.pretty {
        parser.parse_json_pretty(&message).await
    } else {
        parser.parse_json(&message).await
    }
    .context("Failed to parse message")?;

    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from(["chatmark", "--pretty", "-v", "hello @bob"]).unwrap();
        assert!(cli.pretty);
        assert!(cli.verbose);
        assert_eq!(cli.message.as_deref(), Some("hello @bob"));

        let cli = Cli::try_parse_from(["chatmark"]).unwrap();
        assert!(cli.message.is_none());
        assert!(!cli.pretty);
    }

    #[test]
    fn test_timeout_flag_overrides_settings_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[fetch]\ntimeout_secs = 30").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli =
            Cli::try_parse_from(["chatmark", "--config", path.as_str(), "--timeout", "2"]).unwrap();
        assert_eq!(cli.settings().unwrap().fetch.timeout_secs, 2);
    }

    #[tokio::test]
    async fn test_message_argument_is_used_verbatim() {
        let bytes = read_message(Some("(fry)".to_string())).await.unwrap();
        assert_eq!(bytes, b"(fry)");
    }
}
