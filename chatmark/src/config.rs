use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// HTTP settings for the page fetcher used to resolve link titles
#[derive(Debug, Clone, Deserialize)]
pub struct Fetch {
    /// Whole-request deadline, including reading the body
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub fetch: Fetch,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch: Fetch {
                timeout_secs: 10,
                connect_timeout_secs: 5,
                max_redirects: 10,
                user_agent: default_user_agent(),
            },
        }
    }
}

fn default_user_agent() -> String {
    format!("chatmark/{}", env!("CARGO_PKG_VERSION"))
}

impl Settings {
    /// Load settings from `chatmark.toml` in the current directory, if any,
    /// then apply environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        let config_file_name = "chatmark.toml";
        let current_dir_path = PathBuf::from(config_file_name);
        let file = current_dir_path.exists().then_some(current_dir_path);
        Self::load(file.as_deref())
    }

    /// Load settings from an explicit file, then apply environment overrides.
    /// The file must exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(Some(path.as_ref()))
    }

    fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("fetch.timeout_secs", defaults.fetch.timeout_secs)?
            .set_default(
                "fetch.connect_timeout_secs",
                defaults.fetch.connect_timeout_secs,
            )?
            .set_default("fetch.max_redirects", defaults.fetch.max_redirects as u64)?
            .set_default("fetch.user_agent", defaults.fetch.user_agent)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Environment variables take priority over the file
        if let Ok(timeout) = std::env::var("CHATMARK_TIMEOUT_SECS") {
            builder = builder.set_override("fetch.timeout_secs", timeout)?;
        }
        if let Ok(timeout) = std::env::var("CHATMARK_CONNECT_TIMEOUT_SECS") {
            builder = builder.set_override("fetch.connect_timeout_secs", timeout)?;
        }
        if let Ok(redirects) = std::env::var("CHATMARK_MAX_REDIRECTS") {
            builder = builder.set_override("fetch.max_redirects", redirects)?;
        }
        if let Ok(agent) = std::env::var("CHATMARK_USER_AGENT") {
            builder = builder.set_override("fetch.user_agent", agent)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}
