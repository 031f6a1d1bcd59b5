use std::env;
use std::path::PathBuf;

use anyhow::{Result, ensure};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_FILE_LOG_FILTER: &str = "info";

/// Loads `.env` from the working directory if present. Variables already set
/// in the process environment win.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub font_dir: Option<PathBuf>,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("CARD_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        ensure!(
            !bind_addr.trim().is_empty(),
            "CARD_BIND_ADDR cannot be empty"
        );

        let font_dir = read_optional(&lookup, "CARD_FONT_DIR").map(PathBuf::from);

        Ok(Self {
            bind_addr: bind_addr.trim().to_owned(),
            font_dir,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogSettings {
    pub dir: PathBuf,
    pub filter: String,
}

impl FileLogSettings {
    /// File logging is enabled only when `CARD_LOG_DIR` is set.
    pub fn from_env() -> Option<Self> {
        load_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let dir = read_optional(&lookup, "CARD_LOG_DIR")?;
        let filter = read_optional(&lookup, "CARD_FILE_LOG")
            .unwrap_or_else(|| DEFAULT_FILE_LOG_FILTER.to_owned());
        Some(Self {
            dir: PathBuf::from(dir),
            filter,
        })
    }
}

fn read_optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}
