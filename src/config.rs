use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::Language;
use crate::summarize::GeminiConfig;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub default_lang: Option<String>,
    pub default_model: Option<String>,
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Configured default language, ignored if it is not one the form offers
    pub fn language(&self) -> Option<Language> {
        self.default_lang.as_deref().and_then(Language::from_code)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}

/// Load `.env` from the working directory, if present, into the process environment
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => debug!("Ignoring unreadable .env file: {e}"),
    }
}

/// Gemini settings from the environment; `None` when no API key is set
pub fn gemini_config(model: &str) -> Option<GeminiConfig> {
    let api_key = std::env::var(API_KEY_VAR).ok().filter(|k| !k.trim().is_empty())?;
    Some(GeminiConfig::new(api_key).with_model(model))
}
