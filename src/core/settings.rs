//! Application settings.
//!
//! Settings come from three layers, later layers winning:
//! 1. built-in defaults
//! 2. `mindmatch.toml` (every key optional)
//! 3. environment variables

use std::{fs, io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use super::error::MatchError;

/// Default settings file name, looked up in the working directory.
pub const SETTINGS_FILE: &str = "mindmatch.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Generative API key. Generation is impossible without it.
    pub api_key: Option<String>,
    pub api_base: String,
    /// Model used to produce the item list.
    pub text_model: String,
    /// Model used to paint each card.
    pub image_model: String,
    /// Maximum image requests in flight at once.
    pub image_concurrency: usize,
    pub reveal_hold_ms: u64,
    pub win_delay_ms: u64,
    /// Fixed shuffle seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://generativelanguage.googleapis.com/v1beta".into(),
            text_model: "gemini-2.5-flash".into(),
            image_model: "gemini-2.5-flash-image".into(),
            image_concurrency: 3,
            reveal_hold_ms: 1000,
            win_delay_ms: 500,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from `path` (if it exists) and the process environment.
    pub fn load(path: &Path) -> Result<Self, MatchError> {
        let mut settings = match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                return Err(MatchError::Settings(format!(
                    "reading {}: {err}",
                    path.display()
                )))
            }
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml(raw: &str) -> Result<Self, MatchError> {
        let settings: Settings =
            toml::from_str(raw).map_err(|err| MatchError::Settings(err.to_string()))?;
        settings.check()?;
        Ok(settings)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), MatchError> {
        if let Some(v) = lookup("API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = lookup("GEMINI_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = lookup("MINDMATCH__API_BASE") {
            self.api_base = v;
        }
        if let Some(v) = lookup("MINDMATCH__SEED") {
            let seed = v
                .parse::<u64>()
                .map_err(|_| MatchError::Settings(format!("MINDMATCH__SEED is not a u64: {v}")))?;
            self.seed = Some(seed);
        }
        if let Some(v) = lookup("MINDMATCH__IMAGE_CONCURRENCY") {
            self.image_concurrency = v.parse::<usize>().map_err(|_| {
                MatchError::Settings(format!("MINDMATCH__IMAGE_CONCURRENCY is not a number: {v}"))
            })?;
        }
        self.check()
    }

    /// The API key, if one is configured and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    #[must_use]
    pub fn reveal_hold(&self) -> Duration {
        Duration::from_millis(self.reveal_hold_ms)
    }

    #[must_use]
    pub fn win_delay(&self) -> Duration {
        Duration::from_millis(self.win_delay_ms)
    }

    fn check(&self) -> Result<(), MatchError> {
        if self.image_concurrency == 0 {
            return Err(MatchError::Settings(
                "image_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
