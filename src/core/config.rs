//! Game configuration types.
//!
//! A session is configured by a `GameConfiguration`:
//! - visual style and color palette passed through to asset generation
//! - a `DifficultyLevel` controlling how sophisticated the items are
//! - the number of pairs on the board
//!
//! The engine never interprets style or palette - they are opaque prompts.

use serde::{Deserialize, Serialize};

use super::error::MatchError;

/// Visual styles offered by the setup screen.
pub const STYLE_PRESETS: &[&str] = &[
    "Minimalist Flat Design",
    "Watercolor Illustration",
    "Digital Painting",
    "Simple Vector Iconography",
    "Detailed Photography",
    "Pixel Art",
    "Cyberpunk Neon",
];

/// Color palettes offered by the setup screen.
pub const PALETTE_PRESETS: &[&str] = &[
    "Bright and Saturated",
    "Earthy Tones",
    "Monochromatic Blue",
    "Pastel Dreams",
    "Dark & Moody",
    "Vibrant Neon",
];

/// Board sizes offered by the setup screen (pairs, not cards).
pub const PAIR_COUNT_PRESETS: &[u32] = &[6, 12];

/// Sophistication level of the generated items (CEFR-style bands).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    A1,
    A2,
    #[default]
    B1,
    B2,
    C1,
    C2,
}

impl DifficultyLevel {
    /// All levels, easiest first.
    pub const ALL: [DifficultyLevel; 6] = [
        DifficultyLevel::A1,
        DifficultyLevel::A2,
        DifficultyLevel::B1,
        DifficultyLevel::B2,
        DifficultyLevel::C1,
        DifficultyLevel::C2,
    ];

    /// Human-readable label, also used verbatim in generation prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DifficultyLevel::A1 => "A1 (Beginner)",
            DifficultyLevel::A2 => "A2 (Elementary)",
            DifficultyLevel::B1 => "B1 (Intermediate)",
            DifficultyLevel::B2 => "B2 (Upper Intermediate)",
            DifficultyLevel::C1 => "C1 (Advanced)",
            DifficultyLevel::C2 => "C2 (Mastery)",
        }
    }

    /// Short code ("A1", "B2", ...).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            DifficultyLevel::A1 => "A1",
            DifficultyLevel::A2 => "A2",
            DifficultyLevel::B1 => "B1",
            DifficultyLevel::B2 => "B2",
            DifficultyLevel::C1 => "C1",
            DifficultyLevel::C2 => "C2",
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DifficultyLevel {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        DifficultyLevel::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(code) || level.label() == code)
            .ok_or_else(|| MatchError::InvalidConfiguration(format!("unknown level '{s}'")))
    }
}

/// Configuration for one play-through.
///
/// Stored by the session controller so `replay()` can regenerate assets with
/// the same parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfiguration {
    /// Visual style for generated images.
    pub style: String,

    /// Color palette for generated images.
    pub palette: String,

    /// Sophistication level of the items.
    pub level: DifficultyLevel,

    /// Number of pairs on the board. The deck holds twice as many cards.
    pub pair_count: u32,
}

impl Default for GameConfiguration {
    fn default() -> Self {
        Self {
            style: STYLE_PRESETS[1].to_string(),
            palette: PALETTE_PRESETS[1].to_string(),
            level: DifficultyLevel::default(),
            pair_count: PAIR_COUNT_PRESETS[0],
        }
    }
}

impl GameConfiguration {
    /// Create a configuration with default style, palette and level.
    pub fn new(pair_count: u32) -> Self {
        Self {
            pair_count,
            ..Self::default()
        }
    }

    /// Set the visual style.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the color palette.
    #[must_use]
    pub fn with_palette(mut self, palette: impl Into<String>) -> Self {
        self.palette = palette.into();
        self
    }

    /// Set the difficulty level.
    #[must_use]
    pub fn with_level(mut self, level: DifficultyLevel) -> Self {
        self.level = level;
        self
    }

    /// Number of cards the deck will hold.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.pair_count as usize * 2
    }

    /// Reject configurations that cannot start a session.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.pair_count == 0 {
            return Err(MatchError::InvalidConfiguration(
                "pair count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
