//! Core engine types: RNG, configuration, settings, errors.
//!
//! This module contains the building blocks shared by the deck builder,
//! the match engine, and the session controller.

pub mod rng;
pub mod config;
pub mod settings;
pub mod error;

pub use rng::GameRng;
pub use config::{
    DifficultyLevel, GameConfiguration, PAIR_COUNT_PRESETS, PALETTE_PRESETS, STYLE_PRESETS,
};
pub use settings::{Settings, SETTINGS_FILE};
pub use error::{MatchError, ProviderError};
