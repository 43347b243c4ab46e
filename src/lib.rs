//! # mindmatch
//!
//! A memory-matching game whose card images are generated on demand.
//!
//! ## Design Principles
//!
//! 1. **Pure core**: deck building and match evaluation are synchronous and
//!    deterministic given a seed. Deferred work is returned as data, never
//!    scheduled from inside the engine.
//!
//! 2. **One owner**: all session state lives in a single `Session` aggregate
//!    and changes only through its transition methods.
//!
//! 3. **Epoch-keyed timers**: every deferred action carries the epoch that
//!    scheduled it, so a reset silently invalidates everything in flight.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: the deck uses `im` so snapshots handed
//!   to presentation are O(1) to clone.
//!
//! - **Collaborators behind traits**: asset generation (`AssetProvider`) and
//!   image export (`ArchiveExporter`) are async traits; the Gemini REST
//!   provider and a directory exporter are the shipped implementations.
//!
//! ## Modules
//!
//! - `core`: RNG, game configuration, settings, errors
//! - `cards`: Assets, image references, cards
//! - `deck`: Shuffled deck construction
//! - `rules`: The match engine
//! - `session`: Session lifecycle and its async controller
//! - `provider`: Asset generation
//! - `export`: Image export

pub mod core;
pub mod cards;
pub mod deck;
pub mod rules;
pub mod session;
pub mod provider;
pub mod export;

// Re-export commonly used types
pub use crate::core::{
    DifficultyLevel, GameConfiguration, GameRng,
    MatchError, ProviderError, Settings,
};

pub use crate::cards::{Asset, Card, CardId, ImageRef, PairSide};

pub use crate::deck::{Deck, DeckBuilder};

pub use crate::rules::{
    Deferred, MatchEngine, MatchProgress, RejectReason, SelectOutcome,
};

pub use crate::session::{
    Session, SessionController, SessionSnapshot, SessionState,
    TimerDelays, TimerToken,
};

pub use crate::provider::{
    AssetProvider, GeminiProvider, GenerationProgress, NoProgress, ProgressSink,
};

pub use crate::export::{ArchiveExporter, DirectoryExporter, ExportEntry, ExportReport};
