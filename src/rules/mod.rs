//! Matching rules.
//!
//! `MatchEngine` owns the deck during play and decides what each selection
//! does:
//! - flip a first card
//! - resolve a pair as a match or a mismatch
//! - request deferred work (reveal hold, win delay)
//!
//! It never sleeps or spawns; timing belongs to the session.

pub mod engine;

pub use engine::{
    Deferred, MatchEngine, MatchProgress, PendingSelection, RejectReason, SelectOutcome,
};
