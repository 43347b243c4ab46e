//! The session aggregate and its transitions.
//!
//! `Session` owns everything one play-through needs: status, configuration,
//! the match engine (and through it the deck), and the epoch counter. All
//! mutation goes through the transition methods below; they never block,
//! sleep, or spawn.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::timer::TimerToken;
use crate::cards::{Asset, CardId};
use crate::core::{GameConfiguration, GameRng, MatchError};
use crate::deck::{Deck, DeckBuilder};
use crate::rules::{Deferred, MatchEngine, MatchProgress, RejectReason, SelectOutcome};

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Setup,
    Generating,
    Playing,
    Finished,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Setup => "setup",
            SessionState::Generating => "generating",
            SessionState::Playing => "playing",
            SessionState::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// One game session.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    config: Option<GameConfiguration>,
    engine: Option<MatchEngine>,
    epoch: u64,
    last_error: Option<String>,
    rng: GameRng,
}

impl Session {
    /// Create a session in `Setup`. Each deck is dealt from a fork of `rng`.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self {
            state: SessionState::Setup,
            config: None,
            engine: None,
            epoch: 0,
            last_error: None,
            rng,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> Option<&GameConfiguration> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn engine(&self) -> Option<&MatchEngine> {
        self.engine.as_ref()
    }

    #[must_use]
    pub fn deck(&self) -> Option<&Deck> {
        self.engine.as_ref().map(MatchEngine::deck)
    }

    /// Match progress; zero pairs outside of play.
    #[must_use]
    pub fn progress(&self) -> MatchProgress {
        self.engine
            .as_ref()
            .map(MatchEngine::progress)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Message for the most recent failed generation, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enter `Generating` with a new configuration.
    ///
    /// Valid from `Setup` only. Returns the new epoch, or `None` when the
    /// transition is not valid from the current state (nothing changes).
    pub fn begin_generating(
        &mut self,
        config: GameConfiguration,
    ) -> Result<Option<u64>, MatchError> {
        config.validate()?;
        if self.state != SessionState::Setup {
            debug!(state = %self.state, "start ignored");
            return Ok(None);
        }
        Ok(Some(self.enter_generating(config)))
    }

    /// Re-enter `Generating` with the stored configuration.
    ///
    /// Valid from `Finished` only. Returns the new epoch and the configuration
    /// to regenerate, or `None` from any other state.
    pub fn begin_replay(&mut self) -> Option<(u64, GameConfiguration)> {
        let config = match (self.state, self.config.clone()) {
            (SessionState::Finished, Some(config)) => config,
            _ => {
                debug!(state = %self.state, "replay ignored");
                return None;
            }
        };
        let epoch = self.enter_generating(config.clone());
        Some((epoch, config))
    }

    fn enter_generating(&mut self, config: GameConfiguration) -> u64 {
        self.epoch += 1;
        self.engine = None;
        self.last_error = None;
        self.config = Some(config);
        self.state = SessionState::Generating;
        info!(epoch = self.epoch, "generating assets");
        self.epoch
    }

    /// Finish `Generating` with the provider's assets.
    ///
    /// Returns `Ok(false)` if the session moved on since `epoch` began; the
    /// assets are discarded. If the assets cannot form a deck the session goes
    /// back to `Setup` with the error recorded.
    pub fn complete_generating(
        &mut self,
        epoch: u64,
        assets: Vec<Asset>,
    ) -> Result<bool, MatchError> {
        if !self.is_current_generation(epoch) {
            debug!(epoch, current = self.epoch, "discarding stale assets");
            return Ok(false);
        }

        let expected = self.config.as_ref().map_or(0, |config| config.pair_count as usize);
        if assets.len() != expected {
            let err = MatchError::InvalidConfiguration(format!(
                "provider returned {} assets, expected {expected}",
                assets.len()
            ));
            self.abort_generating(&err);
            return Err(err);
        }

        let mut builder = DeckBuilder::new(self.rng.fork());
        match builder.build(assets) {
            Ok(deck) => {
                let engine = MatchEngine::new(deck);
                info!(epoch, progress = %engine.progress(), "game ready");
                self.engine = Some(engine);
                self.state = SessionState::Playing;
                Ok(true)
            }
            Err(err) => {
                self.abort_generating(&err);
                Err(err)
            }
        }
    }

    /// Fail `Generating`: back to `Setup`, configuration discarded.
    ///
    /// Returns `false` if `epoch` is stale.
    pub fn fail_generating(&mut self, epoch: u64, err: &MatchError) -> bool {
        if !self.is_current_generation(epoch) {
            return false;
        }
        self.abort_generating(err);
        true
    }

    /// Pick a card. Returns the outcome and any timer to schedule.
    pub fn select(&mut self, id: CardId) -> (SelectOutcome, Option<TimerToken>) {
        let engine = match (self.state, self.engine.as_mut()) {
            (SessionState::Playing, Some(engine)) => engine,
            _ => return (SelectOutcome::Rejected(RejectReason::NotPlaying), None),
        };
        let (outcome, deferred) = engine.select(id);
        let token = deferred.map(|action| TimerToken {
            epoch: self.epoch,
            action,
        });
        (outcome, token)
    }

    /// Deliver a timer. Returns `true` if it changed the session.
    ///
    /// Tokens from an earlier epoch are ignored, as is a finish token once
    /// the session is already `Finished`.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if token.epoch != self.epoch {
            debug!(token = token.epoch, current = self.epoch, "stale timer ignored");
            return false;
        }
        let engine = match self.engine.as_mut() {
            Some(engine) => engine,
            None => return false,
        };

        match token.action {
            Deferred::RevealHold { first, second } => engine.end_reveal_hold(first, second),
            Deferred::Finish => {
                if self.state == SessionState::Playing && engine.is_complete() {
                    self.state = SessionState::Finished;
                    info!(epoch = self.epoch, progress = %engine.progress(), "session finished");
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Return to `Setup` from any state, discarding the deck and configuration.
    ///
    /// Bumps the epoch so outstanding timers and generation results are dropped.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.state = SessionState::Setup;
        self.config = None;
        self.engine = None;
        self.last_error = None;
        info!(epoch = self.epoch, "session reset");
    }

    fn is_current_generation(&self, epoch: u64) -> bool {
        epoch == self.epoch && self.state == SessionState::Generating
    }

    fn abort_generating(&mut self, err: &MatchError) {
        warn!(epoch = self.epoch, error = %err, "generation failed, back to setup");
        self.state = SessionState::Setup;
        self.config = None;
        self.engine = None;
        self.last_error = Some(err.to_string());
    }
}
