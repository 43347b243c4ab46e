//! Async driver around [`Session`].
//!
//! The controller is the only place that awaits or spawns. It runs asset
//! generation on a task, schedules timer tokens on tasks, and forwards
//! everything back into the session under one lock. Each transition runs
//! to completion while the lock is held, so no interleaving can observe a
//! half-applied change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::AbortHandle;
use tracing::{debug, info};

use super::state::{Session, SessionState};
use super::timer::{TimerDelays, TimerTasks, TimerToken};
use crate::cards::CardId;
use crate::core::{GameConfiguration, GameRng, MatchError, ProviderError, Settings};
use crate::deck::Deck;
use crate::export::{ArchiveExporter, ExportEntry, ExportReport};
use crate::provider::{AssetProvider, GenerationProgress, ProgressSink};
use crate::rules::{MatchProgress, SelectOutcome};

/// A point-in-time copy of everything presentation needs.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub config: Option<GameConfiguration>,
    pub deck: Option<Deck>,
    pub pending: Vec<CardId>,
    pub progress: MatchProgress,
    pub generation: GenerationProgress,
    pub last_error: Option<String>,
    pub epoch: u64,
}

/// Forwards provider progress only while its generation is still current.
struct EpochProgress {
    epoch: u64,
    live: Arc<AtomicU64>,
    sender: Arc<watch::Sender<GenerationProgress>>,
}

impl ProgressSink for EpochProgress {
    fn report(&self, progress: GenerationProgress) {
        if self.live.load(Ordering::Acquire) == self.epoch {
            self.sender.send_replace(progress);
        }
    }
}

/// Owns a session and drives its asynchronous collaborators.
pub struct SessionController {
    session: Arc<Mutex<Session>>,
    provider: Arc<dyn AssetProvider>,
    delays: TimerDelays,
    timers: Mutex<TimerTasks>,
    /// In-flight provider task, keyed by the epoch that started it.
    generation: Mutex<Option<(u64, AbortHandle)>>,
    progress: Arc<watch::Sender<GenerationProgress>>,
    live_epoch: Arc<AtomicU64>,
}

impl SessionController {
    pub fn new(provider: Arc<dyn AssetProvider>, rng: GameRng, delays: TimerDelays) -> Self {
        let (progress, _) = watch::channel(GenerationProgress::default());
        Self {
            session: Arc::new(Mutex::new(Session::new(rng))),
            provider,
            delays,
            timers: Mutex::new(TimerTasks::default()),
            generation: Mutex::new(None),
            progress: Arc::new(progress),
            live_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Build from settings: delays from the settings, seeded from
    /// `settings.seed` when present.
    pub fn from_settings(provider: Arc<dyn AssetProvider>, settings: &Settings) -> Self {
        let rng = match settings.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        debug!(seed = rng.seed(), "session rng");
        Self::new(provider, rng, TimerDelays::from_settings(settings))
    }

    #[must_use]
    pub fn delays(&self) -> TimerDelays {
        self.delays
    }

    /// Watch generation progress. The value resets to zero on reset.
    pub fn subscribe_progress(&self) -> watch::Receiver<GenerationProgress> {
        self.progress.subscribe()
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await;
        SessionSnapshot {
            state: session.state(),
            config: session.config().cloned(),
            deck: session.deck().cloned(),
            pending: session
                .engine()
                .map(|engine| engine.pending().to_vec())
                .unwrap_or_default(),
            progress: session.progress(),
            generation: *self.progress.borrow(),
            last_error: session.last_error().map(str::to_string),
            epoch: session.epoch(),
        }
    }

    /// Generate assets for `config` and start playing.
    ///
    /// Only valid from `Setup`; otherwise nothing happens and the current
    /// state is returned. Resolves once generation is over with the
    /// resulting state. A generation abandoned by `reset` resolves with
    /// `Setup`. Provider failures put the session back in `Setup` and are
    /// returned as errors.
    pub async fn start(&self, config: GameConfiguration) -> Result<SessionState, MatchError> {
        let epoch = {
            let mut session = self.session.lock().await;
            match session.begin_generating(config.clone())? {
                Some(epoch) => {
                    self.arm(epoch, &config);
                    epoch
                }
                None => return Ok(session.state()),
            }
        };
        self.generate(epoch, config).await
    }

    /// Play the finished configuration again with freshly generated assets.
    ///
    /// Only valid from `Finished`; otherwise returns the current state.
    pub async fn replay(&self) -> Result<SessionState, MatchError> {
        let (epoch, config) = {
            let mut session = self.session.lock().await;
            match session.begin_replay() {
                Some((epoch, config)) => {
                    self.arm(epoch, &config);
                    (epoch, config)
                }
                None => return Ok(session.state()),
            }
        };
        self.generate(epoch, config).await
    }

    /// Make `epoch` the live generation. Called with the session locked.
    fn arm(&self, epoch: u64, config: &GameConfiguration) {
        self.live_epoch.store(epoch, Ordering::Release);
        self.progress
            .send_replace(GenerationProgress::new(0, config.pair_count as usize));
    }

    async fn generate(
        &self,
        epoch: u64,
        config: GameConfiguration,
    ) -> Result<SessionState, MatchError> {
        let sink = EpochProgress {
            epoch,
            live: Arc::clone(&self.live_epoch),
            sender: Arc::clone(&self.progress),
        };
        let provider = Arc::clone(&self.provider);
        let task = tokio::spawn(async move { provider.generate(&config, &sink).await });
        {
            let mut slot = self.generation.lock().await;
            // A reset that ran before the handle was stored has already moved
            // the live epoch on.
            if self.live_epoch.load(Ordering::Acquire) == epoch {
                *slot = Some((epoch, task.abort_handle()));
            } else {
                task.abort();
            }
        }

        let joined = task.await;
        {
            let mut slot = self.generation.lock().await;
            if matches!(*slot, Some((current, _)) if current == epoch) {
                slot.take();
            }
        }

        let result = match joined {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => {
                debug!(epoch, "generation cancelled");
                return Ok(SessionState::Setup);
            }
            Err(err) => Err(ProviderError::Internal(err.to_string())),
        };

        let mut session = self.session.lock().await;
        match result {
            Ok(assets) => {
                if session.complete_generating(epoch, assets)? {
                    Ok(session.state())
                } else {
                    Ok(SessionState::Setup)
                }
            }
            Err(err) => {
                let err = MatchError::from(err);
                if session.fail_generating(epoch, &err) {
                    Err(err)
                } else {
                    Ok(SessionState::Setup)
                }
            }
        }
    }

    /// Abandon everything and return to `Setup`.
    ///
    /// Cancels in-flight generation and every pending timer.
    pub async fn reset(&self) {
        // Everything happens under the session lock so a start racing this
        // reset can only begin after it.
        let mut session = self.session.lock().await;
        session.reset();
        self.live_epoch.store(session.epoch(), Ordering::Release);
        self.progress.send_replace(GenerationProgress::default());

        if let Some((abandoned, handle)) = self.generation.lock().await.take() {
            debug!(abandoned, "aborting generation");
            handle.abort();
        }
        let cancelled = self.timers.lock().await.cancel_all();
        info!(epoch = session.epoch(), cancelled, "controller reset");
    }

    /// Select a card, scheduling the reveal hold or win delay it triggers.
    pub async fn select(&self, id: CardId) -> SelectOutcome {
        let (outcome, token) = self.session.lock().await.select(id);
        if let Some(token) = token {
            self.schedule(token).await;
        }
        outcome
    }

    async fn schedule(&self, token: TimerToken) {
        let delay = self.delays.delay_for(token.action);
        let session = Arc::clone(&self.session);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if session.lock().await.fire(token) {
                debug!(epoch = token.epoch, action = ?token.action, "timer fired");
            }
        });
        self.timers.lock().await.track(task.abort_handle());
    }

    /// Hand the unique card images to `exporter`. Session state is unchanged.
    pub async fn export(
        &self,
        exporter: &dyn ArchiveExporter,
    ) -> Result<ExportReport, MatchError> {
        let entries: Vec<ExportEntry> = {
            let session = self.session.lock().await;
            let deck = session
                .deck()
                .ok_or_else(|| MatchError::Export("no deck to export".to_string()))?;
            deck.unique_half().map(ExportEntry::from).collect()
        };
        exporter.export(entries).await
    }
}
