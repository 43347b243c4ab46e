//! Deferred session work keyed by epoch.
//!
//! A timer is a [`TimerToken`] delivered back to the session after a delay.
//! The token carries the epoch of the session that scheduled it; once the
//! session has been reset or restarted the epoch no longer matches and the
//! token is dropped.

use std::time::Duration;

use tokio::task::AbortHandle;

use crate::core::Settings;
use crate::rules::Deferred;

/// A deferred action bound to one session incarnation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerToken {
    pub epoch: u64,
    pub action: Deferred,
}

/// How long each kind of deferred action waits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerDelays {
    /// How long a mismatched pair stays visible.
    pub reveal_hold: Duration,
    /// Pause between the final match and the win state.
    pub win_delay: Duration,
}

impl Default for TimerDelays {
    fn default() -> Self {
        Self {
            reveal_hold: Duration::from_millis(1000),
            win_delay: Duration::from_millis(500),
        }
    }
}

impl TimerDelays {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            reveal_hold: settings.reveal_hold(),
            win_delay: settings.win_delay(),
        }
    }

    #[must_use]
    pub fn delay_for(&self, action: Deferred) -> Duration {
        match action {
            Deferred::RevealHold { .. } => self.reveal_hold,
            Deferred::Finish => self.win_delay,
        }
    }
}

/// Spawned timer tasks that are still outstanding.
#[derive(Debug, Default)]
pub(crate) struct TimerTasks {
    handles: Vec<AbortHandle>,
}

impl TimerTasks {
    pub(crate) fn track(&mut self, handle: AbortHandle) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    /// Abort every outstanding timer.
    pub(crate) fn cancel_all(&mut self) -> usize {
        let cancelled = self.handles.len();
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        cancelled
    }
}
