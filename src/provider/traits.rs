//! The asset provider seam and generation progress reporting.
//!
//! ```
//! use mindmatch::provider::GenerationProgress;
//!
//! let progress = GenerationProgress::new(2, 6);
//! assert_eq!(progress.percent(), 33);
//! assert!(!progress.is_done());
//! assert!(GenerationProgress::new(6, 6).is_done());
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::cards::Asset;
use crate::core::{GameConfiguration, ProviderError};

/// How many images have been produced so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationProgress {
    pub completed: usize,
    pub total: usize,
}

impl GenerationProgress {
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    /// Rounded completion percentage; 0 before the total is known.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed.min(self.total) * 100 + self.total / 2) / self.total) as u8
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// Receives progress updates while assets are generated.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: GenerationProgress);
}

impl ProgressSink for watch::Sender<GenerationProgress> {
    fn report(&self, progress: GenerationProgress) {
        self.send_replace(progress);
    }
}

/// Discards progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: GenerationProgress) {}
}

/// Produces the labeled images for one session.
///
/// Implementations return exactly `config.pair_count` assets with distinct
/// labels. Progress is reported as `(completed, total)` with `total` fixed
/// from the first report, `completed` non-decreasing, and a final report
/// where `completed == total`.
///
/// Soft failures are absorbed with fallbacks; `Err` means the provider
/// could not be invoked at all.
#[async_trait]
pub trait AssetProvider: Send + Sync {
    async fn generate(
        &self,
        config: &GameConfiguration,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<Asset>, ProviderError>;
}
