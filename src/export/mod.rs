//! Exporting the unique card images.
//!
//! The session hands an exporter one entry per pair (the A side of each
//! pair, in board order). Export never changes session state.

mod directory;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::cards::{Card, ImageRef};
use crate::core::MatchError;

pub use directory::{sanitize_label, DirectoryExporter};

/// One image to export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportEntry {
    pub label: String,
    pub image: ImageRef,
}

impl From<&Card> for ExportEntry {
    fn from(card: &Card) -> Self {
        Self {
            label: card.label().to_string(),
            image: card.image().clone(),
        }
    }
}

/// What an export produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Where the archive was written.
    pub location: PathBuf,
    /// Files written, in entry order.
    pub written: Vec<PathBuf>,
    /// Labels whose image could not be exported (not inline).
    pub skipped: Vec<String>,
}

/// Packages unique card images for download.
#[async_trait]
pub trait ArchiveExporter: Send + Sync {
    async fn export(&self, entries: Vec<ExportEntry>) -> Result<ExportReport, MatchError>;
}
