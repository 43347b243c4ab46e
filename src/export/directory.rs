//! Exporting images as files in a timestamped directory.
//!
//! File names come from the card label:
//!
//! ```
//! use mindmatch::export::sanitize_label;
//!
//! assert_eq!(sanitize_label("Red Apple"), "red_apple");
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{info, warn};

use super::{ArchiveExporter, ExportEntry, ExportReport};
use crate::core::MatchError;

/// Lowercase the label and replace anything not ASCII alphanumeric with `_`.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes images into a fresh `mindmatch-images-<millis>` directory.
#[derive(Clone, Debug)]
pub struct DirectoryExporter {
    root: PathBuf,
}

impl DirectoryExporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn archive_dir(&self) -> PathBuf {
        let stamp = chrono::Utc::now().timestamp_millis();
        self.root.join(format!("mindmatch-images-{stamp}"))
    }
}

fn export_error(action: &str, path: &std::path::Path, err: std::io::Error) -> MatchError {
    MatchError::Export(format!("{action} {}: {err}", path.display()))
}

#[async_trait]
impl ArchiveExporter for DirectoryExporter {
    async fn export(&self, entries: Vec<ExportEntry>) -> Result<ExportReport, MatchError> {
        if entries.is_empty() {
            return Err(MatchError::Export("nothing to export".to_string()));
        }

        let location = self.archive_dir();
        fs::create_dir_all(&location)
            .await
            .map_err(|err| export_error("creating", &location, err))?;

        let mut report = ExportReport {
            location: location.clone(),
            ..ExportReport::default()
        };

        for (i, entry) in entries.iter().enumerate() {
            let bytes = match entry.image.decode() {
                Some(decoded) => decoded?,
                None => {
                    warn!(label = %entry.label, "image is not inline, skipping");
                    report.skipped.push(entry.label.clone());
                    continue;
                }
            };
            let file_name = format!(
                "{}_{}.{}",
                sanitize_label(&entry.label),
                i + 1,
                entry.image.extension()
            );
            let path = location.join(file_name);
            fs::write(&path, bytes)
                .await
                .map_err(|err| export_error("writing", &path, err))?;
            report.written.push(path);
        }

        info!(
            location = %location.display(),
            written = report.written.len(),
            skipped = report.skipped.len(),
            "images exported"
        );
        Ok(report)
    }
}
