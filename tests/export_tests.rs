//! Image export tests.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use mindmatch::export::{sanitize_label, ArchiveExporter, DirectoryExporter, ExportEntry};
use mindmatch::provider::{AssetProvider, ProgressSink};
use mindmatch::{
    Asset, GameConfiguration, GameRng, ImageRef, MatchError, ProviderError, SessionController,
    SessionState, TimerDelays,
};

struct InlineProvider;

#[async_trait]
impl AssetProvider for InlineProvider {
    async fn generate(
        &self,
        config: &GameConfiguration,
        _progress: &dyn ProgressSink,
    ) -> Result<Vec<Asset>, ProviderError> {
        let labels = ["Red Apple", "Bicycle", "Tree"];
        Ok(labels
            .iter()
            .take(config.pair_count as usize)
            .map(|label| Asset::new(*label, ImageRef::data_uri("image/png", STANDARD.encode(label))))
            .collect())
    }
}

fn controller() -> SessionController {
    SessionController::new(Arc::new(InlineProvider), GameRng::new(11), TimerDelays::default())
}

#[tokio::test]
async fn test_export_writes_one_file_per_pair() {
    let dir = tempfile::tempdir().unwrap();
    let controller = controller();
    assert_eq!(
        controller.start(GameConfiguration::new(3)).await.unwrap(),
        SessionState::Playing
    );

    let report = controller
        .export(&DirectoryExporter::new(dir.path()))
        .await
        .unwrap();

    assert!(report.location.starts_with(dir.path()));
    let dir_name = report.location.file_name().unwrap().to_string_lossy().into_owned();
    assert!(dir_name.starts_with("mindmatch-images-"));
    assert_eq!(report.written.len(), 3);
    assert!(report.skipped.is_empty());

    let mut found = Vec::new();
    for path in &report.written {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let bytes = std::fs::read(path).unwrap();
        let label = String::from_utf8(bytes).unwrap();
        let index = report.written.iter().position(|p| p == path).unwrap() + 1;
        assert_eq!(name, format!("{}_{index}.png", sanitize_label(&label)));
        found.push(label);
    }
    found.sort();
    assert_eq!(found, ["Bicycle", "Red Apple", "Tree"]);

    // Export leaves the game untouched
    assert_eq!(controller.state().await, SessionState::Playing);
}

#[tokio::test]
async fn test_export_without_deck_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = controller().export(&DirectoryExporter::new(dir.path())).await;
    assert!(matches!(result, Err(MatchError::Export(_))));
}

#[tokio::test]
async fn test_url_images_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let entries = vec![
        ExportEntry {
            label: "Kite".into(),
            image: ImageRef::data_uri("image/jpeg", STANDARD.encode("kite")),
        },
        ExportEntry {
            label: "Boat".into(),
            image: ImageRef::Url("https://picsum.photos/seed/Boat/512/512".into()),
        },
    ];

    let report = DirectoryExporter::new(dir.path()).export(entries).await.unwrap();

    assert_eq!(report.written.len(), 1);
    assert!(report.written[0].ends_with("kite_1.jpg"));
    assert_eq!(report.skipped, ["Boat"]);
}

#[tokio::test]
async fn test_corrupt_inline_image_fails() {
    let dir = tempfile::tempdir().unwrap();
    let entries = vec![ExportEntry {
        label: "Drum".into(),
        image: ImageRef::data_uri("image/png", "not base64!!"),
    }];

    let result = DirectoryExporter::new(dir.path()).export(entries).await;
    assert!(matches!(result, Err(MatchError::Export(_))));
}
