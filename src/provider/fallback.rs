//! Deterministic substitutes for failed generation steps.

use rustc_hash::FxHashSet;
use url::Url;

use crate::cards::ImageRef;

const PLACEHOLDER_ORIGIN: &str = "https://picsum.photos";
const PLACEHOLDER_SIZE: &str = "512";

/// Generic labels used when the item list cannot be generated.
pub fn fallback_labels(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Item {i}")).collect()
}

/// Placeholder image for a label whose image could not be generated.
///
/// The label seeds the placeholder service, so the same label always maps to
/// the same picture.
pub fn placeholder_image(label: &str) -> ImageRef {
    match Url::parse(PLACEHOLDER_ORIGIN) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments
                    .clear()
                    .extend(["seed", label, PLACEHOLDER_SIZE, PLACEHOLDER_SIZE]);
            }
            ImageRef::Url(url.into())
        }
        Err(_) => ImageRef::Url(format!(
            "{PLACEHOLDER_ORIGIN}/seed/{label}/{PLACEHOLDER_SIZE}/{PLACEHOLDER_SIZE}"
        )),
    }
}

/// Make a raw label list usable as a deck: exactly `count` distinct labels.
///
/// Labels are trimmed; blanks and case-insensitive repeats are dropped; the
/// list is cut to `count` and padded with `Item k` labels that do not collide
/// with any kept label.
pub fn normalize_labels(raw: Vec<String>, count: usize) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut labels: Vec<String> = raw
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(label.to_lowercase()))
        .take(count)
        .collect();

    let mut k = 1;
    while labels.len() < count {
        let candidate = format!("Item {k}");
        if seen.insert(candidate.to_lowercase()) {
            labels.push(candidate);
        }
        k += 1;
    }
    labels
}
