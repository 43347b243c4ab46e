//! Generated assets: a label and the image that illustrates it.
//!
//! `ImageRef` is opaque to the engine. Only presentation and export look
//! inside it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::core::MatchError;

/// Reference to a displayable image.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageRef {
    /// Inline image bytes, base64-encoded.
    DataUri { mime: String, data: String },
    /// Externally hosted image (used for placeholders).
    Url(String),
}

impl ImageRef {
    /// Create an inline image reference.
    pub fn data_uri(mime: impl Into<String>, data: impl Into<String>) -> Self {
        ImageRef::DataUri {
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<data>` URI, falling back to a plain URL.
    pub fn parse(raw: &str) -> Self {
        raw.strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(mime, data)| ImageRef::data_uri(mime, data))
            .unwrap_or_else(|| ImageRef::Url(raw.to_string()))
    }

    /// Is this an inline image?
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(self, ImageRef::DataUri { .. })
    }

    /// File extension matching the image's MIME type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            ImageRef::DataUri { mime, .. } => match mime.as_str() {
                "image/jpeg" | "image/jpg" => "jpg",
                "image/webp" => "webp",
                "image/gif" => "gif",
                _ => "png",
            },
            ImageRef::Url(_) => "png",
        }
    }

    /// Decode inline image bytes. `None` for URL references.
    pub fn decode(&self) -> Option<Result<Vec<u8>, MatchError>> {
        match self {
            ImageRef::DataUri { data, .. } => Some(
                STANDARD
                    .decode(data.as_bytes())
                    .map_err(|err| MatchError::Export(format!("invalid image data: {err}"))),
            ),
            ImageRef::Url(_) => None,
        }
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRef::DataUri { mime, data } => write!(f, "data:{mime};base64,{data}"),
            ImageRef::Url(url) => f.write_str(url),
        }
    }
}

/// A labeled image produced by an asset provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    label: String,
    image: ImageRef,
}

impl Asset {
    pub fn new(label: impl Into<String>, image: ImageRef) -> Self {
        Self {
            label: label.into(),
            image,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn image(&self) -> &ImageRef {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_uri() {
        let image = ImageRef::parse("data:image/png;base64,aGVsbG8=");
        assert_eq!(image, ImageRef::data_uri("image/png", "aGVsbG8="));
        assert!(image.is_inline());
        assert_eq!(image.to_string(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_parse_url() {
        let image = ImageRef::parse("https://picsum.photos/seed/Tree/512/512");
        assert!(!image.is_inline());
        assert_eq!(image.to_string(), "https://picsum.photos/seed/Tree/512/512");
        assert!(image.decode().is_none());
    }

    #[test]
    fn test_decode() {
        let image = ImageRef::data_uri("image/png", "aGVsbG8=");
        assert_eq!(image.decode().unwrap().unwrap(), b"hello".to_vec());

        let broken = ImageRef::data_uri("image/png", "!!not base64!!");
        assert!(matches!(broken.decode(), Some(Err(MatchError::Export(_)))));
    }

    #[test]
    fn test_extension() {
        assert_eq!(ImageRef::data_uri("image/jpeg", "").extension(), "jpg");
        assert_eq!(ImageRef::data_uri("image/png", "").extension(), "png");
        assert_eq!(ImageRef::data_uri("application/x-unknown", "").extension(), "png");
    }

    #[test]
    fn test_asset_accessors() {
        let asset = Asset::new("Tree", ImageRef::Url("https://example.test/tree".into()));
        assert_eq!(asset.label(), "Tree");
        assert_eq!(asset.image(), &ImageRef::Url("https://example.test/tree".into()));
    }
}
