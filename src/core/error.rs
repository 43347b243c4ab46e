//! Error types.
//!
//! Every failure is recoverable: the worst observable outcome is a session
//! returned to `Setup` with an error notice.

use thiserror::Error;

/// Errors surfaced by the game engine and its collaborators.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The configuration or the asset list cannot form a playable deck.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The asset provider could not be invoked at all.
    #[error("asset generation failed: {0}")]
    AssetGeneration(#[from] ProviderError),

    /// Writing the image archive failed. Session state is unaffected.
    #[error("export failed: {0}")]
    Export(String),

    /// The settings file or environment could not be read.
    #[error("invalid settings: {0}")]
    Settings(String),
}

/// Hard failures of an asset provider.
///
/// Soft failures (a bad label list, a single missing image) are absorbed by
/// the provider with fallbacks and never reach this type.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API credentials configured")]
    MissingCredentials,

    #[error("request to {endpoint} failed: {message}")]
    Http { endpoint: String, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("provider task failed: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|url| format!("{}{}", url.origin().ascii_serialization(), url.path()))
            .unwrap_or_else(|| "<unknown>".to_string());
        ProviderError::Http {
            endpoint,
            message: err.to_string(),
        }
    }
}
