//! Asset generation over the Gemini `generateContent` REST API.
//!
//! Two steps per session:
//! 1. one text request for the list of item labels
//! 2. one image request per label, at most `concurrency` in flight

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::fallback::{fallback_labels, normalize_labels, placeholder_image};
use super::prompt::{image_prompt, item_list_prompt};
use super::traits::{AssetProvider, GenerationProgress, ProgressSink};
use crate::cards::{Asset, ImageRef};
use crate::core::{GameConfiguration, ProviderError, Settings};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn text(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                parts: [TextPart { text: prompt }],
            }],
            generation_config: None,
        }
    }

    fn string_array(prompt: &'a str) -> Self {
        Self {
            generation_config: Some(json!({
                "responseMimeType": "application/json",
                "responseSchema": { "type": "ARRAY", "items": { "type": "STRING" } }
            })),
            ..Self::text(prompt)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.iter())
            .into_iter()
            .flatten()
    }

    fn first_text(&self) -> Option<&str> {
        self.parts().find_map(|part| part.text.as_deref())
    }

    fn first_image(&self) -> Option<ImageRef> {
        self.parts()
            .find_map(|part| part.inline_data.as_ref())
            .map(|inline| ImageRef::data_uri(&inline.mime_type, &inline.data))
    }
}

/// Gemini-backed asset provider.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    text_model: String,
    image_model: String,
    concurrency: usize,
}

impl GeminiProvider {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            api_key: settings.api_key().map(str::to_string),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
            concurrency: settings.image_concurrency.max(1),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    async fn call(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<GenerateResponse>().await?)
    }

    async fn request_labels(
        &self,
        api_key: &str,
        config: &GameConfiguration,
    ) -> Result<Vec<String>, ProviderError> {
        let prompt = item_list_prompt(config);
        let response = self
            .call(api_key, &self.text_model, &GenerateRequest::string_array(&prompt))
            .await?;
        let text = response
            .first_text()
            .ok_or_else(|| ProviderError::Malformed("no text in item list response".into()))?;
        serde_json::from_str::<Vec<String>>(text)
            .map_err(|err| ProviderError::Malformed(format!("item list is not a string array: {err}")))
    }

    /// Item labels for the session, falling back to `Item 1..N` on failure.
    async fn labels(&self, api_key: &str, config: &GameConfiguration) -> Vec<String> {
        let count = config.pair_count as usize;
        match self.request_labels(api_key, config).await {
            Ok(raw) => normalize_labels(raw, count),
            Err(err) => {
                warn!(error = %err, "item list generation failed, using fallback labels");
                fallback_labels(count)
            }
        }
    }

    /// Image for one label, falling back to a placeholder on failure.
    async fn image(&self, api_key: &str, label: &str, config: &GameConfiguration) -> ImageRef {
        let prompt = image_prompt(label, config);
        let image = self
            .call(api_key, &self.image_model, &GenerateRequest::text(&prompt))
            .await
            .and_then(|response| {
                response
                    .first_image()
                    .ok_or_else(|| ProviderError::Malformed("no inline image in response".into()))
            });
        match image {
            Ok(image) => image,
            Err(err) => {
                warn!(%label, error = %err, "image generation failed, using placeholder");
                placeholder_image(label)
            }
        }
    }
}

#[async_trait]
impl AssetProvider for GeminiProvider {
    async fn generate(
        &self,
        config: &GameConfiguration,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<Asset>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials)?;

        let labels = self.labels(api_key, config).await;
        let total = labels.len();
        info!(total, concurrency = self.concurrency, "generating card images");
        progress.report(GenerationProgress::new(0, total));

        let permits = Semaphore::new(self.concurrency);
        let completed = AtomicUsize::new(0);

        // join_all keeps results in label order regardless of completion order.
        let assets = join_all(labels.into_iter().map(|label| {
            let permits = &permits;
            let completed = &completed;
            async move {
                let image = match permits.acquire().await {
                    Ok(_permit) => self.image(api_key, &label, config).await,
                    Err(_) => placeholder_image(&label),
                };
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(%label, done, total, "image ready");
                progress.report(GenerationProgress::new(done, total));
                Asset::new(label, image)
            }
        }))
        .await;

        Ok(assets)
    }
}
