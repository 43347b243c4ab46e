//! Asset generation.
//!
//! The session reaches image generation only through the [`AssetProvider`]
//! trait. [`GeminiProvider`] is the production implementation; tests plug in
//! their own.
//!
//! ## Failure policy
//!
//! - item list fails → `Item 1..N`
//! - one image fails → placeholder URL for that label
//! - provider cannot be invoked (no credentials) → `Err`

mod fallback;
mod gemini;
mod prompt;
mod traits;

pub use fallback::{fallback_labels, normalize_labels, placeholder_image};
pub use gemini::GeminiProvider;
pub use prompt::{image_prompt, item_list_prompt};
pub use traits::{AssetProvider, GenerationProgress, NoProgress, ProgressSink};
