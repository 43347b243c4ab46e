//! Prompts sent to the generative model.

use crate::core::GameConfiguration;

/// Prompt asking for `pair_count` distinct, drawable items as a JSON array.
pub fn item_list_prompt(config: &GameConfiguration) -> String {
    format!(
        "Generate a list of {count} distinct, physical objects or concepts suitable for a \
         memory matching game card.\n\
         \n\
         Context:\n\
         - Style: {style}\n\
         - Color Palette: {palette}\n\
         - Sophistication Level: {level}\n\
         \n\
         The items should be visually distinct from each other to prevent confusion.\n\
         Return ONLY a JSON array of strings. Example: [\"Red Apple\", \"Bicycle\", \"Tree\"].",
        count = config.pair_count,
        style = config.style,
        palette = config.palette,
        level = config.level.label(),
    )
}

/// Prompt for a single square card illustration.
pub fn image_prompt(label: &str, config: &GameConfiguration) -> String {
    format!(
        "A {style} image of a {label}.\n\
         Color palette: {palette}.\n\
         Sophistication level: {level}.\n\
         Centered, white background, high contrast, suitable for a square game card icon.\n\
         No text, no borders.",
        style = config.style,
        palette = config.palette,
        level = config.level.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DifficultyLevel;

    #[test]
    fn test_item_list_prompt_carries_config() {
        let config = GameConfiguration::new(12)
            .with_style("Pixel Art")
            .with_palette("Pastel Dreams")
            .with_level(DifficultyLevel::A2);
        let prompt = item_list_prompt(&config);

        assert!(prompt.contains("a list of 12 distinct"));
        assert!(prompt.contains("Style: Pixel Art"));
        assert!(prompt.contains("Color Palette: Pastel Dreams"));
        assert!(prompt.contains("A2 (Elementary)"));
    }

    #[test]
    fn test_image_prompt_names_item() {
        let config = GameConfiguration::default();
        let prompt = image_prompt("Bicycle", &config);

        assert!(prompt.starts_with("A Watercolor Illustration image of a Bicycle."));
        assert!(prompt.contains("Earthy Tones"));
        assert!(prompt.contains("No text, no borders."));
    }
}
