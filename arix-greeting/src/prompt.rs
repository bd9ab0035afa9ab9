//! This module builds the request for a greeting.

/// The sampling temperature for every greeting, high enough to keep them varied.
pub const TEMPERATURE: f32 = 0.8;

/// One request for generated text.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    /// The model identifier.
    pub model: String,

    /// The full prompt.
    pub prompt: String,

    /// The sampling temperature.
    pub temperature: f32,
}

impl GenerationRequest {
    /// The request for a greeting to `recipient` in the given tone.
    pub fn greeting(model: &str, recipient: &str, tone: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: greeting_prompt(recipient, tone),
            temperature: TEMPERATURE,
        }
    }
}

/// The prompt asking for a greeting card message.
///
/// The word limit is only a hint to the model. Nothing checks the length of the answer.
pub fn greeting_prompt(recipient: &str, tone: &str) -> String {
    // Every line after the first is indented by four spaces
    format!(
        "Write a short, luxurious, and cinematic Christmas greeting card message for {recipient}. \n    \
         The tone should be {tone}. \n    \
         Max 30 words. \n    \
         Use sophisticated vocabulary (e.g., \"opulence\", \"splendor\", \"gilded\"). \n    \
         Do not use emojis. \n    \
         Sign it off as \"The Arix Collection\"."
    )
}
