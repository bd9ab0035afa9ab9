//! This module handles the [`GreetingService`].

use crate::{
    GeminiClient, GenerationRequest, TextGenerator, EMPTY_RESPONSE_MESSAGE,
    MISSING_CREDENTIAL_MESSAGE, REQUEST_FAILED_MESSAGE,
};
use arix_config::GreetingSettings;
use std::{env, fmt};
use tracing::{error, info, instrument, warn};

/// The environment variable holding the API key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Writes greetings, or explains why it couldn't.
pub struct GreetingService {
    /// The generator to ask, or `None` if there's no credential.
    generator: Option<Box<dyn TextGenerator>>,

    /// The model to ask for.
    model: String,
}

impl fmt::Debug for GreetingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreetingService")
            .field("has_credential", &self.has_credential())
            .field("model", &self.model)
            .finish()
    }
}

impl GreetingService {
    /// Create a service using the API key in the [`API_KEY_VAR`] environment variable.
    pub fn from_env(settings: &GreetingSettings) -> Self {
        Self::from_credential(env::var(API_KEY_VAR).ok(), settings)
    }

    /// Create a service talking to the API in the settings with the given key. A missing or
    /// empty key means every greeting will be [`MISSING_CREDENTIAL_MESSAGE`].
    pub fn from_credential(api_key: Option<String>, settings: &GreetingSettings) -> Self {
        let generator = api_key.filter(|key| !key.is_empty()).map(|key| {
            Box::new(GeminiClient::new(&settings.endpoint, key)) as Box<dyn TextGenerator>
        });

        if generator.is_none() {
            warn!("No API key configured, greetings are unavailable");
        }

        Self {
            generator,
            model: settings.model.clone(),
        }
    }

    /// Create a service using the given generator.
    pub fn with_generator(generator: impl TextGenerator + 'static, model: &str) -> Self {
        Self {
            generator: Some(Box::new(generator)),
            model: model.to_string(),
        }
    }

    /// Does this service have a credential to call the API with?
    pub fn has_credential(&self) -> bool {
        self.generator.is_some()
    }

    /// Write a greeting for `recipient` in the given tone.
    ///
    /// This never fails. Any problem is logged and turned into a fallback message.
    #[instrument(skip(self))]
    pub async fn generate(&self, recipient: &str, tone: &str) -> String {
        let Some(generator) = &self.generator else {
            return MISSING_CREDENTIAL_MESSAGE.to_string();
        };

        let request = GenerationRequest::greeting(&self.model, recipient, tone);
        match generator.generate(&request).await {
            Ok(text) if text.is_empty() => {
                info!("Text-generation API gave an empty greeting");
                EMPTY_RESPONSE_MESSAGE.to_string()
            }
            Ok(text) => text,
            Err(e) => {
                error!(%e, "Greeting generation failed");
                REQUEST_FAILED_MESSAGE.to_string()
            }
        }
    }
}
