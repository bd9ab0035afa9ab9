//! This crate writes short greeting card messages by asking a text-generation API.
//!
//! The entry point is [`GreetingService::generate`], which always resolves to something that can
//! be shown to the user. Failures are logged and replaced with fixed fallback messages.

mod error;
mod generator;
mod prompt;
mod service;

pub use self::{
    error::GreetingError,
    generator::{GeminiClient, TextGenerator},
    prompt::{greeting_prompt, GenerationRequest, TEMPERATURE},
    service::{GreetingService, API_KEY_VAR},
};

/// The message shown when no API key has been configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Arix Signature: API Key missing. Please configure your environment to receive royal correspondence.";

/// The message shown when the API answered with no text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "May your holidays be filled with golden splendor.";

/// The message shown when the request failed.
pub const REQUEST_FAILED_MESSAGE: &str =
    "The stars are aligning. Please try again later for your royal decree.";
