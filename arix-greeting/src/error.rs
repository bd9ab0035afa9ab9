//! Errors from the text-generation API.

/// Everything that can go wrong while asking for a greeting.
#[derive(Debug, thiserror::Error)]
pub enum GreetingError {
    /// The request couldn't be sent or the response couldn't be read.
    #[error("request to the text-generation API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with an error status.
    #[error("text-generation API returned status {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,

        /// The body of the error response.
        body: String,
    },

    /// The API answered with something that isn't a generation response.
    #[error("malformed response from the text-generation API: {0}")]
    Malformed(#[from] serde_json::Error),
}
