use thiserror::Error;

pub const STORE_FAILURE_MESSAGE: &str = "Internal error while accessing profile storage";
pub const MODEL_FAILURE_MESSAGE: &str = "Internal error while generating learning roadmap";
pub const MALFORMED_OUTPUT_MESSAGE: &str = "Roadmap generation returned malformed output";
pub const RESPONSE_ENCODING_MESSAGE: &str = "Internal error while encoding response";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Failure reported by one of the boundary services. The detail string is
/// meant for the operational log only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("profile store call failed: {0}")]
    Store(String),

    #[error("text generation call failed: {0}")]
    Model(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("malformed model output: {reason}")]
    MalformedModelOutput { reason: String, raw_output: String },

    #[error("failed to encode response body: {0}")]
    ResponseEncoding(String),
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Upstream(_)
            | Self::MalformedModelOutput { .. }
            | Self::ResponseEncoding(_) => 500,
        }
    }

    /// Message safe to return to the caller. Upstream detail and raw model
    /// output never appear here.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(error) => error.message().to_string(),
            Self::NotFound(message) => message.clone(),
            Self::Upstream(UpstreamError::Store(_)) => STORE_FAILURE_MESSAGE.to_string(),
            Self::Upstream(UpstreamError::Model(_)) => MODEL_FAILURE_MESSAGE.to_string(),
            Self::MalformedModelOutput { .. } => MALFORMED_OUTPUT_MESSAGE.to_string(),
            Self::ResponseEncoding(_) => RESPONSE_ENCODING_MESSAGE.to_string(),
        }
    }
}
