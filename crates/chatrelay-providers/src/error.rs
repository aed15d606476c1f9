//! Errors raised while talking to completion providers.

/// Failure of a single provider call (chat or model listing).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// No configured provider can serve the requested model.
    #[error("no configured provider found for model '{0}'")]
    NoProvider(String),

    /// The request never produced an HTTP response (DNS, connect, timeout, …).
    #[error("{provider}: request failed: {message}")]
    Transport { provider: String, message: String },

    /// The provider answered with a non-success status.
    #[error("{provider}: API error {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// The response body could not be read or understood.
    #[error("{provider}: invalid response: {message}")]
    Decode { provider: String, message: String },
}

impl ProviderError {
    pub fn transport(provider: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ProviderError::Transport {
            provider: provider.into(),
            message: err.to_string(),
        }
    }

    pub fn decode(provider: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ProviderError::Decode {
            provider: provider.into(),
            message: err.to_string(),
        }
    }
}
