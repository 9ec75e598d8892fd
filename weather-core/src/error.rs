use thiserror::Error;

/// Failure reported by a single provider.
///
/// The aggregator treats every variant the same way: the first one it
/// observes becomes the result of the whole request.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(
        "No API key configured for provider '{provider}'.\n\
         Hint: run `weather configure {provider}` and enter your API key."
    )]
    MissingApiKey { provider: String },

    #[error("Failed to reach {provider}: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {provider} response: {source}")]
    Decode {
        provider: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} stopped before reporting a temperature")]
    Aborted { provider: String },
}

impl ProviderError {
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::MissingApiKey { provider }
            | ProviderError::Transport { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::Decode { provider, .. }
            | ProviderError::Aborted { provider } => provider,
        }
    }
}
