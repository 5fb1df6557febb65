use sitegrid_core::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("API error {status_code:?}: {message}")]
    Api {
        status_code: Option<i64>,
        message: String,
    },

    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),
}

impl ClientError {
    /// Convert into the provider-neutral error the collector records.
    #[must_use]
    pub fn into_provider_error(self, provider: &'static str) -> ProviderError {
        match self {
            ClientError::Http(e) => ProviderError::Request {
                provider,
                message: e.to_string(),
            },
            ClientError::Deserialize { context, source } => ProviderError::Malformed {
                provider,
                reason: format!("{context}: {source}"),
            },
            ClientError::RateLimited { retry_after_secs } => ProviderError::RateLimited {
                provider,
                retry_after_secs,
            },
            ClientError::QuotaExceeded(_) => ProviderError::QuotaExceeded { provider },
            ClientError::UnexpectedStatus { status, url } => ProviderError::UnexpectedStatus {
                provider,
                status,
                url,
            },
            ClientError::Api {
                status_code,
                message,
            } => ProviderError::Api {
                provider,
                status_code,
                message,
            },
            ClientError::MissingCredentials(what) => ProviderError::Request {
                provider,
                message: format!("missing credentials: {what}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_keeps_retry_hint() {
        let err = ClientError::RateLimited {
            retry_after_secs: 30,
        }
        .into_provider_error("firecrawl");
        assert!(matches!(
            err,
            ProviderError::RateLimited {
                provider: "firecrawl",
                retry_after_secs: 30
            }
        ));
    }

    #[test]
    fn api_error_keeps_status_code() {
        let err = ClientError::Api {
            status_code: Some(40501),
            message: "Invalid Field".into(),
        }
        .into_provider_error("dataforseo");
        assert_eq!(
            err.to_string(),
            "dataforseo API error Some(40501): Invalid Field"
        );
    }
}
