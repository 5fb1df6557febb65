use thiserror::Error;

/// Invalid configuration: environment variables or a client definition file.
///
/// Always fatal. A pipeline run that hits a `ConfigError` stops before the
/// plan stage completes.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read client file {path}: {source}")]
    ClientFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse client file: {0}")]
    ClientFileParse(#[from] serde_yaml::Error),

    #[error("client validation failed: {0}")]
    Validation(String),
}

/// Terminal failure reported by an external ranking or content provider.
///
/// Providers retry transient conditions themselves; by the time a
/// `ProviderError` reaches the collector it is final for that call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Request {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} rate limited the request (retry after {retry_after_secs}s)")]
    RateLimited {
        provider: &'static str,
        retry_after_secs: u64,
    },

    #[error("{provider} quota exceeded")]
    QuotaExceeded { provider: &'static str },

    #[error("unexpected HTTP status {status} from {provider} ({url})")]
    UnexpectedStatus {
        provider: &'static str,
        status: u16,
        url: String,
    },

    #[error("{provider} API error {status_code:?}: {message}")]
    Api {
        provider: &'static str,
        status_code: Option<i64>,
        message: String,
    },

    #[error("malformed {provider} response: {reason}")]
    Malformed {
        provider: &'static str,
        reason: String,
    },
}
