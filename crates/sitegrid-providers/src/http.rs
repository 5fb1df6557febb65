use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use sitegrid_core::AppConfig;

use crate::error::ClientError;

/// Transport and retry policy shared by every provider client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_secs * 2^attempt`.
    pub backoff_base_secs: u64,
}

impl HttpSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.provider_timeout_secs,
            user_agent: config.provider_user_agent.clone(),
            max_retries: config.provider_max_retries,
            backoff_base_secs: config.provider_backoff_base_secs,
        }
    }

    pub(crate) fn build_client(&self) -> Result<Client, ClientError> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&self.user_agent)
            .build()?)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            user_agent: "sitegrid/0.1 (competitive-intelligence)".to_string(),
            max_retries: 3,
            backoff_base_secs: 2,
        }
    }
}

/// Map 429, 402 and other non-2xx statuses to typed errors.
pub(crate) fn check_status(response: Response, url: &str) -> Result<Response, ClientError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ClientError::RateLimited { retry_after_secs });
    }

    if status == StatusCode::PAYMENT_REQUIRED {
        return Err(ClientError::QuotaExceeded(format!("HTTP 402 from {url}")));
    }

    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response)
}

/// Normalise a base URL so `{base}{path}` joins with exactly one slash.
pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_base_url_removes_trailing_slashes() {
        assert_eq!(
            trim_base_url("https://api.dataforseo.com/v3//"),
            "https://api.dataforseo.com/v3"
        );
    }
}
