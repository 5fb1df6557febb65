use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub output_dir: PathBuf,
    pub dataforseo_login: Option<String>,
    pub dataforseo_password: Option<String>,
    pub dataforseo_base_url: String,
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_base_url: String,
    pub provider_timeout_secs: u64,
    pub provider_user_agent: String,
    pub provider_max_retries: u32,
    pub provider_backoff_base_secs: u64,
    pub collect_max_concurrent: usize,
    pub collect_max_query_pairs: usize,
    pub collect_max_competitors: usize,
    pub collect_pages_per_competitor: usize,
    pub collect_page_fetch_limit: usize,
}

impl AppConfig {
    /// Returns `true` when both DataForSEO credentials are present.
    #[must_use]
    pub fn has_dataforseo_credentials(&self) -> bool {
        self.dataforseo_login.is_some() && self.dataforseo_password.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("output_dir", &self.output_dir)
            .field(
                "dataforseo_login",
                &self.dataforseo_login.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "dataforseo_password",
                &self.dataforseo_password.as_ref().map(|_| "[redacted]"),
            )
            .field("dataforseo_base_url", &self.dataforseo_base_url)
            .field(
                "firecrawl_api_key",
                &self.firecrawl_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("firecrawl_base_url", &self.firecrawl_base_url)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("provider_user_agent", &self.provider_user_agent)
            .field("provider_max_retries", &self.provider_max_retries)
            .field(
                "provider_backoff_base_secs",
                &self.provider_backoff_base_secs,
            )
            .field("collect_max_concurrent", &self.collect_max_concurrent)
            .field("collect_max_query_pairs", &self.collect_max_query_pairs)
            .field("collect_max_competitors", &self.collect_max_competitors)
            .field(
                "collect_pages_per_competitor",
                &self.collect_pages_per_competitor,
            )
            .field("collect_page_fetch_limit", &self.collect_page_fetch_limit)
            .finish()
    }
}
