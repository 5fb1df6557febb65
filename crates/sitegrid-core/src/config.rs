use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub(crate) const DEFAULT_DATAFORSEO_BASE_URL: &str = "https://api.dataforseo.com/v3";
pub(crate) const DEFAULT_FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev/v2";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Provider credentials are optional here; commands that need them check
/// for presence before building a client.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SITEGRID_ENV", "development"))?;
    let log_level = or_default("SITEGRID_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("SITEGRID_OUTPUT_DIR", "./output"));

    let dataforseo_login = optional("DATAFORSEO_LOGIN");
    let dataforseo_password = optional("DATAFORSEO_PASSWORD");
    let dataforseo_base_url = or_default("DATAFORSEO_BASE_URL", DEFAULT_DATAFORSEO_BASE_URL);
    let firecrawl_api_key = optional("FIRECRAWL_API_KEY");
    let firecrawl_base_url = or_default("FIRECRAWL_BASE_URL", DEFAULT_FIRECRAWL_BASE_URL);

    let provider_timeout_secs = parse_u64("SITEGRID_PROVIDER_TIMEOUT_SECS", "60")?;
    let provider_user_agent = or_default(
        "SITEGRID_PROVIDER_USER_AGENT",
        "sitegrid/0.1 (competitive-intelligence)",
    );
    let provider_max_retries = parse_u32("SITEGRID_PROVIDER_MAX_RETRIES", "3")?;
    let provider_backoff_base_secs = parse_u64("SITEGRID_PROVIDER_BACKOFF_BASE_SECS", "2")?;

    let collect_max_concurrent = parse_usize("SITEGRID_COLLECT_MAX_CONCURRENT", "4")?;
    if collect_max_concurrent == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SITEGRID_COLLECT_MAX_CONCURRENT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let collect_max_query_pairs = parse_usize("SITEGRID_COLLECT_MAX_QUERY_PAIRS", "50")?;
    let collect_max_competitors = parse_usize("SITEGRID_COLLECT_MAX_COMPETITORS", "10")?;
    let collect_pages_per_competitor =
        parse_usize("SITEGRID_COLLECT_PAGES_PER_COMPETITOR", "20")?;
    let collect_page_fetch_limit = parse_usize("SITEGRID_COLLECT_PAGE_FETCH_LIMIT", "5")?;

    Ok(AppConfig {
        env,
        log_level,
        output_dir,
        dataforseo_login,
        dataforseo_password,
        dataforseo_base_url,
        firecrawl_api_key,
        firecrawl_base_url,
        provider_timeout_secs,
        provider_user_agent,
        provider_max_retries,
        provider_backoff_base_secs,
        collect_max_concurrent,
        collect_max_query_pairs,
        collect_max_competitors,
        collect_pages_per_competitor,
        collect_page_fetch_limit,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SITEGRID_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
