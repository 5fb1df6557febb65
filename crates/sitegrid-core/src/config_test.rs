use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SITEGRID_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.output_dir.to_string_lossy(), "./output");
    assert!(cfg.dataforseo_login.is_none());
    assert!(cfg.dataforseo_password.is_none());
    assert!(cfg.firecrawl_api_key.is_none());
    assert!(!cfg.has_dataforseo_credentials());
    assert_eq!(cfg.dataforseo_base_url, "https://api.dataforseo.com/v3");
    assert_eq!(cfg.firecrawl_base_url, "https://api.firecrawl.dev/v2");
    assert_eq!(cfg.provider_timeout_secs, 60);
    assert_eq!(
        cfg.provider_user_agent,
        "sitegrid/0.1 (competitive-intelligence)"
    );
    assert_eq!(cfg.provider_max_retries, 3);
    assert_eq!(cfg.provider_backoff_base_secs, 2);
    assert_eq!(cfg.collect_max_concurrent, 4);
    assert_eq!(cfg.collect_max_query_pairs, 50);
    assert_eq!(cfg.collect_max_competitors, 10);
    assert_eq!(cfg.collect_pages_per_competitor, 20);
    assert_eq!(cfg.collect_page_fetch_limit, 5);
}

#[test]
fn build_app_config_reads_credentials() {
    let mut map = HashMap::new();
    map.insert("DATAFORSEO_LOGIN", "login@example.com");
    map.insert("DATAFORSEO_PASSWORD", "secret");
    map.insert("FIRECRAWL_API_KEY", "fc-123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert!(cfg.has_dataforseo_credentials());
    assert_eq!(cfg.firecrawl_api_key.as_deref(), Some("fc-123"));
}

#[test]
fn blank_credentials_are_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("FIRECRAWL_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.firecrawl_api_key.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_max_retries() {
    let mut map = HashMap::new();
    map.insert("SITEGRID_PROVIDER_MAX_RETRIES", "many");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SITEGRID_PROVIDER_MAX_RETRIES"),
        "expected InvalidEnvVar(SITEGRID_PROVIDER_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_concurrency() {
    let mut map = HashMap::new();
    map.insert("SITEGRID_COLLECT_MAX_CONCURRENT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SITEGRID_COLLECT_MAX_CONCURRENT"),
        "expected InvalidEnvVar(SITEGRID_COLLECT_MAX_CONCURRENT), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_credentials() {
    let mut map = HashMap::new();
    map.insert("DATAFORSEO_LOGIN", "login@example.com");
    map.insert("DATAFORSEO_PASSWORD", "hunter2");
    map.insert("FIRECRAWL_API_KEY", "fc-secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    let debug = format!("{cfg:?}");
    assert!(!debug.contains("hunter2"));
    assert!(!debug.contains("fc-secret-key"));
    assert!(!debug.contains("login@example.com"));
    assert!(debug.contains("[redacted]"));
}
