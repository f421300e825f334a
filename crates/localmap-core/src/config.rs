use crate::error::ConfigError;

/// Application configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the store-locator backend, e.g.
    /// `http://localhost:8080/api/v1`.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_base_url = require("LOCALMAP_API_BASE_URL")?;
    let request_timeout_secs = parse_u64("LOCALMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LOCALMAP_USER_AGENT", "localmap/0.1 (store-locator)");
    let log_level = or_default("LOCALMAP_LOG_LEVEL", "info");

    Ok(AppConfig {
        api_base_url,
        request_timeout_secs,
        user_agent,
        log_level,
    })
}

#[cfg(test)]
mod tests {
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

    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("LOCALMAP_API_BASE_URL", "http://localhost:8080/api/v1");
        m
    }

    #[test]
    fn fails_without_base_url() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "LOCALMAP_API_BASE_URL"),
            "expected MissingEnvVar(LOCALMAP_API_BASE_URL), got: {result:?}"
        );
    }

    #[test]
    fn succeeds_with_defaults() {
        let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
        assert_eq!(cfg.api_base_url, "http://localhost:8080/api/v1");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "localmap/0.1 (store-locator)");
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn timeout_override_and_invalid() {
        let mut map = full_env();
        map.insert("LOCALMAP_REQUEST_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 60);

        map.insert("LOCALMAP_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOCALMAP_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }
}
