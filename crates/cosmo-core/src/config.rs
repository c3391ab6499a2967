use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// CMS origin used when `COSMO_CMS_BASE_URL` is not set outside production.
pub const DEFAULT_CMS_BASE_URL: &str = "https://admin.spb-cosmetologist.ru";

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

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so they
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let env = parse_environment(&or_default("COSMO_ENV", "development"))?;

    let bind_addr = parse_addr("COSMO_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("COSMO_LOG_LEVEL", "info");

    // Production deployments must name their CMS explicitly.
    let cms_base_url = match lookup("COSMO_CMS_BASE_URL") {
        Ok(raw) => parse_base_url(&raw)?,
        Err(_) if env == Environment::Production => {
            return Err(ConfigError::MissingEnvVar("COSMO_CMS_BASE_URL".to_string()));
        }
        Err(_) => DEFAULT_CMS_BASE_URL.to_string(),
    };
    let cms_api_token = lookup("COSMO_CMS_API_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty());
    let cms_services_collection = or_default("COSMO_CMS_SERVICES_COLLECTION", "uslugas");
    let cms_works_collection = or_default("COSMO_CMS_WORKS_COLLECTION", "works");
    let cms_request_timeout_secs = parse_u64("COSMO_CMS_REQUEST_TIMEOUT_SECS", "30")?;
    let cms_user_agent = or_default("COSMO_CMS_USER_AGENT", "cosmo/0.1 (site-content)");

    let revalidate_services_secs = parse_u64("COSMO_REVALIDATE_SERVICES_SECS", "600")?;
    let revalidate_detail_secs = parse_u64("COSMO_REVALIDATE_DETAIL_SECS", "3600")?;
    let revalidate_works_secs = parse_u64("COSMO_REVALIDATE_WORKS_SECS", "3000")?;
    let rate_limit_per_minute = parse_usize("COSMO_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        cms_base_url,
        cms_api_token,
        cms_services_collection,
        cms_works_collection,
        cms_request_timeout_secs,
        cms_user_agent,
        revalidate_services_secs,
        revalidate_detail_secs,
        revalidate_works_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COSMO_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Validates the CMS origin and strips trailing slashes so paths like
/// `/uploads/a.jpg` can be appended directly.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "COSMO_CMS_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{raw}\""),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
