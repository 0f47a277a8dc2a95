//! Configuration module
//!
//! Server configuration is read from the environment (and a `.env` file when
//! present) once at startup.

use std::env;
use std::str::FromStr;

use crate::format::Format;

const PORT: u16 = 3000;
const HOST: &str = "0.0.0.0";
const MAX_UPLOAD_SIZE_MB: usize = 50;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const SITE_URL: &str = "https://squeezit.com";
const CONTACT_EMAIL: &str = "contact@1367studio.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    pub http_concurrency_limit: usize,
    /// Used when a request carries no `format` field.
    pub default_target_format: Format,
    pub site_url: String,
    pub contact_email: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            server_port: PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            default_target_format: Format::Jpeg,
            site_url: SITE_URL.to_string(),
            contact_email: CONTACT_EMAIL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from a variable lookup. Unset variables take
    /// their defaults; set but unparseable ones are an error.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let defaults = Config::default();

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or(defaults.environment);

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = parse_var(&var, "MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB)?;
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let default_target_format = match var("DEFAULT_TARGET_FORMAT") {
            Some(token) => token.trim().parse::<Format>().map_err(|e| {
                anyhow::anyhow!("DEFAULT_TARGET_FORMAT is invalid: {}", e)
            })?,
            None => defaults.default_target_format,
        };

        let config = Config {
            host: var("HOST").unwrap_or(defaults.host),
            server_port: parse_var(&var, "PORT", PORT)?,
            environment,
            cors_origins,
            max_upload_size_bytes,
            http_concurrency_limit: parse_var(
                &var,
                "HTTP_CONCURRENCY_LIMIT",
                HTTP_CONCURRENCY_LIMIT,
            )?,
            default_target_format,
            site_url: var("SITE_URL").unwrap_or(defaults.site_url),
            contact_email: var("CONTACT_EMAIL").unwrap_or(defaults.contact_email),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.cors_origins.is_empty() {
            return Err(anyhow::anyhow!("CORS_ORIGINS must list at least one origin"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than 0"
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.server_port)
    }

    pub fn max_upload_size_mb(&self) -> usize {
        self.max_upload_size_bytes / 1024 / 1024
    }
}

fn parse_var<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, anyhow::Error> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, value)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.default_target_format, Format::Jpeg);
        assert_eq!(config.max_upload_size_mb(), 50);
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let config = Config {
            environment: "Production".to_string(),
            ..Config::default()
        };
        assert!(config.is_production());
        assert!(config.validate().is_err());

        let config = Config {
            environment: "prod".to_string(),
            cors_origins: vec!["https://squeezit.com".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let config = Config {
            max_upload_size_bytes: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            http_concurrency_limit: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.max_upload_size_mb(), 50);
        assert_eq!(config.http_concurrency_limit, 1024);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_from_vars_reads_values() {
        let config = Config::from_vars(vars(&[
            ("PORT", "8080"),
            ("MAX_UPLOAD_SIZE_MB", "10"),
            ("HTTP_CONCURRENCY_LIMIT", "64"),
            ("DEFAULT_TARGET_FORMAT", "webp"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.max_upload_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.http_concurrency_limit, 64);
        assert_eq!(config.default_target_format, Format::Webp);
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_unparseable_numbers_are_errors() {
        assert!(Config::from_vars(vars(&[("MAX_UPLOAD_SIZE_MB", "fifty")])).is_err());
        assert!(Config::from_vars(vars(&[("HTTP_CONCURRENCY_LIMIT", "lots")])).is_err());
        assert!(Config::from_vars(vars(&[("PORT", "http")])).is_err());
        assert!(Config::from_vars(vars(&[("DEFAULT_TARGET_FORMAT", "svg")])).is_err());
    }

    #[test]
    fn test_upload_size_overflow_is_an_error() {
        let huge = usize::MAX.to_string();
        assert!(Config::from_vars(vars(&[("MAX_UPLOAD_SIZE_MB", huge.as_str())])).is_err());
    }

    #[test]
    fn test_zero_values_fail_validation() {
        assert!(Config::from_vars(vars(&[("MAX_UPLOAD_SIZE_MB", "0")])).is_err());
        assert!(Config::from_vars(vars(&[("HTTP_CONCURRENCY_LIMIT", "0")])).is_err());
    }
}
