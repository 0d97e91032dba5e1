use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:4040";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    pub default_days: u32,
    pub refresh_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("MUROJAAT_API_URL") {
            let v = v.trim();
            if !v.is_empty() {
                self.api.base_url = v.trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = env::var("API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("API_USER_AGENT") {
            self.api.user_agent = v;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Stats overrides
        if let Ok(v) = env::var("STATS_DEFAULT_DAYS") {
            self.stats.default_days = v.parse().unwrap_or(self.stats.default_days);
        }
        if let Ok(v) = env::var("STATS_REFRESH_SECS") {
            self.stats.refresh_interval_secs = v.parse().unwrap_or(self.stats.refresh_interval_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: 30,
                user_agent: format!("murojaat-admin/{}", env!("CARGO_PKG_VERSION")),
                enable_request_logging: true,
            },
            stats: StatsConfig {
                default_days: 30,
                refresh_interval_secs: 30,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: 15,
                user_agent: format!("murojaat-admin/{}", env!("CARGO_PKG_VERSION")),
                enable_request_logging: true,
            },
            stats: StatsConfig {
                default_days: 30,
                refresh_interval_secs: 30,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: 10,
                user_agent: format!("murojaat-admin/{}", env!("CARGO_PKG_VERSION")),
                enable_request_logging: false,
            },
            stats: StatsConfig {
                default_days: 30,
                refresh_interval_secs: 60,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.enable_request_logging);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.stats.refresh_interval_secs, 60);
        assert!(!config.api.enable_request_logging);
    }
}
