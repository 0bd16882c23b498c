use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to, e.g. `http://localhost:3001/api`
    pub base_url: String,
    pub timeout_secs: u64,
    pub enable_request_logging: bool,
}

/// Names of the persisted session entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageKeys {
    pub access_token: String,
    pub refresh_token: String,
    pub user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub keys: StorageKeys,
    /// Route protected commands redirect to
    pub login_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            access_token: "access_token".to_string(),
            refresh_token: "refresh_token".to_string(),
            user: "user".to_string(),
        }
    }
}

impl ClientConfig {
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

    /// Configuration pointing at an explicit base URL with development defaults
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.api.base_url = base_url.into();
        config
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("RECIPES_API_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("RECIPES_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("RECIPES_API_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Storage overrides
        if let Ok(v) = env::var("RECIPES_STORAGE_ACCESS_TOKEN_KEY") {
            self.storage.keys.access_token = v;
        }
        if let Ok(v) = env::var("RECIPES_STORAGE_REFRESH_TOKEN_KEY") {
            self.storage.keys.refresh_token = v;
        }
        if let Ok(v) = env::var("RECIPES_STORAGE_USER_KEY") {
            self.storage.keys.user = v;
        }
        if let Ok(v) = env::var("RECIPES_LOGIN_PATH") {
            self.storage.login_path = v;
        }

        // Pagination overrides
        if let Ok(v) = env::var("RECIPES_PAGE_SIZE") {
            self.pagination.default_page_size = v.parse().unwrap_or(self.pagination.default_page_size);
        }
        if let Ok(v) = env::var("RECIPES_MAX_PAGE_SIZE") {
            self.pagination.max_page_size = v.parse().unwrap_or(self.pagination.max_page_size);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:3001/api".to_string(),
                timeout_secs: 30,
                enable_request_logging: true,
            },
            storage: StorageConfig {
                keys: StorageKeys::default(),
                login_path: "/login".to_string(),
            },
            pagination: PaginationConfig {
                default_page_size: 10,
                max_page_size: 100,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.recipes.example.com/api".to_string(),
                timeout_secs: 15,
                enable_request_logging: true,
            },
            storage: StorageConfig {
                keys: StorageKeys::default(),
                login_path: "/login".to_string(),
            },
            pagination: PaginationConfig {
                default_page_size: 10,
                max_page_size: 50,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://recipes.example.com/api".to_string(),
                timeout_secs: 10,
                enable_request_logging: false,
            },
            storage: StorageConfig {
                keys: StorageKeys::default(),
                login_path: "/login".to_string(),
            },
            pagination: PaginationConfig {
                default_page_size: 12,
                max_page_size: 50,
            },
        }
    }

    /// Clamp a requested page size into `1..=max_page_size`
    pub fn clamp_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.pagination.default_page_size)
            .clamp(1, self.pagination.max_page_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = ClientConfig::development();
        assert_eq!(config.api.base_url, "http://localhost:3001/api");
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.storage.keys.access_token, "access_token");
    }

    #[test]
    fn test_default_production_config() {
        let config = ClientConfig::production();
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.pagination.max_page_size, 50);
    }

    #[test]
    fn test_clamp_page_size() {
        let config = ClientConfig::development();
        assert_eq!(config.clamp_page_size(None), 10);
        assert_eq!(config.clamp_page_size(Some(0)), 1);
        assert_eq!(config.clamp_page_size(Some(500)), 100);
        assert_eq!(config.clamp_page_size(Some(25)), 25);
    }

    #[test]
    fn test_with_base_url() {
        let config = ClientConfig::with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.api.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.environment, Environment::Development);
    }
}
