use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::cli::OutputFormat;
use crate::config::ClientConfig;
use crate::session::{CredentialStore, FileStore, SessionGuard};

/// Storage key for the command a login redirect should resume
pub const RETURN_TO_KEY: &str = "return_to";

/// Services shared by every command, built once at startup
pub struct AppContext {
    pub config: ClientConfig,
    pub api: Arc<ApiClient>,
    pub store: Arc<FileStore>,
    pub session: SessionGuard,
    pub output: OutputFormat,
}

impl AppContext {
    pub fn from_env(output: OutputFormat) -> anyhow::Result<Self> {
        let config = ClientConfig::from_env();
        let store = Arc::new(FileStore::in_dir(&get_config_dir()?));
        Self::build(config, store, output)
    }

    pub fn build(config: ClientConfig, store: Arc<FileStore>, output: OutputFormat) -> anyhow::Result<Self> {
        let api = Arc::new(ApiClient::new(&config)?);
        let session = SessionGuard::new(api.clone(), store.clone(), &config);

        tracing::debug!(
            "Using API {} with session file {}",
            api.base_url(),
            store.path().display()
        );

        Ok(Self {
            config,
            api,
            store,
            session,
            output,
        })
    }

    /// True when an access token is stored, without validating it
    pub fn store_has_token(&self) -> bool {
        matches!(self.store.get(&self.config.storage.keys.access_token), Ok(Some(_)))
    }

    /// Remember where to resume after the next login
    pub fn remember_return_to(&self, location: &str) {
        if let Err(e) = self.store.set(RETURN_TO_KEY, location) {
            tracing::warn!("Could not remember '{}' for after login: {}", location, e);
        }
    }

    /// Take the remembered location, if any
    pub fn take_return_to(&self) -> Option<String> {
        let location = self.store.get(RETURN_TO_KEY).ok().flatten()?;
        if let Err(e) = self.store.remove(RETURN_TO_KEY) {
            tracing::warn!("Could not clear remembered location: {}", e);
        }
        Some(location)
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("RECIPES_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("recipes").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}
