use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Persisted CLI session, stored as `env.json` in the config directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub server_url: String,
    pub token: Option<String>,
    pub current_user: Option<String>,
    #[serde(default)]
    pub user_id: Option<i32>,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
            current_user: None,
            user_id: None,
            logged_in_at: None,
        }
    }
}

impl EnvironmentConfig {
    /// Client for the configured server, carrying the saved token if any
    pub fn client(&self) -> ApiClient {
        let client = ApiClient::new(&self.server_url);
        match &self.token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    /// Like [`client`](Self::client) but fails when nobody is logged in
    pub fn authenticated_client(&self) -> anyhow::Result<ApiClient> {
        if self.token.is_none() {
            anyhow::bail!("Not logged in; run `docman auth login <email>` first");
        }
        Ok(self.client())
    }

    pub fn set_session(&mut self, token: String, email: String, user_id: Option<i32>) {
        self.token = Some(token);
        self.current_user = Some(email);
        self.user_id = user_id;
        self.logged_in_at = Some(Utc::now());
    }

    pub fn clear_session(&mut self) {
        self.token = None;
        self.current_user = None;
        self.user_id = None;
        self.logged_in_at = None;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("DOCMAN_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("docman").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_environment_config() -> anyhow::Result<EnvironmentConfig> {
    let env_file = get_config_dir()?.join("env.json");

    if !env_file.exists() {
        return Ok(EnvironmentConfig::default());
    }

    let content = fs::read_to_string(env_file)?;
    let config: EnvironmentConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_environment_config(config: &EnvironmentConfig) -> anyhow::Result<()> {
    let env_file = get_config_dir()?.join("env.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(env_file, content)?;
    Ok(())
}
