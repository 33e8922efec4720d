use serde::{Deserialize, Serialize};

use crate::config::EnvConfig;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Read from `TODO_CLIENT_*` variables, e.g. `TODO_CLIENT_BASE_URL`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl EnvConfig for ClientConfig {
    const PREFIX: &'static str = "TODO_CLIENT";

    fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.trim().is_empty() {
            anyhow::bail!("invalid client config:\n- base_url must not be empty");
        }
        Ok(())
    }
}
