use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::{Path, PathBuf}, sync::Arc, time::Duration};

use crate::{claude::ClaudeProvider, deepseek::DeepSeekProvider, providers::ContentProvider};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Deepseek,
    Claude,
}

impl ProviderKind {
    pub fn default_key_env(self) -> &'static str {
        match self {
            Self::Deepseek => "DEEPSEEK_API_KEY",
            Self::Claude => "ANTHROPIC_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderCfg {
    #[serde(default)]
    pub kind: ProviderKind,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ProviderCfg {
    pub fn key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(self.kind.default_key_env())
    }

    /// Explicit key first, then the configured environment variable. The key
    /// lives only as long as the provider built from it.
    pub fn resolve_key(&self, explicit: Option<String>) -> Option<String> {
        explicit
            .or_else(|| std::env::var(self.key_env()).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn build(&self, api_key: Option<String>) -> Arc<dyn ContentProvider> {
        match self.kind {
            ProviderKind::Deepseek => Arc::new(DeepSeekProvider::from_cfg(self, api_key)),
            ProviderKind::Claude => Arc::new(ClaudeProvider::from_cfg(self, api_key)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCfg {
    #[serde(default)]
    pub provider: ProviderCfg,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_timeout_secs() -> u64 {
    90
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            provider: ProviderCfg::default(),
            timeout_secs: default_timeout_secs(),
            out_dir: default_out_dir(),
        }
    }
}

impl AppCfg {
    pub async fn load(path: &Path) -> Result<Self> {
        let txt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&txt).context("Failed to parse config YAML")
    }

    /// `BRANDGEN_TIMEOUT_SECS` and `BRANDGEN_OUT_DIR` win over the file.
    pub fn apply_env(mut self) -> Self {
        if let Some(secs) =
            std::env::var("BRANDGEN_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok())
        {
            self.timeout_secs = secs;
        }
        if let Ok(dir) = std::env::var("BRANDGEN_OUT_DIR") {
            self.out_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
