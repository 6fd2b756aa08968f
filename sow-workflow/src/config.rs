//! Pipeline configuration
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! YAML file, `SOW_*` environment variables (a `.env` file is honoured), and
//! CLI flags applied by the binary.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use agent_chat_sdk::{EndpointConfig, Session};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{PricingRuleError, PricingRules, RateCard};
use crate::research::ResearchTiming;
use crate::sow::AssemblyOptions;

pub const ENV_API_KEY: &str = "SOW_API_KEY";
pub const ENV_BASE_URL: &str = "SOW_BASE_URL";
pub const ENV_WORKSPACE: &str = "SOW_WORKSPACE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("Invalid pricing rules: {0}")]
    Pricing(#[from] PricingRuleError),

    #[error("No API key configured; set SOW_API_KEY or endpoint.api_key")]
    MissingApiKey,

    #[error("Workspace slug must not be empty")]
    EmptyWorkspace,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub base_url: String,
    pub api_key: String,
    pub workspace: String,
    /// Hard HTTP timeout, on top of the research race timers
    pub request_timeout_secs: Option<u64>,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            api_key: String::new(),
            workspace: "main".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl fmt::Debug for EndpointSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("workspace", &self.workspace)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub stagger_ms: u64,
    pub task_timeout_ms: u64,
    pub settle_ms: u64,
    pub composition_timeout_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            stagger_ms: 2000,
            task_timeout_ms: 45000,
            settle_ms: 1500,
            composition_timeout_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    pub base_hours: u32,
    pub rules: PricingRules,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            base_hours: 100,
            rules: PricingRules::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub endpoint: EndpointSettings,
    pub timing: TimingSettings,
    pub pricing: PricingSettings,
    pub rate_card: RateCard,
}

impl PipelineConfig {
    /// `<config dir>/sow-workflow/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sow-workflow").join("config.yaml"))
    }

    /// Load and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the default path if it exists, else defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(default) if default.is_file() => Self::load(default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Overlay `SOW_*` variables from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay `SOW_*` variables from any lookup; empty values are ignored
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = get(ENV_API_KEY) {
            self.endpoint.api_key = key;
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.endpoint.base_url = url;
        }
        if let Some(workspace) = get(ENV_WORKSPACE) {
            self.endpoint.workspace = workspace;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.task_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("timing.task_timeout_ms"));
        }
        if self.timing.composition_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("timing.composition_timeout_ms"));
        }
        if self.endpoint.request_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout("endpoint.request_timeout_secs"));
        }
        if self.endpoint.workspace.trim().is_empty() {
            return Err(ConfigError::EmptyWorkspace);
        }
        self.pricing.rules.validate()?;
        Ok(())
    }

    /// Connection settings for the HTTP client; requires an API key
    pub fn endpoint_config(&self) -> Result<EndpointConfig, ConfigError> {
        if self.endpoint.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let mut config = EndpointConfig::new(&self.endpoint.base_url, &self.endpoint.api_key);
        if let Some(secs) = self.endpoint.request_timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn session(&self) -> Session {
        Session::new(self.endpoint.workspace.trim())
    }

    pub fn research_timing(&self) -> ResearchTiming {
        ResearchTiming {
            stagger: Duration::from_millis(self.timing.stagger_ms),
            task_timeout: Duration::from_millis(self.timing.task_timeout_ms),
            settle: Duration::from_millis(self.timing.settle_ms),
        }
    }

    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            timing: self.research_timing(),
            composition_timeout: Duration::from_millis(self.timing.composition_timeout_ms),
            base_hours: self.pricing.base_hours,
            pricing_rules: self.pricing.rules.clone(),
            rate_card: self.rate_card.clone(),
        }
    }
}
