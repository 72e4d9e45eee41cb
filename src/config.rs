//! Run configuration
//!
//! Loaded from a YAML file; every field has a default so a missing file, or a
//! file that sets only a few keys, still yields a complete configuration.
//!
//! ```yaml
//! data:
//!   input_csv: data/processed_data.csv
//! analytics:
//!   centrality_sample_size: 100
//!   centrality_seed: 42
//! narrative:
//!   provider: Gemini
//!   model: gemini-2.0-flash
//! ```

use crate::algo::BetweennessConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variables consulted, in order, when no API key is configured
pub const API_KEY_ENV_VARS: [&str; 2] = ["SIDEEFFECTNET_API_KEY", "GEMINI_API_KEY"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideEffectNetConfig {
    pub data: DataConfig,
    pub analytics: AnalyticsConfig,
    pub narrative: NarrativeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Cleaned adverse-event table
    pub input_csv: PathBuf,
    /// Exported risk table
    pub risk_csv: PathBuf,
    /// Graph snapshot JSON
    pub snapshot_json: PathBuf,
    /// Node cap for the snapshot
    pub snapshot_max_nodes: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from("data/processed_data.csv"),
            risk_csv: PathBuf::from("data/risk_scores.csv"),
            snapshot_json: PathBuf::from("data/graph_snapshot.json"),
            snapshot_max_nodes: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Pivots for approximate centrality (`None` = exact)
    pub centrality_sample_size: Option<usize>,
    pub centrality_seed: Option<u64>,
    /// Shared side effects a drug pair needs to become a hypothesis
    pub min_overlap: usize,
    pub top_k: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            centrality_sample_size: Some(100),
            centrality_seed: None,
            min_overlap: 2,
            top_k: 10,
        }
    }
}

impl AnalyticsConfig {
    pub fn betweenness(&self) -> BetweennessConfig {
        match self.centrality_sample_size {
            Some(k) => BetweennessConfig::sampled(k, self.centrality_seed),
            None => BetweennessConfig::exact(),
        }
    }
}

/// Supported text-generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmProvider {
    Gemini,
    OpenAI,
    Ollama,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub provider: LlmProvider,
    /// Model name (e.g., "gemini-2.0-flash", "gpt-4o", "llama3")
    pub model: String,
    /// API key (optional, falls back to the environment)
    pub api_key: Option<String>,
    /// API base URL (provider default when unset)
    pub api_base_url: Option<String>,
    pub system_prompt: Option<String>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            api_base_url: None,
            system_prompt: None,
        }
    }
}

impl NarrativeConfig {
    /// Fill a missing API key from the first set variable of [`API_KEY_ENV_VARS`]
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = API_KEY_ENV_VARS
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()));
        }
        self
    }
}

impl SideEffectNetConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load `path`, or the defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Loaded config from {}", path.display());
            Self::from_yaml_str(&yaml)?
        } else {
            debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.narrative = config.narrative.with_env_api_key();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = SideEffectNetConfig::default();
        assert_eq!(config.data.snapshot_max_nodes, 300);
        assert_eq!(config.analytics.centrality_sample_size, Some(100));
        assert_eq!(config.analytics.min_overlap, 2);
        assert_eq!(config.analytics.top_k, 10);
        assert_eq!(config.narrative.provider, LlmProvider::Gemini);
        assert_eq!(config.narrative.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = "
analytics:
  centrality_sample_size: null
  min_overlap: 3
narrative:
  provider: Ollama
  model: llama3
";
        let config = SideEffectNetConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.analytics.min_overlap, 3);
        assert_eq!(config.analytics.top_k, 10);
        assert_eq!(config.analytics.betweenness(), BetweennessConfig::exact());
        assert_eq!(config.narrative.provider, LlmProvider::Ollama);
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn test_sampled_betweenness() {
        let analytics = AnalyticsConfig {
            centrality_seed: Some(9),
            ..AnalyticsConfig::default()
        };
        assert_eq!(analytics.betweenness(), BetweennessConfig::sampled(100, Some(9)));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data:\n  snapshot_max_nodes: 50\nnarrative:\n  api_key: from-file").unwrap();

        let config = SideEffectNetConfig::load(file.path()).unwrap();
        assert_eq!(config.data.snapshot_max_nodes, 50);
        assert_eq!(config.narrative.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SideEffectNetConfig::load(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = SideEffectNetConfig::from_yaml_str("analytics: [1, 2");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
